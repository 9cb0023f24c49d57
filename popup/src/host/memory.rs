//! In-memory document with a manual clock, used to drive popups in tests.

use std::{
    cell::RefCell,
    collections::{BTreeSet, HashMap},
    rc::{Rc, Weak},
};

use super::{Handler, Host, Hover, PopupEvent};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Default)]
struct Node {
    id: String,
    classes: BTreeSet<String>,
    data: HashMap<String, String>,
    events: Vec<PopupEvent>,
}

struct Subscription {
    handle: u64,
    node: NodeId,
    hover: Hover,
    handler: Handler,
}

struct Pending {
    handle: u64,
    due: u64,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Dom {
    nodes: Vec<Node>,
    subscriptions: Vec<Subscription>,
    timers: Vec<Pending>,
    now: u64,
    next_handle: u64,
}

impl Dom {
    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

#[derive(Clone, Default)]
pub struct MemoryHost {
    dom: Rc<RefCell<Dom>>,
}

pub struct Listener {
    handle: u64,
    dom: Weak<RefCell<Dom>>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(dom) = self.dom.upgrade() {
            dom.borrow_mut()
                .subscriptions
                .retain(|s| s.handle != self.handle);
        }
    }
}

pub struct Timer {
    handle: u64,
    dom: Weak<RefCell<Dom>>,
}

impl Drop for Timer {
    fn drop(&mut self) {
        if let Some(dom) = self.dom.upgrade() {
            dom.borrow_mut().timers.retain(|t| t.handle != self.handle);
        }
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Self::default()
    }

    /// Adds an element reachable through the selector `#<id>`.
    pub fn element(&self, id: &str) -> NodeId {
        let mut dom = self.dom.borrow_mut();
        dom.nodes.push(Node {
            id: id.to_owned(),
            ..Default::default()
        });
        NodeId(dom.nodes.len() - 1)
    }

    pub fn set_data(&self, node: NodeId, name: &str, value: &str) {
        self.dom.borrow_mut().nodes[node.0]
            .data
            .insert(name.to_owned(), value.to_owned());
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.dom.borrow().nodes[node.0].classes.contains(class)
    }

    /// Notifications dispatched on `node` so far.
    pub fn events(&self, node: NodeId) -> Vec<PopupEvent> {
        self.dom.borrow().nodes[node.0].events.clone()
    }

    pub fn listeners(&self, node: NodeId) -> usize {
        self.dom
            .borrow()
            .subscriptions
            .iter()
            .filter(|s| s.node == node)
            .count()
    }

    pub fn pending_timers(&self) -> usize {
        self.dom.borrow().timers.len()
    }

    pub fn now(&self) -> u64 {
        self.dom.borrow().now
    }

    /// Fires the hover transition on `node`, running every subscribed handler.
    pub fn hover(&self, node: NodeId, hover: Hover) {
        let handlers: Vec<Handler> = self
            .dom
            .borrow()
            .subscriptions
            .iter()
            .filter(|s| s.node == node && s.hover == hover)
            .map(|s| Rc::clone(&s.handler))
            .collect();

        for handler in handlers {
            handler();
        }
    }

    /// Moves the clock forward, running timers as they become due.
    pub fn advance(&self, millis: u64) {
        let until = self.now() + millis;

        loop {
            let callback = {
                let mut dom = self.dom.borrow_mut();
                let next = dom
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= until)
                    .min_by_key(|(_, t)| (t.due, t.handle))
                    .map(|(index, _)| index);

                match next {
                    Some(index) => {
                        let pending = dom.timers.remove(index);
                        dom.now = pending.due;
                        pending.callback
                    }
                    None => {
                        dom.now = until;
                        break;
                    }
                }
            };

            callback();
        }
    }
}

impl Host for MemoryHost {
    type Element = NodeId;
    type Listener = Listener;
    type Timer = Timer;

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let id = selector.strip_prefix('#')?;
        self.dom
            .borrow()
            .nodes
            .iter()
            .position(|node| node.id == id)
            .map(NodeId)
    }

    fn data_attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.dom.borrow().nodes[element.0].data.get(name).cloned()
    }

    fn toggle_class(&self, element: &NodeId, class: &str, force: bool) {
        let mut dom = self.dom.borrow_mut();
        let classes = &mut dom.nodes[element.0].classes;
        for class in class.split_whitespace() {
            if force {
                classes.insert(class.to_owned());
            } else {
                classes.remove(class);
            }
        }
    }

    fn dispatch(&self, element: &NodeId, event: PopupEvent) {
        self.dom.borrow_mut().nodes[element.0].events.push(event);
    }

    fn listen(&self, element: &NodeId, hover: Hover, handler: Handler) -> Listener {
        let mut dom = self.dom.borrow_mut();
        let handle = dom.next_handle();
        dom.subscriptions.push(Subscription {
            handle,
            node: *element,
            hover,
            handler,
        });

        Listener {
            handle,
            dom: Rc::downgrade(&self.dom),
        }
    }

    fn set_timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Timer {
        let mut dom = self.dom.borrow_mut();
        let handle = dom.next_handle();
        let due = dom.now + u64::from(millis);
        dom.timers.push(Pending {
            handle,
            due,
            callback,
        });

        Timer {
            handle,
            dom: Rc::downgrade(&self.dom),
        }
    }
}

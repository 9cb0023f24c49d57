use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use strum::{Display, EnumString};

use crate::{
    host::{Handler, Host, Hover, PopupEvent},
    options::{OptionKey, OptionValue, Options, OptionsPatch, Target},
};

/// Attribute consulted for a target selector when none is configured.
pub const DATA_TARGET: &str = "target";

/// Instance methods reachable through the named action interface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString)]
pub enum Method {
    #[strum(serialize = "onMouseOver")]
    OnMouseOver,
    #[strum(serialize = "onMouseOut")]
    OnMouseOut,
}

/// A popup attached to one owner element.
///
/// Hover listeners and the close timer are owned by the instance, they are
/// released as soon as the instance is dropped.
pub struct Instance<H: Host> {
    host: Rc<H>,
    state: Rc<RefCell<State<H>>>,
}

struct State<H: Host> {
    owner: H::Element,
    options: Options<H::Element>,
    target: Option<H::Element>,
    owner_listeners: Vec<H::Listener>,
    target_listeners: Vec<H::Listener>,
    close_timer: Option<H::Timer>,
    /// Last state announced with an event, only reflected states count.
    announced: bool,
}

struct WeakInstance<H: Host> {
    host: Weak<H>,
    state: Weak<RefCell<State<H>>>,
}

impl<H: Host> WeakInstance<H> {
    fn upgrade(&self) -> Option<Instance<H>> {
        Some(Instance {
            host: self.host.upgrade()?,
            state: self.state.upgrade()?,
        })
    }
}

impl<H: Host> Instance<H> {
    pub(crate) fn create(
        host: Rc<H>,
        owner: H::Element,
        mut options: OptionsPatch<H::Element>,
    ) -> Self {
        if !options.has_target() {
            if let Some(selector) = host.data_attribute(&owner, DATA_TARGET) {
                options = options.target(Target::Selector(selector));
            }
        }

        let instance = Self {
            host,
            state: Rc::new(RefCell::new(State {
                owner: owner.clone(),
                options: Options::default(),
                target: None,
                owner_listeners: Vec::new(),
                target_listeners: Vec::new(),
                close_timer: None,
                announced: false,
            })),
        };

        let listeners = instance.subscribe(&owner);
        instance.state.borrow_mut().owner_listeners = listeners;
        instance.update(options);

        tracing::debug!("created popup for {owner:?}");
        instance
    }

    pub fn owner(&self) -> H::Element {
        self.state.borrow().owner.clone()
    }

    pub fn is_owned_by(&self, element: &H::Element) -> bool {
        self.state.borrow().owner == *element
    }

    /// The currently resolved target element.
    pub fn target(&self) -> Option<H::Element> {
        self.state.borrow().target.clone()
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().options.open
    }

    pub fn options(&self) -> Options<H::Element> {
        self.state.borrow().options.clone()
    }

    pub fn update(&self, options: OptionsPatch<H::Element>) {
        for value in options.into_values() {
            self.set_option(value);
        }
    }

    pub fn get_option(&self, key: OptionKey) -> OptionValue<H::Element> {
        self.state.borrow().options.get(key)
    }

    /// Stores the option, applies its side effects and returns the previous value.
    pub fn set_option(&self, value: OptionValue<H::Element>) -> OptionValue<H::Element> {
        let key = value.key();
        let previous = self.state.borrow_mut().options.set(value);

        match key {
            OptionKey::Target => {
                let target = self.state.borrow().options.target.clone();
                self.retarget(target);
            }
            OptionKey::Open => {
                let open = self.is_open();
                self.reflect_open(open);
            }
            _ => {}
        }

        previous
    }

    pub fn call(&self, method: Method) {
        match method {
            Method::OnMouseOver => self.hover(Hover::Enter),
            Method::OnMouseOut => self.hover(Hover::Leave),
        }
    }

    /// Reacts to the mouse entering or leaving the owner or the target.
    ///
    /// Entering opens right away, leaving closes after the configured timeout
    /// unless the mouse comes back first.
    pub fn hover(&self, hover: Hover) {
        match hover {
            Hover::Enter => {
                let pending = self.state.borrow_mut().close_timer.take();
                drop(pending);
                self.set_option(OptionValue::Open(true));
            }
            Hover::Leave => {
                let timeout = self.state.borrow().options.timeout;
                let instance = self.downgrade();
                let timer = self.host.set_timeout(
                    timeout,
                    Box::new(move || {
                        if let Some(instance) = instance.upgrade() {
                            instance.close();
                        }
                    }),
                );

                let previous = self.state.borrow_mut().close_timer.replace(timer);
                drop(previous);
            }
        }
    }

    /// Detaches all listeners and cancels a pending close.
    pub fn destroy(self) {
        let (owner_listeners, target_listeners, timer) = {
            let mut state = self.state.borrow_mut();
            state.target = None;
            (
                std::mem::take(&mut state.owner_listeners),
                std::mem::take(&mut state.target_listeners),
                state.close_timer.take(),
            )
        };
        drop((owner_listeners, target_listeners, timer));

        tracing::debug!("destroyed popup for {:?}", self.owner());
    }

    fn close(&self) {
        let fired = self.state.borrow_mut().close_timer.take();
        drop(fired);
        self.set_option(OptionValue::Open(false));
    }

    fn retarget(&self, target: Option<Target<H::Element>>) {
        let element = match target {
            Some(Target::Element(element)) => Some(element),
            Some(Target::Selector(selector)) if !selector.trim().is_empty() => {
                let element = self.host.query_selector(&selector);
                if element.is_none() {
                    tracing::warn!("popup target '{selector}' does not match any element");
                }
                element
            }
            _ => None,
        };

        let previous = std::mem::take(&mut self.state.borrow_mut().target_listeners);
        drop(previous);

        let listeners = match &element {
            Some(element) => self.subscribe(element),
            None => Vec::new(),
        };

        let mut state = self.state.borrow_mut();
        state.target = element;
        state.target_listeners = listeners;
    }

    fn reflect_open(&self, open: bool) {
        let (target, owner, class, flipped) = {
            let mut state = self.state.borrow_mut();
            let Some(target) = state.target.clone() else {
                return;
            };
            let flipped = std::mem::replace(&mut state.announced, open) != open;
            (target, state.owner.clone(), state.options.open_class.clone(), flipped)
        };

        self.host.toggle_class(&target, &class, open);

        if flipped {
            tracing::debug!("popup of {owner:?} is now {}", if open { "open" } else { "closed" });
            self.host.dispatch(&owner, PopupEvent::for_state(open));
        }
    }

    fn subscribe(&self, element: &H::Element) -> Vec<H::Listener> {
        [Hover::Enter, Hover::Leave]
            .into_iter()
            .map(|hover| {
                let instance = self.downgrade();
                let handler: Handler = Rc::new(move || {
                    if let Some(instance) = instance.upgrade() {
                        instance.hover(hover);
                    }
                });
                self.host.listen(element, hover, handler)
            })
            .collect()
    }

    fn downgrade(&self) -> WeakInstance<H> {
        WeakInstance {
            host: Rc::downgrade(&self.host),
            state: Rc::downgrade(&self.state),
        }
    }
}

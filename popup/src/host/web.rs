use gloo_timers::callback::Timeout;
use wasm_bindgen::{closure::Closure, JsCast, UnwrapThrowExt};

use super::{Handler, Host, Hover, PopupEvent};

/// Browser document host backed by [`web_sys`].
pub struct WebHost {
    document: web_sys::Document,
}

impl WebHost {
    pub fn new() -> Self {
        let document = web_sys::window()
            .expect_throw("expected window")
            .document()
            .expect_throw("expected document");
        Self { document }
    }

    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }
}

impl Default for WebHost {
    fn default() -> Self {
        Self::new()
    }
}

/// Event listener registration, removed from the element when dropped.
pub struct EventListener {
    element: web_sys::Element,
    name: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Drop for EventListener {
    fn drop(&mut self) {
        self.element
            .remove_event_listener_with_callback(self.name, self.closure.as_ref().unchecked_ref())
            .unwrap_throw();
    }
}

impl Host for WebHost {
    type Element = web_sys::Element;
    type Listener = EventListener;
    type Timer = Timeout;

    fn query_selector(&self, selector: &str) -> Option<web_sys::Element> {
        // invalid selectors throw a SyntaxError
        self.document.query_selector(selector).ok().flatten()
    }

    fn data_attribute(&self, element: &web_sys::Element, name: &str) -> Option<String> {
        element.get_attribute(&format!("data-{name}"))
    }

    fn toggle_class(&self, element: &web_sys::Element, class: &str, force: bool) {
        let class_list = element.class_list();
        for class in class.split_whitespace() {
            if let Err(err) = class_list.toggle_with_force(class, force) {
                tracing::warn!("failed to toggle class '{class}': {err:?}");
            }
        }
    }

    fn dispatch(&self, element: &web_sys::Element, event: PopupEvent) {
        let name: &'static str = event.into();
        let result = web_sys::Event::new(name).and_then(|event| element.dispatch_event(&event));
        if let Err(err) = result {
            tracing::warn!("failed to dispatch '{name}' event: {err:?}");
        }
    }

    fn listen(&self, element: &web_sys::Element, hover: Hover, handler: Handler) -> EventListener {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| handler());
        let name: &'static str = hover.into();

        element
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .unwrap_throw();

        EventListener {
            element: element.clone(),
            name,
            closure,
        }
    }

    fn set_timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(millis, callback)
    }
}

//! The seam between popup instances and the document they live in.

use std::{fmt, rc::Rc};

use strum::{Display, EnumString, IntoStaticStr};

#[cfg(test)]
pub(crate) mod memory;
#[cfg(feature = "browser")]
pub mod web;

/// Mouse hover transitions, named after the DOM events that signal them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum Hover {
    #[strum(serialize = "mouseover")]
    Enter,
    #[strum(serialize = "mouseout")]
    Leave,
}

/// Notifications dispatched on the owner when the open state flips.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum PopupEvent {
    Open,
    Close,
}

impl PopupEvent {
    pub fn for_state(open: bool) -> Self {
        if open {
            Self::Open
        } else {
            Self::Close
        }
    }
}

pub type Handler = Rc<dyn Fn()>;

/// Everything a popup needs from the document.
///
/// Listener and timer handles are owned by the instances, dropping a handle
/// must remove the listener or cancel the timer.
pub trait Host: 'static {
    type Element: Clone + PartialEq + fmt::Debug + 'static;
    type Listener: 'static;
    type Timer: 'static;

    /// First element matching `selector`, if any.
    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    /// Value of the `data-<name>` attribute.
    fn data_attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Adds or removes every whitespace separated class name in `class`.
    fn toggle_class(&self, element: &Self::Element, class: &str, force: bool);

    fn dispatch(&self, element: &Self::Element, event: PopupEvent);

    fn listen(&self, element: &Self::Element, hover: Hover, handler: Handler) -> Self::Listener;

    fn set_timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Self::Timer;
}

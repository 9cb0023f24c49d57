//! Hover driven popups for DOM elements.
//!
//! A popup links the hover state of an owner element to an open class on a
//! target element. Entering the owner or the target opens the popup at once,
//! leaving either closes it after a configurable delay. Flips of the open
//! state are announced with `open` and `close` events on the owner.
//!
//! All popups of a document live in a [`PopupController`], which is driven
//! with [`Action`]s, either typed or by name:
//!
//! ```ignore
//! let mut popups = PopupController::new(WebHost::new());
//! popups.invoke([&owner], Action::Create(OptionsPatch::new().timeout(300)));
//! popups.invoke_named([&owner], "target", Some(json!("#panel")))?;
//! ```

mod action;
mod controller;
mod error;
pub mod host;
mod instance;
mod options;

pub use self::action::Action;
pub use self::controller::PopupController;
pub use self::error::{Error, Result};
pub use self::host::{Host, Hover, PopupEvent};
pub use self::instance::{Instance, Method, DATA_TARGET};
pub use self::options::{
    OptionKey, OptionValue, Options, OptionsPatch, Position, Target, DEFAULT_OPEN_CLASS,
    DEFAULT_TIMEOUT,
};

cfg_if::cfg_if! {
    if #[cfg(feature = "browser")] {
        pub use self::host::web::{EventListener, WebHost};
    }
}

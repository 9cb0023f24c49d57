use thiserror::Error;

use crate::options::OptionKey;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The action name is neither a lifecycle action, an instance method nor an option.
    #[error("unknown popup action '{0}'")]
    UnknownAction(String),

    #[error("invalid value for option '{key}': {source}")]
    InvalidValue {
        key: OptionKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("action '{action}' expects {expected}")]
    InvalidArgument {
        action: &'static str,
        expected: &'static str,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

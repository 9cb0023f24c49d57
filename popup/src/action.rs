use crate::{
    instance::Method,
    options::{OptionKey, OptionValue, OptionsPatch},
    Error, Result,
};

/// What to do with the popups of a set of elements.
#[derive(Clone, Debug, PartialEq)]
pub enum Action<E> {
    /// Creates a popup, or updates it when the element already has one.
    Create(OptionsPatch<E>),
    Update(OptionsPatch<E>),
    Destroy,
    Call(Method),
    Get(OptionKey),
    /// Sets an option, the previous value is returned.
    Set(OptionValue<E>),
}

impl<E> Action<E> {
    /// Resolves an action name with its optional JSON argument.
    ///
    /// Names other than `create`, `update` and `destroy` are looked up as
    /// instance methods first and as option names second. An option name
    /// with a value becomes a setter.
    ///
    /// `getOption` takes the option name, `setOption` a `[name, value]` pair.
    pub fn parse(name: &str, value: Option<serde_json::Value>) -> Result<Self> {
        let patch = |value: Option<serde_json::Value>| match value {
            Some(value) => OptionsPatch::from_value(value),
            None => Ok(OptionsPatch::new()),
        };

        match name {
            "create" => return Ok(Self::Create(patch(value)?)),
            "update" => return Ok(Self::Update(patch(value)?)),
            "destroy" => return Ok(Self::Destroy),
            "getOption" => return Self::parse_get_option(value),
            "setOption" => return Self::parse_set_option(value),
            _ => (),
        }

        if let Ok(method) = name.parse() {
            return Ok(Self::Call(method));
        }

        let key: OptionKey = name
            .parse()
            .map_err(|_| Error::UnknownAction(name.to_owned()))?;

        match value {
            Some(value) => Ok(Self::Set(OptionValue::from_json(key, value)?)),
            None => Ok(Self::Get(key)),
        }
    }

    fn parse_get_option(value: Option<serde_json::Value>) -> Result<Self> {
        let invalid = || Error::InvalidArgument {
            action: "getOption",
            expected: "an option name",
        };

        let Some(serde_json::Value::String(name)) = value else {
            return Err(invalid());
        };
        let key = name.parse().map_err(|_| invalid())?;

        Ok(Self::Get(key))
    }

    fn parse_set_option(value: Option<serde_json::Value>) -> Result<Self> {
        let invalid = || Error::InvalidArgument {
            action: "setOption",
            expected: "a [name, value] pair",
        };

        let Some(serde_json::Value::Array(pair)) = value else {
            return Err(invalid());
        };
        let Ok([serde_json::Value::String(name), value]) = <[_; 2]>::try_from(pair) else {
            return Err(invalid());
        };
        let key = name.parse().map_err(|_| invalid())?;

        Ok(Self::Set(OptionValue::from_json(key, value)?))
    }
}

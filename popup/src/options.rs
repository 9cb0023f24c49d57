use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use strum::{Display, EnumString, IntoStaticStr};

use crate::{Error, Result};

pub const DEFAULT_OPEN_CLASS: &str = "open";
pub const DEFAULT_TIMEOUT: u32 = 1000;

/// Where the popup should be placed relative to its owner.
///
/// Stored and reported only, placement is left to the stylesheet.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Position {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

/// Element whose open class is toggled, either given directly or looked up.
#[derive(Clone, Debug, PartialEq)]
pub enum Target<E> {
    Selector(String),
    Element(E),
}

impl<E> Target<E> {
    pub fn selector(selector: impl Into<String>) -> Self {
        Self::Selector(selector.into())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum OptionKey {
    Open,
    OpenClass,
    Timeout,
    Target,
    Position,
    CloseByTarget,
    CloseByWindow,
}

/// A single option together with its value, the unit of every get and set.
#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue<E> {
    Open(bool),
    OpenClass(String),
    Timeout(u32),
    Target(Option<Target<E>>),
    Position(Position),
    CloseByTarget(bool),
    CloseByWindow(bool),
}

impl<E> OptionValue<E> {
    pub fn key(&self) -> OptionKey {
        match self {
            Self::Open(_) => OptionKey::Open,
            Self::OpenClass(_) => OptionKey::OpenClass,
            Self::Timeout(_) => OptionKey::Timeout,
            Self::Target(_) => OptionKey::Target,
            Self::Position(_) => OptionKey::Position,
            Self::CloseByTarget(_) => OptionKey::CloseByTarget,
            Self::CloseByWindow(_) => OptionKey::CloseByWindow,
        }
    }

    /// Parses the JSON representation of the option `key`.
    ///
    /// Targets can only be selectors (or `null` to unset) in JSON.
    pub fn from_json(key: OptionKey, value: serde_json::Value) -> Result<Self> {
        let invalid = |source: serde_json::Error| Error::InvalidValue { key, source };

        let value = match key {
            OptionKey::Open => Self::Open(serde_json::from_value(value).map_err(invalid)?),
            OptionKey::OpenClass => {
                Self::OpenClass(serde_json::from_value(value).map_err(invalid)?)
            }
            OptionKey::Timeout => Self::Timeout(serde_json::from_value(value).map_err(invalid)?),
            OptionKey::Target => {
                let selector: Option<String> = serde_json::from_value(value).map_err(invalid)?;
                Self::Target(selector.map(Target::Selector))
            }
            OptionKey::Position => {
                Self::Position(serde_json::from_value(value).map_err(invalid)?)
            }
            OptionKey::CloseByTarget => {
                Self::CloseByTarget(serde_json::from_value(value).map_err(invalid)?)
            }
            OptionKey::CloseByWindow => {
                Self::CloseByWindow(serde_json::from_value(value).map_err(invalid)?)
            }
        };

        Ok(value)
    }

    /// JSON representation of the value, element targets have none and become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Self::Open(value) | Self::CloseByTarget(value) | Self::CloseByWindow(value) => {
                Value::Bool(*value)
            }
            Self::OpenClass(class) => Value::String(class.clone()),
            Self::Timeout(timeout) => Value::from(*timeout),
            Self::Target(Some(Target::Selector(selector))) => Value::String(selector.clone()),
            Self::Target(_) => Value::Null,
            Self::Position(position) => Value::String(position.to_string()),
        }
    }
}

/// Current option set of a popup instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Options<E> {
    pub open: bool,
    pub open_class: String,
    pub timeout: u32,
    pub target: Option<Target<E>>,
    pub position: Position,
    /// Stored only, closing on target clicks is not implemented.
    pub close_by_target: bool,
    /// Stored only, closing on window clicks is not implemented.
    pub close_by_window: bool,
}

impl<E> Default for Options<E> {
    fn default() -> Self {
        Self {
            open: false,
            open_class: DEFAULT_OPEN_CLASS.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            target: None,
            position: Position::Bottom,
            close_by_target: false,
            close_by_window: true,
        }
    }
}

impl<E: Clone> Options<E> {
    pub fn get(&self, key: OptionKey) -> OptionValue<E> {
        match key {
            OptionKey::Open => OptionValue::Open(self.open),
            OptionKey::OpenClass => OptionValue::OpenClass(self.open_class.clone()),
            OptionKey::Timeout => OptionValue::Timeout(self.timeout),
            OptionKey::Target => OptionValue::Target(self.target.clone()),
            OptionKey::Position => OptionValue::Position(self.position),
            OptionKey::CloseByTarget => OptionValue::CloseByTarget(self.close_by_target),
            OptionKey::CloseByWindow => OptionValue::CloseByWindow(self.close_by_window),
        }
    }
}

impl<E> Options<E> {
    /// Stores `value` and returns what was stored before.
    pub(crate) fn set(&mut self, value: OptionValue<E>) -> OptionValue<E> {
        use std::mem::replace;

        match value {
            OptionValue::Open(v) => OptionValue::Open(replace(&mut self.open, v)),
            OptionValue::OpenClass(v) => OptionValue::OpenClass(replace(&mut self.open_class, v)),
            OptionValue::Timeout(v) => OptionValue::Timeout(replace(&mut self.timeout, v)),
            OptionValue::Target(v) => OptionValue::Target(replace(&mut self.target, v)),
            OptionValue::Position(v) => OptionValue::Position(replace(&mut self.position, v)),
            OptionValue::CloseByTarget(v) => {
                OptionValue::CloseByTarget(replace(&mut self.close_by_target, v))
            }
            OptionValue::CloseByWindow(v) => {
                OptionValue::CloseByWindow(replace(&mut self.close_by_window, v))
            }
        }
    }
}

/// A partial set of options, applied on create and update.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionsPatch<E> {
    open: Option<bool>,
    open_class: Option<String>,
    timeout: Option<u32>,
    target: Option<Option<Target<E>>>,
    position: Option<Position>,
    close_by_target: Option<bool>,
    close_by_window: Option<bool>,
}

impl<E> Default for OptionsPatch<E> {
    fn default() -> Self {
        Self {
            open: None,
            open_class: None,
            timeout: None,
            target: None,
            position: None,
            close_by_target: None,
            close_by_window: None,
        }
    }
}

impl<E> OptionsPatch<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object with camelCase option names, e.g. a `data-popup` attribute.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawPatch = serde_json::from_str(json)?;
        Ok(raw.into())
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let raw: RawPatch = serde_json::from_value(value)?;
        Ok(raw.into())
    }

    pub fn open(mut self, open: bool) -> Self {
        self.open = Some(open);
        self
    }

    pub fn open_class(mut self, class: impl Into<String>) -> Self {
        self.open_class = Some(class.into());
        self
    }

    pub fn timeout(mut self, millis: u32) -> Self {
        self.timeout = Some(millis);
        self
    }

    pub fn target(mut self, target: Target<E>) -> Self {
        self.target = Some(Some(target));
        self
    }

    pub fn without_target(mut self) -> Self {
        self.target = Some(None);
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn close_by_target(mut self, close: bool) -> Self {
        self.close_by_target = Some(close);
        self
    }

    pub fn close_by_window(mut self, close: bool) -> Self {
        self.close_by_window = Some(close);
        self
    }

    /// Whether the patch mentions the target at all, unsetting included.
    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// The contained options in application order.
    ///
    /// The target comes first and `open` last, so an initially open popup
    /// is reflected on the target resolved by the same patch.
    pub fn into_values(self) -> impl Iterator<Item = OptionValue<E>> {
        let Self {
            open,
            open_class,
            timeout,
            target,
            position,
            close_by_target,
            close_by_window,
        } = self;

        [
            target.map(OptionValue::Target),
            open_class.map(OptionValue::OpenClass),
            timeout.map(OptionValue::Timeout),
            position.map(OptionValue::Position),
            close_by_target.map(OptionValue::CloseByTarget),
            close_by_window.map(OptionValue::CloseByWindow),
            open.map(OptionValue::Open),
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPatch {
    open: Option<bool>,
    open_class: Option<String>,
    timeout: Option<u32>,
    #[serde(default, deserialize_with = "present")]
    target: Option<Option<String>>,
    position: Option<Position>,
    close_by_target: Option<bool>,
    close_by_window: Option<bool>,
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_json::Value>,
}

/// Distinguishes an explicit `null` from a missing field.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl<E> From<RawPatch> for OptionsPatch<E> {
    fn from(raw: RawPatch) -> Self {
        for name in raw.unknown.keys() {
            tracing::warn!("ignoring unknown popup option '{name}'");
        }

        Self {
            open: raw.open,
            open_class: raw.open_class,
            timeout: raw.timeout,
            target: raw.target.map(|target| target.map(Target::Selector)),
            position: raw.position,
            close_by_target: raw.close_by_target,
            close_by_window: raw.close_by_window,
        }
    }
}

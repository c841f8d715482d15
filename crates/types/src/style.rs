//! Style snapshots captured from the drawing engine.
//!
//! A [`StyleSnapshot`] is a fixed-shape record: one optional slot per
//! [`StyleAttribute`]. Values are carried through untouched, so a slot holds a
//! loosely-typed [`StyleValue`] rather than anything the engine would
//! interpret.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Opaque style value copied verbatim from the live state.
///
/// `Null` is kept distinct from an absent attribute: the drawing engine uses
/// an explicit `null` for settings such as "no arrowhead".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum StyleValue {
    Null,
    Flag(bool),
    Number(Number),
    Text(String),
    /// Anything else (objects, arrays) the engine chose to store.
    Structured(Value),
}

impl From<Value> for StyleValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Flag(flag),
            Value::Number(number) => Self::Number(number),
            Value::String(text) => Self::Text(text),
            other => Self::Structured(other),
        }
    }
}

impl From<StyleValue> for Value {
    fn from(value: StyleValue) -> Self {
        match value {
            StyleValue::Null => Value::Null,
            StyleValue::Flag(flag) => Value::Bool(flag),
            StyleValue::Number(number) => Value::Number(number),
            StyleValue::Text(text) => Value::String(text),
            StyleValue::Structured(other) => other,
        }
    }
}

impl From<&str> for StyleValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<i64> for StyleValue {
    fn from(number: i64) -> Self {
        Self::Number(number.into())
    }
}

impl From<bool> for StyleValue {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

// A present `null` must land in `Some(StyleValue::Null)`, which the default
// `Option` handling would collapse to `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<StyleValue>, D::Error>
where
    D: Deserializer<'de>,
{
    StyleValue::deserialize(deserializer).map(Some)
}

macro_rules! style_attributes {
    ($($(#[$meta:meta])* $variant:ident => $field:ident : $key:tt,)+) => {
        /// Style settings captured per tool.
        #[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
        pub enum StyleAttribute {
            $($(#[$meta])* $variant,)+
        }

        impl StyleAttribute {
            /// All attributes in persisted order.
            pub const ALL: &'static [StyleAttribute] = &[$(StyleAttribute::$variant,)+];

            /// Key used both in the live state and in the persisted blob.
            pub const fn key(self) -> &'static str {
                match self {
                    $(StyleAttribute::$variant => $key,)+
                }
            }
        }

        /// Immutable set of captured style attributes for one palette.
        #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
        pub struct StyleSnapshot {
            $(
                #[serde(
                    rename = $key,
                    default,
                    deserialize_with = "present",
                    skip_serializing_if = "Option::is_none"
                )]
                $field: Option<StyleValue>,
            )+
            /// Keys found in a stored snapshot that are not style attributes.
            /// Kept so a load/save cycle does not drop them.
            #[serde(flatten)]
            extra: IndexMap<String, Value>,
        }

        impl StyleSnapshot {
            /// Value stored for `attribute`, if it was captured.
            pub fn get(&self, attribute: StyleAttribute) -> Option<&StyleValue> {
                match attribute {
                    $(StyleAttribute::$variant => self.$field.as_ref(),)+
                }
            }

            fn slot_mut(&mut self, attribute: StyleAttribute) -> &mut Option<StyleValue> {
                match attribute {
                    $(StyleAttribute::$variant => &mut self.$field,)+
                }
            }
        }
    };
}

style_attributes! {
    BackgroundColor => background_color: "currentItemBackgroundColor",
    EndArrowhead => end_arrowhead: "currentItemEndArrowhead",
    FillStyle => fill_style: "currentItemFillStyle",
    FontFamily => font_family: "currentItemFontFamily",
    FontSize => font_size: "currentItemFontSize",
    LinearStrokeSharpness => linear_stroke_sharpness: "currentItemLinearStrokeSharpness",
    Opacity => opacity: "currentItemOpacity",
    Roughness => roughness: "currentItemRoughness",
    StartArrowhead => start_arrowhead: "currentItemStartArrowhead",
    StrokeColor => stroke_color: "currentItemStrokeColor",
    StrokeSharpness => stroke_sharpness: "currentItemStrokeSharpness",
    StrokeStyle => stroke_style: "currentItemStrokeStyle",
    StrokeWidth => stroke_width: "currentItemStrokeWidth",
    TextAlign => text_align: "currentItemTextAlign",
}

impl StyleSnapshot {
    /// Returns a copy with `attribute` set to `value`.
    pub fn with(mut self, attribute: StyleAttribute, value: impl Into<StyleValue>) -> Self {
        *self.slot_mut(attribute) = Some(value.into());
        self
    }

    /// Captured attributes in persisted order.
    pub fn iter(&self) -> impl Iterator<Item = (StyleAttribute, &StyleValue)> + '_ {
        StyleAttribute::ALL
            .iter()
            .filter_map(|&attribute| self.get(attribute).map(|value| (attribute, value)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unrecognised keys preserved from storage.
    pub fn extra(&self) -> &IndexMap<String, Value> {
        &self.extra
    }
}

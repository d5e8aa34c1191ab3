//! Loosely typed declarative properties
//!
//! Controls are populated from a parsed key/value set. Values carry a type tag,
//! and asking for the wrong category yields a zero default rather than failing.

use std::collections::HashMap;

use log::warn;

use crate::color::Color;
use crate::control::ControlKind;
use crate::error::PropertyError;

/// Tagged property value
#[derive(Clone, Debug, PartialEq)]
pub enum Property {
    Int(i32),
    Float(f32),
    String(String),
    Bool(bool),
}

impl Default for Property {
    fn default() -> Self {
        Property::String(String::new())
    }
}

/// Shared empty property returned for absent keys
pub(crate) static EMPTY_PROPERTY: Property = Property::String(String::new());

impl Property {
    pub fn as_int(&self) -> i32 {
        match self {
            Property::Int(value) => *value,
            Property::Float(value) => *value as i32,
            _ => 0,
        }
    }

    pub fn as_float(&self) -> f32 {
        match self {
            Property::Int(value) => *value as f32,
            Property::Float(value) => *value,
            _ => 0.0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Property::String(value) => value,
            _ => "",
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Property::Bool(value) => *value,
            _ => false,
        }
    }
}

impl From<i32> for Property {
    fn from(value: i32) -> Self {
        Property::Int(value)
    }
}

impl From<f32> for Property {
    fn from(value: f32) -> Self {
        Property::Float(value)
    }
}

impl From<bool> for Property {
    fn from(value: bool) -> Self {
        Property::Bool(value)
    }
}

impl From<&str> for Property {
    fn from(value: &str) -> Self {
        Property::String(value.to_string())
    }
}

impl From<String> for Property {
    fn from(value: String) -> Self {
        Property::String(value)
    }
}

pub type PropertySet = HashMap<String, Property>;

/// Conversion from a loosely typed property into a field value
pub trait FromProperty: Sized {
    fn from_property(property: &Property) -> Self;
}

impl FromProperty for i32 {
    fn from_property(property: &Property) -> Self {
        property.as_int()
    }
}

impl FromProperty for u32 {
    fn from_property(property: &Property) -> Self {
        property.as_int().max(0) as u32
    }
}

impl FromProperty for usize {
    fn from_property(property: &Property) -> Self {
        property.as_int().max(0) as usize
    }
}

impl FromProperty for f32 {
    fn from_property(property: &Property) -> Self {
        property.as_float()
    }
}

impl FromProperty for bool {
    fn from_property(property: &Property) -> Self {
        property.as_bool()
    }
}

impl FromProperty for String {
    fn from_property(property: &Property) -> Self {
        property.as_str().to_string()
    }
}

impl FromProperty for Color {
    fn from_property(property: &Property) -> Self {
        match property {
            Property::Int(packed) => Color::from_u32(*packed as u32),
            _ => Color::from_hex(property.as_str()).unwrap_or_else(|err| {
                warn!("{err}, using white");
                Color::default()
            }),
        }
    }
}

/// Per-kind declarative `load` hook
///
/// Usually derived with `#[derive(LoadProperties)]` and `#[property("key")]` fields.
pub trait LoadProperties {
    fn load_properties(&mut self, properties: &PropertySet);
}

/// Enum whose variants are spelled as strings in declarative sources
pub trait PropertyEnum: Copy + Default + 'static {
    const NAME: &'static str;
    const VARIANTS: &'static [(&'static str, Self)];

    fn parse(text: &str) -> Result<Self, PropertyError> {
        Self::VARIANTS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(text.trim()))
            .map(|(_, value)| *value)
            .ok_or_else(|| PropertyError::UnknownVariant {
                expected: Self::NAME,
                value: text.to_string(),
            })
    }
}

/// Read an enum-valued property, warning and falling back to the default on bad input
pub fn enum_property<T: PropertyEnum>(property: &Property) -> T {
    T::parse(property.as_str()).unwrap_or_else(|err| {
        warn!("{err}, using default");
        T::default()
    })
}

/// Implement [`PropertyEnum`] and [`FromProperty`] for a fieldless enum
macro_rules! property_enum {
    ($ty:ty, $name:literal, { $($text:literal => $variant:expr),* $(,)? }) => {
        impl $crate::property::PropertyEnum for $ty {
            const NAME: &'static str = $name;
            const VARIANTS: &'static [(&'static str, Self)] = &[$(($text, $variant)),*];
        }

        impl $crate::property::FromProperty for $ty {
            fn from_property(property: &$crate::property::Property) -> Self {
                $crate::property::enum_property(property)
            }
        }
    };
}
pub(crate) use property_enum;

/// Parsed declarative node: a kind, its properties and its children
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlDefinition {
    pub kind: ControlKind,
    pub properties: PropertySet,
    pub children: Vec<ControlDefinition>,
}

impl ControlDefinition {
    pub fn new(kind: ControlKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Property>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn with_child(mut self, child: ControlDefinition) -> Self {
        self.children.push(child);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Align, DimType};

    #[test]
    fn test_category_mismatch_yields_zero() {
        let text = Property::from("hello");
        assert_eq!(text.as_int(), 0);
        assert_eq!(text.as_float(), 0.0);
        assert!(!text.as_bool());

        let flag = Property::from(true);
        assert_eq!(flag.as_str(), "");
        assert_eq!(flag.as_int(), 0);
    }

    #[test]
    fn test_numbers_convert_into_each_other() {
        assert_eq!(Property::from(3i32).as_float(), 3.0);
        assert_eq!(Property::from(2.75f32).as_int(), 2);
    }

    #[test]
    fn test_enum_property() {
        assert_eq!(enum_property::<Align>(&Property::from("bottomRight")), Align::BottomRight);
        assert_eq!(enum_property::<Align>(&Property::from("nowhere")), Align::TopLeft);
        assert!(Align::parse("sideways").is_err());
        assert_eq!(DimType::from_property(&Property::from("percentage")), DimType::Percentage);
    }

    #[test]
    fn test_color_property() {
        assert_eq!(Color::from_property(&Property::from("#000000ff")), Color::BLACK);
        assert_eq!(Color::from_property(&Property::from("not a color")), Color::WHITE);
    }
}

//! Computed style of an element.
//!
//! [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//!
//! "The computed value is the result of resolving the specified value...
//! generally absolutizing it in preparation for inheritance."

use std::collections::BTreeMap;

use serde::Serialize;

use super::color::ColorValue;
use super::properties::property_meta;
use super::value::{Unit, Value};

/// [§ 2 Box Layout Modes](https://www.w3.org/TR/css-display-3/#the-display-properties)
///
/// The display modes the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Display {
    /// "The element generates a block-level box."
    Block,
    /// "The element generates an inline-level box."
    Inline,
    /// "The element and its descendants generate no boxes at all."
    None,
}

/// The full set of computed values for one element.
///
/// Holds a value for every property in the metadata table; lookups for
/// known properties never miss. Property names are kept ordered so that
/// iteration (and serialized snapshots) are deterministic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedStyle {
    values: BTreeMap<String, Value>,
}

impl ComputedStyle {
    /// Build a style from a complete property map.
    ///
    /// The resolver guarantees the map covers every known property; this
    /// constructor does not re-check.
    #[must_use]
    pub fn from_map(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }

    /// Get the computed value of a property.
    ///
    /// Known properties always resolve; the metadata initial value backs the
    /// lookup so a caller can never observe a gap.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<Value> {
        if let Some(value) = self.values.get(property) {
            return Some(value.clone());
        }
        property_meta(property).map(|meta| meta.initial.clone())
    }

    /// Get a property as an absolute pixel length, if it computed to one.
    #[must_use]
    pub fn length_px(&self, property: &str) -> Option<f64> {
        match self.get(property)? {
            Value::Length(px, Unit::Px) => Some(px),
            _ => None,
        }
    }

    /// Get a property as a color, resolving color-valued keywords.
    #[must_use]
    pub fn color(&self, property: &str) -> Option<ColorValue> {
        match self.get(property)? {
            Value::Color(color) => Some(color),
            Value::Keyword(word) => ColorValue::from_named(&word),
            _ => None,
        }
    }

    /// The element's display mode.
    ///
    /// [§ 2.1](https://www.w3.org/TR/css-display-3/#the-display-properties)
    /// Unrecognized display keywords fall back to the initial value, inline.
    #[must_use]
    pub fn display(&self) -> Display {
        match self.get("display") {
            Some(Value::Keyword(word)) => match word.as_str() {
                "block" => Display::Block,
                "none" => Display::None,
                _ => Display::Inline,
            },
            _ => Display::Inline,
        }
    }

    /// Iterate over all (property, value) pairs in name order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_property_lookup_is_none() {
        let style = ComputedStyle::from_map(BTreeMap::new());
        assert_eq!(style.get("flex-grow"), None);
    }

    #[test]
    fn known_property_falls_back_to_initial() {
        let style = ComputedStyle::from_map(BTreeMap::new());
        assert_eq!(style.get("display"), Some(Value::Keyword("inline".into())));
        assert_eq!(style.length_px("margin-top"), Some(0.0));
    }

    #[test]
    fn display_parses_keywords() {
        let mut map = BTreeMap::new();
        let _ = map.insert("display".to_owned(), Value::Keyword("block".into()));
        assert_eq!(ComputedStyle::from_map(map).display(), Display::Block);

        let mut map = BTreeMap::new();
        let _ = map.insert("display".to_owned(), Value::Keyword("none".into()));
        assert_eq!(ComputedStyle::from_map(map).display(), Display::None);
    }
}

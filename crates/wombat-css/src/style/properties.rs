//! Per-property metadata: initial values, inheritance, percentage bases.
//!
//! [§ 5 Defaulting](https://www.w3.org/TR/css-cascade-4/#defaulting)
//!
//! Every property the engine knows is listed here exactly once. The cascade
//! consults this table to drop unknown properties, fill defaulted ones, and
//! decide whether an unset property inherits.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::color::ColorValue;
use super::value::{Unit, Value};

/// Static description of one CSS property.
///
/// [§ 5.1.1 Initial Values](https://www.w3.org/TR/css-cascade-4/#initial-values)
/// "Each property has an initial value, defined in the property's definition
/// table."
#[derive(Debug, Clone)]
pub struct PropertyMeta {
    /// "The initial value of a property" used when the cascade and
    /// inheritance produce no value.
    pub initial: Value,
    /// [§ 5.2 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
    /// "Inheritance propagates property values from parent elements to their
    /// children" — whether this property does so by default.
    pub inherits: bool,
    /// The parent property whose computed length a percentage inside
    /// `calc()` resolves against, when one is defined for this property.
    pub percent_base: Option<&'static str>,
}

fn keyword(word: &str) -> Value {
    Value::Keyword(word.to_owned())
}

const ZERO_PX: Value = Value::Length(0.0, Unit::Px);

/// The one table. Built once, read everywhere.
fn metadata_table() -> &'static HashMap<&'static str, PropertyMeta> {
    static TABLE: OnceLock<HashMap<&'static str, PropertyMeta>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::new();
        let mut add = |name: &'static str, meta: PropertyMeta| {
            let _ = table.insert(name, meta);
        };

        // [CSS Display § 2](https://www.w3.org/TR/css-display-3/#the-display-properties)
        // "Initial: inline"
        add(
            "display",
            PropertyMeta {
                initial: keyword("inline"),
                inherits: false,
                percent_base: None,
            },
        );

        // [CSS Sizing § 3](https://www.w3.org/TR/css-sizing-3/#sizing-properties)
        // "Initial: auto". Percentages: "relative to the width/height of the
        // containing block".
        add(
            "width",
            PropertyMeta {
                initial: keyword("auto"),
                inherits: false,
                percent_base: Some("width"),
            },
        );
        add(
            "height",
            PropertyMeta {
                initial: keyword("auto"),
                inherits: false,
                percent_base: Some("height"),
            },
        );

        // [CSS Box § 3](https://www.w3.org/TR/css-box-4/#margins)
        // "Initial: 0". Margin and padding percentages both resolve against
        // the containing block's *width*, even for the vertical sides.
        for side in ["margin-top", "margin-right", "margin-bottom", "margin-left"] {
            add(
                side,
                PropertyMeta {
                    initial: ZERO_PX,
                    inherits: false,
                    percent_base: Some("width"),
                },
            );
        }

        // [CSS Box § 4](https://www.w3.org/TR/css-box-4/#paddings)
        for side in [
            "padding-top",
            "padding-right",
            "padding-bottom",
            "padding-left",
        ] {
            add(
                side,
                PropertyMeta {
                    initial: ZERO_PX,
                    inherits: false,
                    percent_base: Some("width"),
                },
            );
        }

        // [CSS Backgrounds § 4.3](https://www.w3.org/TR/css-backgrounds-3/#the-border-width)
        // "Initial: medium" — simplified here to 0px since border styles are
        // not modeled and an unstyled border has no used width.
        for side in [
            "border-top-width",
            "border-right-width",
            "border-bottom-width",
            "border-left-width",
        ] {
            add(
                side,
                PropertyMeta {
                    initial: ZERO_PX,
                    inherits: false,
                    percent_base: None,
                },
            );
        }

        // [CSS Color § 3.1](https://www.w3.org/TR/css-color-4/#the-color-property)
        // "Initial: CanvasText" (black), "Inherited: yes"
        add(
            "color",
            PropertyMeta {
                initial: Value::Color(ColorValue::BLACK),
                inherits: true,
                percent_base: None,
            },
        );

        // [CSS Backgrounds § 2.1](https://www.w3.org/TR/css-backgrounds-3/#the-background-color)
        // "Initial: transparent", "Inherited: no"
        add(
            "background-color",
            PropertyMeta {
                initial: keyword("transparent"),
                inherits: false,
                percent_base: None,
            },
        );

        // [CSS Fonts § 3.5](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
        // "Initial: medium", "Inherited: yes", "Percentages: refer to
        // parent element's font size"
        add(
            "font-size",
            PropertyMeta {
                initial: Value::Length(super::value::DEFAULT_FONT_SIZE_PX, Unit::Px),
                inherits: true,
                percent_base: Some("font-size"),
            },
        );

        // [CSS Fonts § 3.2](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
        // "Initial: normal", "Inherited: yes"
        add(
            "font-weight",
            PropertyMeta {
                initial: keyword("normal"),
                inherits: true,
                percent_base: None,
            },
        );

        table
    })
}

/// Look up the metadata for a property name.
///
/// Returns `None` for properties the engine does not know; the cascade
/// drops those declarations.
#[must_use]
pub fn property_meta(name: &str) -> Option<&'static PropertyMeta> {
    metadata_table().get(name)
}

/// Every property name the engine knows.
///
/// Used to give [`super::computed::ComputedStyle`] a value for each known
/// property with no gaps.
pub fn property_names() -> impl Iterator<Item = &'static str> {
    metadata_table().keys().copied()
}

//! CSS value types.
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//!
//! Property-to-behavior dispatch is modeled as a closed tagged variant over
//! value kinds plus the metadata table in [`super::properties`] — never
//! open-ended dynamic dispatch.

use serde::Serialize;

use super::color::ColorValue;

/// User agent default font size.
/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// [§ 4.1 Lengths](https://www.w3.org/TR/css-values-4/#lengths)
///
/// Length units the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    /// [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
    /// "1px = 1/96th of 1in"
    Px,
    /// [§ 5.1.1 Font-relative lengths](https://www.w3.org/TR/css-values-4/#font-relative-lengths)
    /// "Equal to the computed value of the font-size property of the element"
    Em,
}

/// A specified or computed CSS value.
///
/// [§ 4.2 Specified Values](https://www.w3.org/TR/css-cascade-4/#specified)
///
/// Literal variants (`Keyword`, `Length`, `Percentage`, `Color`) pass through
/// the value resolver unchanged; `Calc` is an unevaluated expression that the
/// resolver reduces to a concrete `Length` (or drops to the property's
/// initial value when its context is missing).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    /// An identifier value, e.g. `block` or `auto`.
    Keyword(String),
    /// A dimension, e.g. `12px` or `1.5em`.
    Length(f64, Unit),
    /// [§ 4.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
    /// "Percentages are always relative to another quantity" — here left for
    /// the layout collaborator, except inside `calc()` where the resolver
    /// substitutes the parent dimension.
    Percentage(f64),
    /// An sRGB color.
    Color(ColorValue),
    /// [§ 10 Mathematical Expressions](https://www.w3.org/TR/css-values-4/#math)
    /// An unevaluated `calc()` expression.
    Calc(CalcExpr),
}

impl Value {
    /// Check whether this value is the given keyword (ASCII case-insensitive).
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Self::Keyword(word) if word.eq_ignore_ascii_case(keyword))
    }

    /// Return the value in pixels if it is an absolute length.
    ///
    /// `em` lengths and percentages need outside context and return `None`.
    #[must_use]
    pub fn as_px(&self) -> Option<f64> {
        match self {
            Self::Length(px, Unit::Px) => Some(*px),
            _ => None,
        }
    }
}

/// [§ 10.1 Basic Arithmetic](https://www.w3.org/TR/css-values-4/#calc-func)
///
/// "The calc() function allows mathematical expressions with addition (+),
/// subtraction (-), multiplication (*), division (/), and parentheses."
///
/// An arithmetic expression tree over lengths, percentages, and plain
/// numbers. Built by the parser, evaluated by the value resolver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CalcExpr {
    /// A length leaf, e.g. `20px`.
    Length(f64, Unit),
    /// A percentage leaf, resolved against [`CalcContext::percent_base`].
    Percentage(f64),
    /// A unitless number leaf (multiplication/division operand).
    Number(f64),
    /// `a + b`
    Sum(Box<CalcExpr>, Box<CalcExpr>),
    /// `a - b`
    Difference(Box<CalcExpr>, Box<CalcExpr>),
    /// `a * b`
    Product(Box<CalcExpr>, Box<CalcExpr>),
    /// `a / b`
    Quotient(Box<CalcExpr>, Box<CalcExpr>),
}

/// Context an expression is evaluated against.
///
/// [§ 10.9 Computing Math Functions](https://www.w3.org/TR/css-values-4/#calc-computed-value)
#[derive(Debug, Clone, Copy)]
pub struct CalcContext {
    /// Pixel value percentages resolve against (the parent's computed length
    /// for the property's percent base), when defined.
    pub percent_base: Option<f64>,
    /// Pixel value `em` units resolve against (the parent's computed
    /// font-size, or the UA default at the root).
    pub em_base: f64,
}

impl Default for CalcContext {
    fn default() -> Self {
        Self {
            percent_base: None,
            em_base: DEFAULT_FONT_SIZE_PX,
        }
    }
}

impl CalcExpr {
    /// Evaluate the expression to a pixel value.
    ///
    /// Returns `None` when required context is missing (a percentage with no
    /// percent base) or the arithmetic is undefined (division by zero) — the
    /// resolver then falls back to the property's initial value, never an
    /// error.
    #[must_use]
    pub fn evaluate(&self, context: &CalcContext) -> Option<f64> {
        match self {
            Self::Length(amount, Unit::Px) => Some(*amount),
            Self::Length(amount, Unit::Em) => Some(amount * context.em_base),
            // "A percentage is resolved against another value" — without a
            // base the whole expression is unresolvable.
            Self::Percentage(pct) => context
                .percent_base
                .map(|base| pct * base / 100.0),
            Self::Number(num) => Some(*num),
            Self::Sum(lhs, rhs) => Some(lhs.evaluate(context)? + rhs.evaluate(context)?),
            Self::Difference(lhs, rhs) => Some(lhs.evaluate(context)? - rhs.evaluate(context)?),
            Self::Product(lhs, rhs) => Some(lhs.evaluate(context)? * rhs.evaluate(context)?),
            Self::Quotient(lhs, rhs) => {
                let divisor = rhs.evaluate(context)?;
                if divisor == 0.0 {
                    None
                } else {
                    Some(lhs.evaluate(context)? / divisor)
                }
            }
        }
    }
}

//! CSS parsing, selector matching, cascade, and computed-style resolution
//! for the Wombat engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Style rules with comma-separated selector groups
//!   - Declarations with `!important`, comments, permissive error recovery
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class, ID, and universal selectors
//!   - Compound selectors; descendant and child combinators
//!   - Specificity calculation
//! - **CSS Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Origins (user agent, user, author) and `!important` precedence
//!   - Specificity and source-order tie-breaking
//!   - Inline `style` attributes
//!   - Property inheritance and initial-value defaulting
//! - **Computed Values** ([CSS Values Level 4](https://www.w3.org/TR/css-values-4/))
//!   - Keywords, px/em lengths, percentages, colors
//!   - `calc()` evaluation against parent dimensions
//!
//! # Not Implemented
//!
//! - Sibling combinators, attribute selectors, pseudo-classes
//! - Shorthand properties, at-rules, media queries
//! - Layout (percentages outside `calc()` are passed through)
//!
//! # Entry points
//!
//! Parse with [`parser::parse`], gather sheets into a [`StylesheetSet`],
//! then call [`cascade::resolve_tree`] (or [`cascade::resolve_tree_parallel`])
//! to map every element of a [`wombat_dom::DomTree`] to its
//! [`style::computed::ComputedStyle`].

/// CSS cascade and style computation per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// CSS selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Value types and computed styles per [CSS Values Level 4](https://www.w3.org/TR/css-values-4/).
pub mod style;
/// User-agent stylesheet per [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html).
pub mod ua_stylesheet;

// Re-exports for convenience
pub use cascade::{Origin, resolve_tree, resolve_tree_parallel, resolve_tree_with_author_sheet};
pub use parser::{Declaration, Rule, Stylesheet, parse, parse_inline_style};
pub use selector::{ParsedSelector, Specificity, parse_selector};
pub use style::color::ColorValue;
pub use style::computed::{ComputedStyle, Display};
pub use style::value::{CalcExpr, DEFAULT_FONT_SIZE_PX, Unit, Value};
pub use ua_stylesheet::ua_stylesheet;

/// [§ 6.2 Cascading Origins](https://www.w3.org/TR/css-cascade-4/#cascading-origins)
///
/// A stylesheet tagged with the origin it enters the cascade at.
#[derive(Debug, Clone)]
pub struct SourcedStylesheet {
    /// The parsed stylesheet.
    pub stylesheet: Stylesheet,
    /// Where the stylesheet came from.
    pub origin: Origin,
}

/// The stylesheets of one document, in cascade order.
///
/// [§ 6.4.4 Order of Appearance](https://www.w3.org/TR/css-cascade-4/#cascade-order)
/// "Style sheets are ordered as in final CSS style sheets" — within a tier,
/// later sheets in this list beat earlier ones.
#[derive(Debug, Clone, Default)]
pub struct StylesheetSet {
    /// The sheets, in the order their declarations are positioned.
    pub sheets: Vec<SourcedStylesheet>,
}

impl StylesheetSet {
    /// An empty set. Useful when styling with author sheets only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A set seeded with the engine's UA defaults at user-agent origin.
    #[must_use]
    pub fn with_ua_defaults() -> Self {
        Self {
            sheets: vec![SourcedStylesheet {
                stylesheet: ua_stylesheet().clone(),
                origin: Origin::UserAgent,
            }],
        }
    }

    /// Append a sheet after everything already in the set.
    pub fn push(&mut self, sheet: SourcedStylesheet) {
        self.sheets.push(sheet);
    }
}

//! User-agent stylesheet.
//!
//! [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//!
//! "User agents are expected to have a default style sheet that presents
//! elements of HTML documents in ways consistent with general user
//! expectations."
//!
//! UA rules enter the cascade at the lowest origin: any author or user rule
//! overrides a normal UA rule regardless of specificity.

use std::sync::OnceLock;

use crate::parser::{Stylesheet, parse};

/// [§ 15.3 Rendering — suggested default style sheet](https://html.spec.whatwg.org/multipage/rendering.html#the-css-user-agent-style-sheet-and-presentational-hints)
///
/// A subset of the suggested UA sheet covering the elements and properties
/// the engine models. Written with longhand properties only; the
/// declaration grammar carries one value per declaration.
const UA_CSS: &str = r"
/* [§ 15.3.1 Hidden elements] */
/* 'The following elements must have their display property set to none.' */
head, link, meta, script, style, title, template {
    display: none;
}

/* [§ 15.3.3 Flow content] */
/* 'The following elements must have their display property set to block.' */
html, body, div, p, blockquote, figure, footer, header, main, nav,
section, article, aside, form, fieldset, ul, ol, pre,
h1, h2, h3, h4, h5, h6 {
    display: block;
}

/* [§ 15.3.4 The page] */
/* 'body { margin: 8px; }' */
body {
    margin-top: 8px;
    margin-right: 8px;
    margin-bottom: 8px;
    margin-left: 8px;
}

/* [§ 15.3.6 Sections and headings] */
h1 {
    font-size: 2em;
    font-weight: bold;
    margin-top: 0.67em;
    margin-bottom: 0.67em;
}

h2 {
    font-size: 1.5em;
    font-weight: bold;
    margin-top: 0.83em;
    margin-bottom: 0.83em;
}

h3 {
    font-size: 1.17em;
    font-weight: bold;
    margin-top: 1em;
    margin-bottom: 1em;
}

h4 {
    font-weight: bold;
    margin-top: 1.33em;
    margin-bottom: 1.33em;
}

h5 {
    font-size: 0.83em;
    font-weight: bold;
    margin-top: 1.67em;
    margin-bottom: 1.67em;
}

h6 {
    font-size: 0.67em;
    font-weight: bold;
    margin-top: 2.33em;
    margin-bottom: 2.33em;
}

/* [§ 15.3.5 Grouping content] */
p, blockquote, figure, pre {
    margin-top: 1em;
    margin-bottom: 1em;
}

blockquote, figure {
    margin-left: 40px;
    margin-right: 40px;
}

/* [§ 15.3.7 Lists] */
ol, ul {
    margin-top: 1em;
    margin-bottom: 1em;
    padding-left: 40px;
}

/* [§ 15.3.8 Text-level semantics] */
b, strong {
    font-weight: bold;
}
";

/// Return the parsed UA stylesheet, parsing only once.
///
/// [CSS Cascading § 6.2](https://www.w3.org/TR/css-cascade-4/#cascading-origins)
#[must_use]
pub fn ua_stylesheet() -> &'static Stylesheet {
    static STYLESHEET: OnceLock<Stylesheet> = OnceLock::new();
    STYLESHEET.get_or_init(|| parse(UA_CSS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ua_stylesheet_parses_cleanly() {
        let sheet = ua_stylesheet();
        assert!(!sheet.rules.is_empty());
        // Every rule kept every selector it was written with; a dropped
        // selector here would mean the UA sheet uses unsupported syntax.
        assert!(sheet.rules.iter().all(|rule| !rule.selectors.is_empty()));
    }

    #[test]
    fn hidden_elements_are_display_none() {
        let sheet = ua_stylesheet();
        let hides_head = sheet.rules.iter().any(|rule| {
            rule.declarations
                .iter()
                .any(|d| d.name == "display" && d.value.is_keyword("none"))
        });
        assert!(hides_head);
    }
}

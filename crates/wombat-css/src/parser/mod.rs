//! CSS stylesheet and declaration parsing.
//!
//! [CSS Syntax Level 3](https://www.w3.org/TR/css-syntax-3/)
//!
//! A small recursive-descent parser over the raw text. It recognizes style
//! rules with comma-separated selector groups, declarations with an optional
//! `!important` flag, comments, and the value grammar the engine computes
//! with (keywords, px/em lengths, percentages, colors, and `calc()`).
//!
//! [§ 2 Description of CSS's Syntax](https://www.w3.org/TR/css-syntax-3/#css-intro):
//! "When errors occur in CSS, the parser attempts to recover gracefully,
//! throwing away only the minimum amount of content before returning to
//! parsing as normal." Malformed rules and declarations are dropped with a
//! warning, never surfaced as errors.

use wombat_common::warning::warn_once;

use crate::selector::{ParsedSelector, is_ident_char, parse_selector};
use crate::style::color::ColorValue;
use crate::style::value::{CalcExpr, Unit, Value};

/// [§ 5.1 Style rules](https://www.w3.org/TR/css-syntax-3/#style-rules)
///
/// One style rule: a selector group and its declaration block.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// The selectors this rule applies to. A rule written with a
    /// comma-separated group keeps every selector that parsed.
    pub selectors: Vec<ParsedSelector>,
    /// The declarations of the rule's block, in source order.
    pub declarations: Vec<Declaration>,
}

/// [§ 5.1 Declarations](https://www.w3.org/TR/css-syntax-3/#declaration)
///
/// "Declarations are further categorized as property declarations..."
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// The property name, lowercased.
    pub name: String,
    /// The declared value.
    pub value: Value,
    /// [§ 6.4.2 Importance](https://www.w3.org/TR/css-cascade-4/#importance)
    /// "A declaration is important if it has a !important annotation."
    pub important: bool,
}

/// A parsed stylesheet: an ordered list of style rules.
///
/// [§ 3.1](https://www.w3.org/TR/css-syntax-3/#parsing-overview)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    /// The rules of the sheet, in source order.
    pub rules: Vec<Rule>,
}

/// Parse stylesheet text.
///
/// Never fails: unparsable rules are dropped (with a one-time warning) and
/// parsing continues after them.
#[must_use]
pub fn parse(text: &str) -> Stylesheet {
    let mut parser = CssParser::new(text);
    Stylesheet {
        rules: parser.parse_rules(),
    }
}

/// [CSS Style Attributes § 3](https://www.w3.org/TR/css-style-attr/#syntax)
///
/// "The value of the style attribute must match the syntax of the contents
/// of a CSS declaration block" — a bare declaration list, no selector and
/// no braces.
#[must_use]
pub fn parse_inline_style(text: &str) -> Vec<Declaration> {
    let mut parser = CssParser::new(text);
    parser.parse_declaration_list(false)
}

/// Character-level cursor over the source text.
struct CssParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> CssParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn next_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn consume_char(&mut self) -> Option<char> {
        let c = self.next_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn consume_while(&mut self, test: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.next_char().is_some_and(&test) {
            let _ = self.consume_char();
        }
        &self.input[start..self.pos]
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    /// Skip whitespace and `/* ... */` comments. An unterminated comment
    /// swallows the rest of the input, per spec.
    fn skip_whitespace(&mut self) {
        loop {
            let _ = self.consume_while(char::is_whitespace);
            if self.input[self.pos..].starts_with("/*") {
                match self.input[self.pos + 2..].find("*/") {
                    Some(end) => self.pos += 2 + end + 2,
                    None => self.pos = self.input.len(),
                }
            } else {
                return;
            }
        }
    }

    fn consume_ident(&mut self) -> &'a str {
        self.consume_while(is_ident_char)
    }

    /// Skip past the end of the current malformed construct: to the next
    /// `;` at brace depth zero, or past the closing `}`.
    fn skip_to_recovery_point(&mut self) {
        let mut depth = 0u32;
        while let Some(c) = self.consume_char() {
            match c {
                '{' => depth += 1,
                '}' => {
                    if depth <= 1 {
                        return;
                    }
                    depth -= 1;
                }
                ';' if depth == 0 => return,
                _ => {}
            }
        }
    }

    /// Parse rules until end of input.
    fn parse_rules(&mut self) -> Vec<Rule> {
        let mut rules = Vec::new();
        loop {
            self.skip_whitespace();
            if self.eof() {
                return rules;
            }
            if let Some(rule) = self.parse_rule() {
                if !rule.selectors.is_empty() {
                    rules.push(rule);
                }
            }
        }
    }

    /// Parse one style rule, or drop it and recover.
    fn parse_rule(&mut self) -> Option<Rule> {
        // At-rules (@media, @import, ...) are outside the engine's scope.
        if self.next_char() == Some('@') {
            let name = format!("@{}", {
                let _ = self.consume_char();
                self.consume_ident()
            });
            warn_once("CSS", &format!("dropped unsupported at-rule '{name}'"));
            self.skip_to_recovery_point();
            return None;
        }

        let selector_text = self.consume_while(|c| c != '{' && c != '}' && c != ';');
        if self.next_char() != Some('{') {
            // Stray text such as `}` or `foo;` at the top level.
            warn_once(
                "CSS",
                &format!("dropped malformed rule near '{}'", snippet(selector_text)),
            );
            let _ = self.consume_char();
            return None;
        }

        // [Selectors § 4.1](https://www.w3.org/TR/selectors-4/#grouping)
        // "A selector list is a comma-separated list of selectors." Invalid
        // members are dropped individually; the rule survives as long as one
        // selector parses.
        let mut selectors = Vec::new();
        for raw in selector_text.split(',') {
            match parse_selector(raw) {
                Some(parsed) => selectors.push(parsed),
                None => {
                    warn_once(
                        "CSS",
                        &format!("dropped unsupported selector '{}'", raw.trim()),
                    );
                }
            }
        }

        let _ = self.consume_char(); // '{'
        let declarations = self.parse_declaration_list(true);
        Some(Rule {
            selectors,
            declarations,
        })
    }

    /// Parse a declaration list, either inside a block (consuming the
    /// closing `}`) or bare, as in a style attribute.
    fn parse_declaration_list(&mut self, in_block: bool) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        loop {
            self.skip_whitespace();
            match self.next_char() {
                None => return declarations,
                Some('}') => {
                    let _ = self.consume_char();
                    if in_block {
                        return declarations;
                    }
                    // A stray '}' in a style attribute; skipping it keeps
                    // the cursor moving.
                    warn_once("CSS", "dropped stray '}' in declaration list");
                }
                Some(';') => {
                    let _ = self.consume_char();
                }
                Some(_) => {
                    if let Some(decl) = self.parse_declaration() {
                        declarations.push(decl);
                    }
                }
            }
        }
    }

    /// [§ 5.4.5 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn parse_declaration(&mut self) -> Option<Declaration> {
        let name = self.consume_ident().to_ascii_lowercase();
        self.skip_whitespace();
        if name.is_empty() || self.next_char() != Some(':') {
            warn_once("CSS", &format!("dropped malformed declaration near '{name}'"));
            self.skip_declaration();
            return None;
        }
        let _ = self.consume_char(); // ':'
        self.skip_whitespace();

        let Some(value) = self.parse_value() else {
            warn_once("CSS", &format!("dropped declaration '{name}' with unparsable value"));
            self.skip_declaration();
            return None;
        };

        // [§ 6.4.2 Importance](https://www.w3.org/TR/css-cascade-4/#importance)
        // "!important"
        self.skip_whitespace();
        let mut important = false;
        if self.next_char() == Some('!') {
            let _ = self.consume_char();
            self.skip_whitespace();
            let word = self.consume_ident();
            if word.eq_ignore_ascii_case("important") {
                important = true;
            } else {
                warn_once("CSS", &format!("dropped declaration '{name}' with bad '!{word}'"));
                self.skip_declaration();
                return None;
            }
        }

        // Anything left before the terminator means trailing junk.
        self.skip_whitespace();
        match self.next_char() {
            None | Some(';' | '}') => Some(Declaration {
                name,
                value,
                important,
            }),
            Some(_) => {
                warn_once(
                    "CSS",
                    &format!("dropped declaration '{name}' with trailing content"),
                );
                self.skip_declaration();
                None
            }
        }
    }

    /// Skip the rest of a bad declaration, stopping before `}`.
    fn skip_declaration(&mut self) {
        let _ = self.consume_while(|c| c != ';' && c != '}');
        if self.next_char() == Some(';') {
            let _ = self.consume_char();
        }
    }

    /// Parse a single component value.
    ///
    /// [CSS Values § 2](https://www.w3.org/TR/css-values-4/#value-defs)
    fn parse_value(&mut self) -> Option<Value> {
        match self.next_char()? {
            '#' => {
                let _ = self.consume_char();
                let hex = self.consume_ident();
                ColorValue::from_hex(hex).map(Value::Color)
            }
            c if c.is_ascii_digit() || c == '.' || c == '-' || c == '+' => {
                let (amount, dimension) = self.parse_number_with_unit()?;
                match dimension {
                    Dimension::Px => Some(Value::Length(amount, Unit::Px)),
                    Dimension::Em => Some(Value::Length(amount, Unit::Em)),
                    Dimension::Percent => Some(Value::Percentage(amount)),
                    // Bare numbers are not a computed value the engine
                    // models outside calc().
                    Dimension::None => None,
                }
            }
            c if is_ident_char(c) => {
                let ident = self.consume_ident().to_ascii_lowercase();
                if self.next_char() == Some('(') {
                    let _ = self.consume_char();
                    return self.parse_function(&ident);
                }
                // Named colors become color values; everything else stays a
                // keyword for per-property interpretation.
                match ColorValue::from_named(&ident) {
                    Some(color) => Some(Value::Color(color)),
                    None => Some(Value::Keyword(ident)),
                }
            }
            _ => None,
        }
    }

    /// Parse `calc(...)`, `rgb(...)`, `rgba(...)` after the opening paren.
    fn parse_function(&mut self, name: &str) -> Option<Value> {
        match name {
            "calc" => {
                let expr = self.parse_calc_sum()?;
                self.skip_whitespace();
                if self.consume_char() != Some(')') {
                    return None;
                }
                Some(Value::Calc(expr))
            }
            "rgb" | "rgba" => self.parse_rgb_args(),
            _ => None,
        }
    }

    /// [CSS Color § 4.1](https://www.w3.org/TR/css-color-4/#rgb-functions)
    /// Legacy comma syntax: `rgb(r, g, b)` and `rgba(r, g, b, a)`.
    fn parse_rgb_args(&mut self) -> Option<Value> {
        let mut channels = Vec::new();
        loop {
            self.skip_whitespace();
            match self.next_char()? {
                ')' => {
                    let _ = self.consume_char();
                    break;
                }
                ',' | '/' => {
                    let _ = self.consume_char();
                }
                _ => {
                    let (amount, dimension) = self.parse_number_with_unit()?;
                    let scaled = match dimension {
                        Dimension::None => amount,
                        // "100% = 255" for channels; alpha is rescaled below.
                        Dimension::Percent => amount * 255.0 / 100.0,
                        Dimension::Px | Dimension::Em => return None,
                    };
                    channels.push((scaled, dimension));
                }
            }
        }
        match channels.as_slice() {
            [(r, _), (g, _), (b, _)] => {
                Some(Value::Color(ColorValue::from_rgb_channels(*r, *g, *b, None)))
            }
            [(r, _), (g, _), (b, _), (a, a_dim)] => {
                let alpha = match a_dim {
                    Dimension::Percent => a / 255.0, // undo channel scaling, then 0-1
                    _ => *a,
                };
                Some(Value::Color(ColorValue::from_rgb_channels(
                    *r,
                    *g,
                    *b,
                    Some(alpha),
                )))
            }
            _ => None,
        }
    }

    /// [§ 10.1](https://www.w3.org/TR/css-values-4/#calc-syntax)
    /// `<calc-sum> = <calc-product> [ [ '+' | '-' ] <calc-product> ]*`
    fn parse_calc_sum(&mut self) -> Option<CalcExpr> {
        let mut expr = self.parse_calc_product()?;
        loop {
            self.skip_whitespace();
            match self.next_char() {
                Some('+') => {
                    let _ = self.consume_char();
                    let rhs = self.parse_calc_product()?;
                    expr = CalcExpr::Sum(Box::new(expr), Box::new(rhs));
                }
                Some('-') => {
                    let _ = self.consume_char();
                    let rhs = self.parse_calc_product()?;
                    expr = CalcExpr::Difference(Box::new(expr), Box::new(rhs));
                }
                _ => return Some(expr),
            }
        }
    }

    /// `<calc-product> = <calc-value> [ [ '*' | '/' ] <calc-value> ]*`
    fn parse_calc_product(&mut self) -> Option<CalcExpr> {
        let mut expr = self.parse_calc_value()?;
        loop {
            self.skip_whitespace();
            match self.next_char() {
                Some('*') => {
                    let _ = self.consume_char();
                    let rhs = self.parse_calc_value()?;
                    expr = CalcExpr::Product(Box::new(expr), Box::new(rhs));
                }
                Some('/') => {
                    let _ = self.consume_char();
                    let rhs = self.parse_calc_value()?;
                    expr = CalcExpr::Quotient(Box::new(expr), Box::new(rhs));
                }
                _ => return Some(expr),
            }
        }
    }

    /// `<calc-value> = <number> | <dimension> | <percentage> | ( <calc-sum> )`
    fn parse_calc_value(&mut self) -> Option<CalcExpr> {
        self.skip_whitespace();
        match self.next_char()? {
            '(' => {
                let _ = self.consume_char();
                let inner = self.parse_calc_sum()?;
                self.skip_whitespace();
                if self.consume_char() != Some(')') {
                    return None;
                }
                Some(inner)
            }
            _ => {
                let (amount, dimension) = self.parse_number_with_unit()?;
                match dimension {
                    Dimension::Px => Some(CalcExpr::Length(amount, Unit::Px)),
                    Dimension::Em => Some(CalcExpr::Length(amount, Unit::Em)),
                    Dimension::Percent => Some(CalcExpr::Percentage(amount)),
                    Dimension::None => Some(CalcExpr::Number(amount)),
                }
            }
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    /// followed by an optional unit or `%`.
    fn parse_number_with_unit(&mut self) -> Option<(f64, Dimension)> {
        let start = self.pos;
        if matches!(self.next_char(), Some('-' | '+')) {
            let _ = self.consume_char();
        }
        let _ = self.consume_while(|c| c.is_ascii_digit() || c == '.');
        let amount: f64 = self.input[start..self.pos].parse().ok()?;

        if self.next_char() == Some('%') {
            let _ = self.consume_char();
            return Some((amount, Dimension::Percent));
        }
        let unit = self.consume_while(|c| c.is_ascii_alphabetic());
        match unit.to_ascii_lowercase().as_str() {
            "" => Some((amount, Dimension::None)),
            "px" => Some((amount, Dimension::Px)),
            "em" => Some((amount, Dimension::Em)),
            other => {
                warn_once("CSS", &format!("unsupported unit '{other}'"));
                None
            }
        }
    }
}

/// Dimension tag attached to a parsed number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    None,
    Px,
    Em,
    Percent,
}

/// First few characters of malformed input, for warnings.
fn snippet(text: &str) -> String {
    let trimmed = text.trim();
    let mut end = trimmed.len().min(32);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Specificity;

    #[test]
    fn parses_rule_with_selector_group() {
        let sheet = parse("h1, .note { color: red; margin-top: 4px }");
        assert_eq!(sheet.rules.len(), 1);
        let rule = &sheet.rules[0];
        assert_eq!(rule.selectors.len(), 2);
        assert_eq!(rule.selectors[0].specificity, Specificity::new(0, 0, 1));
        assert_eq!(rule.selectors[1].specificity, Specificity::new(0, 1, 0));
        assert_eq!(rule.declarations.len(), 2);
        assert_eq!(rule.declarations[0].name, "color");
        assert_eq!(
            rule.declarations[0].value,
            Value::Color(ColorValue::opaque(255, 0, 0))
        );
        assert_eq!(
            rule.declarations[1].value,
            Value::Length(4.0, Unit::Px)
        );
    }

    #[test]
    fn important_flag_is_parsed() {
        let sheet = parse("p { color: blue !important; width: 10px; }");
        let decls = &sheet.rules[0].declarations;
        assert!(decls[0].important);
        assert!(!decls[1].important);
    }

    #[test]
    fn comments_are_skipped() {
        let sheet = parse("/* top */ p { /* inner */ width: 10px; /* after */ }");
        assert_eq!(sheet.rules[0].declarations.len(), 1);
    }

    #[test]
    fn malformed_declaration_is_dropped_not_fatal() {
        let sheet = parse("p { color red; width: 10px; }");
        let decls = &sheet.rules[0].declarations;
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "width");
    }

    #[test]
    fn malformed_rule_does_not_poison_following_rules() {
        let sheet = parse("p { color: red; h1 { width: 10px; } div { height: 5px; }");
        // Recovery resumes after the first unbalanced block closes.
        assert!(sheet.rules.iter().any(|r| {
            r.declarations
                .iter()
                .any(|d| d.name == "height" && d.value == Value::Length(5.0, Unit::Px))
        }));
    }

    #[test]
    fn at_rules_are_dropped() {
        let sheet = parse("@media screen { p { color: red; } } div { width: 1px; }");
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].declarations[0].name, "width");
    }

    #[test]
    fn unsupported_selector_in_group_is_dropped_alone() {
        let sheet = parse("p:hover, div { width: 2px; }");
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].selectors.len(), 1);
    }

    #[test]
    fn calc_expression_parses_with_precedence() {
        let sheet = parse("div { width: calc(50% - 20px * 2); }");
        let Value::Calc(expr) = &sheet.rules[0].declarations[0].value else {
            panic!("expected calc value");
        };
        assert_eq!(
            *expr,
            CalcExpr::Difference(
                Box::new(CalcExpr::Percentage(50.0)),
                Box::new(CalcExpr::Product(
                    Box::new(CalcExpr::Length(20.0, Unit::Px)),
                    Box::new(CalcExpr::Number(2.0)),
                )),
            )
        );
    }

    #[test]
    fn rgb_function_values() {
        let sheet = parse("div { color: rgb(10, 20, 30); background-color: rgba(0, 0, 0, 0.5); }");
        let decls = &sheet.rules[0].declarations;
        assert_eq!(
            decls[0].value,
            Value::Color(ColorValue::opaque(10, 20, 30))
        );
        assert_eq!(
            decls[1].value,
            Value::Color(ColorValue { r: 0, g: 0, b: 0, a: 128 })
        );
    }

    #[test]
    fn inline_style_declaration_list() {
        let decls = parse_inline_style("color: blue; width: 10px");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].name, "color");
        assert_eq!(decls[1].value, Value::Length(10.0, Unit::Px));
    }

    #[test]
    fn inline_style_with_stray_brace_still_terminates() {
        let decls = parse_inline_style("color: red; } width: 4px");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].name, "width");
    }

    #[test]
    fn named_colors_become_color_values() {
        let sheet = parse("p { color: purple; display: block; }");
        let decls = &sheet.rules[0].declarations;
        assert!(matches!(decls[0].value, Value::Color(_)));
        assert_eq!(decls[1].value, Value::Keyword("block".into()));
    }
}

//! CSS selector parsing and matching
//!
//! This module implements selector parsing and matching per
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/), restricted to the
//! subset the engine renders: type, class, ID, and universal simple
//! selectors combined with descendant and child combinators. Anything
//! outside the subset fails to parse; the stylesheet parser then drops the
//! selector rather than guessing at its meaning.

use wombat_dom::{DomTree, ElementData, NodeId};

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type."
    /// Examples: `div`, `p`, `h1`
    Type(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// "The class selector is given as a full stop (. U+002E) immediately
    /// followed by an identifier."
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    /// "An ID selector is a hash (#, U+0023) immediately followed by the
    /// ID value, which is an identifier."
    Id(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "The universal selector is a single asterisk (*) and represents the
    /// qualified name of any element type."
    Universal,
}

impl SimpleSelector {
    /// Check if this simple selector matches the given element.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            // "A type selector... represents an element in the document tree
            // with the same qualified name as the identifier."
            Self::Type(name) => element.tag_name.eq_ignore_ascii_case(name),
            Self::Class(class_name) => element.classes().contains(class_name.as_str()),
            Self::Id(id) => element.id().is_some_and(|el_id| el_id == id),
            Self::Universal => true,
        }
    }
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The simple selectors that make up this compound selector.
    pub simple_selectors: Vec<SimpleSelector>,
}

impl CompoundSelector {
    fn matches(&self, element: &ElementData) -> bool {
        self.simple_selectors
            .iter()
            .all(|simple| simple.matches(element))
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    Descendant,

    /// [§ 16.2](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is
    /// a direct child of element A."
    Child,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a chain of one or more compound selectors
/// separated by combinators."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector.
    /// "The elements represented by a complex selector are the elements
    /// matched by the last compound selector in the complex selector."
    pub subject: CompoundSelector,

    /// Chain of (combinator, compound) pairs going left from the subject.
    ///
    /// For `a > b c` the subject is `c` and the chain is
    /// `[(Descendant, b), (Child, a)]`. Right-to-left order because
    /// matching walks up from the subject.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

impl ComplexSelector {
    /// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// Sum the specificity contributions of every simple selector in the
    /// chain, the subject included.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        let mut spec = compound_specificity(&self.subject);
        for (_, compound) in &self.combinators {
            let s = compound_specificity(compound);
            spec.0 += s.0;
            spec.1 += s.1;
            spec.2 += s.2;
        }
        spec
    }
}

fn compound_specificity(compound: &CompoundSelector) -> Specificity {
    let mut spec = Specificity::default();
    for simple in &compound.simple_selectors {
        match simple {
            // "count the number of ID selectors in the selector (= A)"
            SimpleSelector::Id(_) => spec.0 += 1,
            // "count the number of class selectors... (= B)"
            SimpleSelector::Class(_) => spec.1 += 1,
            // "count the number of type selectors... (= C)"
            SimpleSelector::Type(_) => spec.2 += 1,
            // "ignore the universal selector"
            SimpleSelector::Universal => {}
        }
    }
    spec
}

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
/// "A selector's specificity is calculated for a given element as follows:
///  - count the number of ID selectors in the selector (= A)
///  - count the number of class selectors, attributes selectors, and
///    pseudo-classes in the selector (= B)
///  - count the number of type selectors and pseudo-elements in the
///    selector (= C)
///
/// Specificities are compared by comparing the three components in order."
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// [CSS Style Attributes § 3](https://www.w3.org/TR/css-style-attr/#interpret)
    /// Declarations from a `style` attribute outrank any selector; modeled
    /// as a specificity above every achievable one.
    pub const INLINE: Self = Self(u32::MAX, u32::MAX, u32::MAX);

    /// Create a specificity from its (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }
}

/// A parsed selector ready for matching, with its specificity precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelector {
    /// The complex selector (compound selectors with combinators).
    pub complex: ComplexSelector,
    /// The specificity of this selector.
    pub specificity: Specificity,
}

impl ParsedSelector {
    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// Match this selector against the element at `node_id`, walking the
    /// combinator chain up through the tree.
    #[must_use]
    pub fn matches_in_tree(&self, tree: &DomTree, node_id: NodeId) -> bool {
        let Some(element) = tree.as_element(node_id) else {
            return false;
        };
        if !self.complex.subject.matches(element) {
            return false;
        }
        chain_matches(tree, &self.complex.combinators, node_id)
    }
}

/// Match the remaining combinator chain from `current_id` upward.
///
/// A descendant step may be satisfied by any ancestor, so the nearest
/// matching ancestor is not committed to: if the rest of the chain fails
/// there, farther ancestors are tried. `a > b c` must match a `c` whose
/// nearest `b` ancestor is not a child of an `a` when a farther `b` is.
fn chain_matches(
    tree: &DomTree,
    chain: &[(Combinator, CompoundSelector)],
    current_id: NodeId,
) -> bool {
    let Some(((combinator, compound), rest)) = chain.split_first() else {
        return true;
    };
    match combinator {
        // "an arbitrary descendant of some ancestor element A"
        Combinator::Descendant => tree.ancestors(current_id).any(|ancestor_id| {
            tree.as_element(ancestor_id)
                .is_some_and(|ancestor| compound.matches(ancestor))
                && chain_matches(tree, rest, ancestor_id)
        }),
        // "a direct child of element A" — the immediate parent must be an
        // element and match.
        Combinator::Child => {
            let Some(parent_id) = tree.parent(current_id) else {
                return false;
            };
            tree.as_element(parent_id)
                .is_some_and(|parent| compound.matches(parent))
                && chain_matches(tree, rest, parent_id)
        }
    }
}

/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
pub(crate) const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

/// Parse a raw selector string into a [`ParsedSelector`].
///
/// [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
///
/// Supports type, class, ID, and universal simple selectors, compounds of
/// them (`div.note#main`), and the descendant and child combinators.
/// Returns `None` for anything else (attribute selectors, pseudo-classes,
/// sibling combinators); the caller drops the selector.
#[must_use]
pub fn parse_selector(raw: &str) -> Option<ParsedSelector> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut compounds: Vec<CompoundSelector> = Vec::new();
    let mut combinators_between: Vec<Combinator> = Vec::new();
    let mut current: Vec<SimpleSelector> = Vec::new();

    let mut chars = trimmed.chars().peekable();

    let collect_ident = |chars: &mut std::iter::Peekable<std::str::Chars<'_>>| {
        let mut ident = String::new();
        while chars.peek().copied().is_some_and(is_ident_char) {
            // peek just confirmed the next char exists
            if let Some(ch) = chars.next() {
                ident.push(ch);
            }
        }
        ident
    };

    while let Some(&c) = chars.peek() {
        match c {
            '.' => {
                let _ = chars.next();
                let name = collect_ident(&mut chars);
                if name.is_empty() {
                    return None;
                }
                current.push(SimpleSelector::Class(name));
            }
            '#' => {
                let _ = chars.next();
                let name = collect_ident(&mut chars);
                if name.is_empty() {
                    return None;
                }
                current.push(SimpleSelector::Id(name));
            }
            '*' => {
                let _ = chars.next();
                current.push(SimpleSelector::Universal);
            }
            // Whitespace is either the descendant combinator or padding
            // around an explicit `>`.
            c if c.is_ascii_whitespace() => {
                while chars.peek().is_some_and(|ch| ch.is_ascii_whitespace()) {
                    let _ = chars.next();
                }
                match chars.peek() {
                    None => break,
                    Some('>') => {}
                    Some(_) => {
                        if current.is_empty() {
                            return None;
                        }
                        compounds.push(CompoundSelector {
                            simple_selectors: std::mem::take(&mut current),
                        });
                        combinators_between.push(Combinator::Descendant);
                    }
                }
            }
            '>' => {
                let _ = chars.next();
                if current.is_empty() {
                    return None;
                }
                compounds.push(CompoundSelector {
                    simple_selectors: std::mem::take(&mut current),
                });
                combinators_between.push(Combinator::Child);
                while chars.peek().is_some_and(|ch| ch.is_ascii_whitespace()) {
                    let _ = chars.next();
                }
            }
            c if is_ident_start_char(c) => {
                let name = collect_ident(&mut chars);
                current.push(SimpleSelector::Type(name));
            }
            // Unsupported syntax: attribute selectors, pseudo-classes,
            // sibling combinators, commas (split by the caller), etc.
            _ => return None,
        }
    }

    if current.is_empty() {
        // Trailing combinator such as `div >`.
        return None;
    }
    compounds.push(CompoundSelector {
        simple_selectors: current,
    });

    // "A B C" yields 3 compounds and 2 combinators.
    debug_assert_eq!(compounds.len(), combinators_between.len() + 1);

    let subject = compounds.pop()?;
    let chain = compounds
        .into_iter()
        .zip(combinators_between)
        .rev()
        .map(|(compound, combinator)| (combinator, compound))
        .collect();

    let complex = ComplexSelector {
        subject,
        combinators: chain,
    };
    let specificity = complex.specificity();
    Some(ParsedSelector {
        complex,
        specificity,
    })
}

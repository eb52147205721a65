//! CSS cascading and style computation.
//!
//! This module implements style computation per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/):
//! selector matching, cascade sorting by origin, importance, specificity and
//! source order, and value resolution (inheritance, defaulting, unit
//! absolutization, and `calc()` evaluation).

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use wombat_common::warning::warn_once;
use wombat_dom::{DomTree, NodeId, NodeType};

use crate::parser::{Declaration, Rule, parse_inline_style};
use crate::selector::Specificity;
use crate::style::computed::ComputedStyle;
use crate::style::properties::{PropertyMeta, property_meta, property_names};
use crate::style::value::{CalcContext, DEFAULT_FONT_SIZE_PX, Unit, Value};
use crate::{SourcedStylesheet, StylesheetSet};

/// [§ 6.2 Cascading Origins](https://www.w3.org/TR/css-cascade-4/#cascading-origins)
///
/// "Each style rule has a cascade origin, which determines where it enters
/// the cascade."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// "User-Agent Origin... stylesheets provided by the user agent."
    UserAgent,
    /// "User Origin... added by the user."
    User,
    /// "Author Origin... stylesheets linked by the document."
    Author,
}

impl Origin {
    /// [§ 6.4.1 Cascading Origins](https://www.w3.org/TR/css-cascade-4/#cascade-origin)
    ///
    /// "The origin precedence order, from highest to lowest:
    ///   1. Important user agent declarations
    ///   2. Important user declarations
    ///   3. Important author declarations
    ///   4. Normal author declarations
    ///   5. Normal user declarations
    ///   6. Normal user agent declarations"
    ///
    /// Returned as an ascending tier: higher beats lower. Importance
    /// inverts the origin order.
    #[must_use]
    pub const fn tier(self, important: bool) -> u8 {
        match (self, important) {
            (Self::UserAgent, false) => 0,
            (Self::User, false) => 1,
            (Self::Author, false) => 2,
            (Self::Author, true) => 3,
            (Self::User, true) => 4,
            (Self::UserAgent, true) => 5,
        }
    }
}

/// [§ 6.4 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// The full precedence of one declaration. Derived lexicographic ordering
/// gives the cascade sort: origin-and-importance tier first, then
/// specificity, then order of appearance.
///
/// Positions are globally unique across all sheets, so two priorities are
/// never equal and the winner per property is always well defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct CascadePriority {
    tier: u8,
    specificity: Specificity,
    /// [§ 6.4.4 Order of Appearance](https://www.w3.org/TR/css-cascade-4/#cascade-order)
    /// "The last declaration in document order wins."
    position: u64,
}

/// Style-attribute declarations sort above every stylesheet declaration of
/// the same tier; positions past this base are reserved for them.
const INLINE_POSITION_BASE: u64 = 1 << 63;

/// A rule annotated with its origin and the position of its first
/// declaration. Declaration `j` of the rule has position `first_position + j`.
struct IndexedRule<'a> {
    origin: Origin,
    rule: &'a Rule,
    first_position: u64,
}

/// Flatten a stylesheet set into indexed rules, assigning each declaration
/// a globally unique, monotonically increasing position.
fn index_rules(sheets: &StylesheetSet) -> Vec<IndexedRule<'_>> {
    let mut indexed = Vec::new();
    let mut position: u64 = 0;
    for sheet in &sheets.sheets {
        for rule in &sheet.stylesheet.rules {
            indexed.push(IndexedRule {
                origin: sheet.origin,
                rule,
                first_position: position,
            });
            position += rule.declarations.len() as u64;
        }
    }
    indexed
}

/// [§ 6.1 Filtering](https://www.w3.org/TR/css-cascade-4/#filtering) and
/// [§ 6.4 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// Collect the winning declared value per property for one element:
/// match every rule against it, then keep the highest-priority declaration
/// for each property name.
fn winning_declarations(
    tree: &DomTree,
    id: NodeId,
    rules: &[IndexedRule<'_>],
) -> HashMap<String, Value> {
    let mut best: HashMap<&str, (CascadePriority, &Value)> = HashMap::new();

    for indexed in rules {
        // A rule written with a selector group matches with the highest
        // specificity among its matching selectors.
        let matched_specificity = indexed
            .rule
            .selectors
            .iter()
            .filter(|selector| selector.matches_in_tree(tree, id))
            .map(|selector| selector.specificity)
            .max();
        let Some(specificity) = matched_specificity else {
            continue;
        };

        for (offset, decl) in indexed.rule.declarations.iter().enumerate() {
            apply_candidate(
                &mut best,
                decl,
                CascadePriority {
                    tier: indexed.origin.tier(decl.important),
                    specificity,
                    position: indexed.first_position + offset as u64,
                },
            );
        }
    }

    // [CSS Style Attributes § 3](https://www.w3.org/TR/css-style-attr/#interpret)
    // "The declarations... are considered to be author origin, with a
    // specificity higher than any selector." They also come after every
    // stylesheet declaration in order of appearance.
    let inline_declarations = tree
        .as_element(id)
        .and_then(|element| element.inline_style())
        .map(parse_inline_style)
        .unwrap_or_default();
    for (offset, decl) in inline_declarations.iter().enumerate() {
        apply_candidate(
            &mut best,
            decl,
            CascadePriority {
                tier: Origin::Author.tier(decl.important),
                specificity: Specificity::INLINE,
                position: INLINE_POSITION_BASE + offset as u64,
            },
        );
    }

    best.into_iter()
        .map(|(name, (_, value))| (name.to_owned(), value.clone()))
        .collect()
}

/// Keep the declaration if it beats the current best for its property.
/// Unknown properties are dropped here, before they can win anything.
fn apply_candidate<'a>(
    best: &mut HashMap<&'a str, (CascadePriority, &'a Value)>,
    decl: &'a Declaration,
    priority: CascadePriority,
) {
    if property_meta(&decl.name).is_none() {
        warn_once(
            "CSS",
            &format!("dropped declaration with unknown property '{}'", decl.name),
        );
        return;
    }
    match best.get(decl.name.as_str()) {
        Some((current, _)) if *current > priority => {}
        _ => {
            let _ = best.insert(decl.name.as_str(), (priority, &decl.value));
        }
    }
}

/// [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
///
/// Resolve one property: pick the cascaded value, defaulting through
/// inheritance or the initial value, then absolutize `em` lengths and
/// evaluate `calc()`.
fn resolve_value(
    name: &str,
    meta: &PropertyMeta,
    declared: Option<&Value>,
    parent: Option<&ComputedStyle>,
    em_base: f64,
) -> Value {
    let Some(declared) = declared else {
        // [§ 5.1.2 Defaulting to inherit or initial]
        // "If the cascade results in no value... if the property is
        // inherited, use the computed value of the parent; otherwise use
        // the property's initial value." The root has no parent and always
        // takes the initial value.
        if meta.inherits
            && let Some(parent_style) = parent
            && let Some(inherited) = parent_style.get(name)
        {
            return inherited;
        }
        return meta.initial.clone();
    };

    match declared {
        // "font-relative lengths... are computed to absolute lengths"
        Value::Length(amount, Unit::Em) => Value::Length(amount * em_base, Unit::Px),
        Value::Calc(expr) => {
            let percent_base = meta.percent_base.and_then(|base_property| {
                parent.and_then(|parent_style| parent_style.length_px(base_property))
            });
            let context = CalcContext {
                percent_base,
                em_base,
            };
            match expr.evaluate(&context) {
                Some(px) => Value::Length(px, Unit::Px),
                // [§ 10.9] An expression whose context is missing (or that
                // divides by zero) cannot produce a computed value; fall
                // back to the initial value rather than guessing.
                None => {
                    warn_once(
                        "CSS",
                        &format!("unresolvable calc() for '{name}', using initial value"),
                    );
                    meta.initial.clone()
                }
            }
        }
        other => other.clone(),
    }
}

/// Compute the full style of one element from its winning declarations and
/// its parent's computed style.
fn resolve_element_style(
    tree: &DomTree,
    id: NodeId,
    rules: &[IndexedRule<'_>],
    parent: Option<&ComputedStyle>,
) -> ComputedStyle {
    let mut declared = winning_declarations(tree, id, rules);

    // font-size first: `em` on every other property of this element is
    // relative to the element's own computed font-size, while `em` on
    // font-size itself is relative to the parent's.
    let parent_font_size = parent
        .and_then(|style| style.length_px("font-size"))
        .unwrap_or(DEFAULT_FONT_SIZE_PX);
    let font_size_value = {
        let meta = property_meta("font-size");
        debug_assert!(meta.is_some());
        meta.map_or(Value::Length(DEFAULT_FONT_SIZE_PX, Unit::Px), |meta| {
            resolve_value(
                "font-size",
                meta,
                declared.remove("font-size").as_ref(),
                parent,
                parent_font_size,
            )
        })
    };
    let own_font_size = font_size_value.as_px().unwrap_or(DEFAULT_FONT_SIZE_PX);

    let mut values = BTreeMap::new();
    let _ = values.insert("font-size".to_owned(), font_size_value);
    for name in property_names() {
        if name == "font-size" {
            continue;
        }
        // Every name from property_names() has metadata by construction.
        let Some(meta) = property_meta(name) else {
            continue;
        };
        let value = resolve_value(name, meta, declared.get(name), parent, own_font_size);
        let _ = values.insert(name.to_owned(), value);
    }

    ComputedStyle::from_map(values)
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// Compute styles for every element of the tree, top down, so each parent
/// is resolved before its children and inheritance reads computed values.
///
/// Document and text nodes get no style of their own; the document node
/// passes the absence of a parent style through to the root element, which
/// therefore always starts from initial values.
#[must_use]
pub fn resolve_tree(tree: &DomTree, sheets: &StylesheetSet) -> HashMap<NodeId, ComputedStyle> {
    let rules = index_rules(sheets);
    let mut styles = HashMap::new();
    resolve_node(tree, tree.root(), &rules, None, &mut styles);
    styles
}

fn resolve_node(
    tree: &DomTree,
    id: NodeId,
    rules: &[IndexedRule<'_>],
    parent: Option<&ComputedStyle>,
    styles: &mut HashMap<NodeId, ComputedStyle>,
) {
    let Some(node) = tree.get(id) else { return };
    match &node.node_type {
        NodeType::Element(_) => {
            let computed = resolve_element_style(tree, id, rules, parent);
            for &child_id in tree.children(id) {
                resolve_node(tree, child_id, rules, Some(&computed), styles);
            }
            let _ = styles.insert(id, computed);
        }
        NodeType::Document => {
            for &child_id in tree.children(id) {
                resolve_node(tree, child_id, rules, parent, styles);
            }
        }
        // Text nodes carry no style; inherited properties are read off the
        // parent element when rendering.
        NodeType::Text(_) => {}
    }
}

/// Parallel variant of [`resolve_tree`].
///
/// Parents still resolve strictly before their children; only disjoint
/// subtrees run concurrently, so the result is identical to the sequential
/// driver.
#[must_use]
pub fn resolve_tree_parallel(
    tree: &DomTree,
    sheets: &StylesheetSet,
) -> HashMap<NodeId, ComputedStyle> {
    let rules = index_rules(sheets);
    let resolved = resolve_subtrees_parallel(tree, tree.root(), &rules, None);
    resolved.into_iter().collect()
}

fn resolve_subtrees_parallel(
    tree: &DomTree,
    id: NodeId,
    rules: &[IndexedRule<'_>],
    parent: Option<&ComputedStyle>,
) -> Vec<(NodeId, ComputedStyle)> {
    let Some(node) = tree.get(id) else {
        return Vec::new();
    };
    match &node.node_type {
        NodeType::Element(_) => {
            let computed = resolve_element_style(tree, id, rules, parent);
            let mut resolved: Vec<(NodeId, ComputedStyle)> = tree
                .children(id)
                .par_iter()
                .map(|&child_id| resolve_subtrees_parallel(tree, child_id, rules, Some(&computed)))
                .reduce(Vec::new, |mut acc, mut chunk| {
                    acc.append(&mut chunk);
                    acc
                });
            resolved.push((id, computed));
            resolved
        }
        NodeType::Document => tree
            .children(id)
            .par_iter()
            .map(|&child_id| resolve_subtrees_parallel(tree, child_id, rules, parent))
            .reduce(Vec::new, |mut acc, mut chunk| {
                acc.append(&mut chunk);
                acc
            }),
        NodeType::Text(_) => Vec::new(),
    }
}

/// Convenience wrapper building the standard sheet set around one author
/// sheet. See [`SourcedStylesheet`] for mixing origins explicitly.
#[must_use]
pub fn resolve_tree_with_author_sheet(
    tree: &DomTree,
    author: crate::parser::Stylesheet,
) -> HashMap<NodeId, ComputedStyle> {
    let mut sheets = StylesheetSet::with_ua_defaults();
    sheets.push(SourcedStylesheet {
        stylesheet: author,
        origin: Origin::Author,
    });
    resolve_tree(tree, &sheets)
}

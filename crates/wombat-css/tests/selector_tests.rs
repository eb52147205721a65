//! Selector parsing and matching tests.

use wombat_css::selector::{Combinator, Specificity, parse_selector};
use wombat_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

/// Helper to create element node types
fn make_element(tag: &str, id: Option<&str>, classes: &[&str]) -> NodeType {
    let mut attrs = AttributesMap::new();
    if let Some(id_val) = id {
        let _ = attrs.insert("id".to_string(), id_val.to_string());
    }
    if !classes.is_empty() {
        let _ = attrs.insert("class".to_string(), classes.join(" "));
    }
    NodeType::Element(ElementData {
        tag_name: tag.to_string(),
        attrs,
    })
}

#[test]
fn type_selector_matches_case_insensitively() {
    let selector = parse_selector("DIV").unwrap();
    let mut tree = DomTree::new();
    let div = tree.alloc(make_element("div", None, &[]));
    tree.append_child(NodeId::ROOT, div);
    assert!(selector.matches_in_tree(&tree, div));

    let p = tree.alloc(make_element("p", None, &[]));
    tree.append_child(NodeId::ROOT, p);
    assert!(!selector.matches_in_tree(&tree, p));
}

#[test]
fn compound_selector_requires_all_parts() {
    let selector = parse_selector("p.note#intro").unwrap();
    let mut tree = DomTree::new();
    let full = tree.alloc(make_element("p", Some("intro"), &["note", "other"]));
    let missing_class = tree.alloc(make_element("p", Some("intro"), &[]));
    let wrong_tag = tree.alloc(make_element("div", Some("intro"), &["note"]));
    tree.append_child(NodeId::ROOT, full);
    tree.append_child(NodeId::ROOT, missing_class);
    tree.append_child(NodeId::ROOT, wrong_tag);

    assert!(selector.matches_in_tree(&tree, full));
    assert!(!selector.matches_in_tree(&tree, missing_class));
    assert!(!selector.matches_in_tree(&tree, wrong_tag));
}

#[test]
fn universal_selector_matches_any_element() {
    let selector = parse_selector("*").unwrap();
    let mut tree = DomTree::new();
    let div = tree.alloc(make_element("div", None, &[]));
    tree.append_child(NodeId::ROOT, div);
    assert!(selector.matches_in_tree(&tree, div));
    // But never the document node itself.
    assert!(!selector.matches_in_tree(&tree, NodeId::ROOT));
}

#[test]
fn descendant_combinator_matches_any_ancestor() {
    // <body><div class="wrap"><ul><li> ... </li></ul></div></body>
    let mut tree = DomTree::new();
    let body = tree.alloc(make_element("body", None, &[]));
    let wrap = tree.alloc(make_element("div", None, &["wrap"]));
    let ul = tree.alloc(make_element("ul", None, &[]));
    let li = tree.alloc(make_element("li", None, &[]));
    tree.append_child(NodeId::ROOT, body);
    tree.append_child(body, wrap);
    tree.append_child(wrap, ul);
    tree.append_child(ul, li);

    assert!(parse_selector(".wrap li").unwrap().matches_in_tree(&tree, li));
    assert!(parse_selector("body li").unwrap().matches_in_tree(&tree, li));
    assert!(!parse_selector(".other li").unwrap().matches_in_tree(&tree, li));
}

#[test]
fn child_combinator_requires_direct_parent() {
    let mut tree = DomTree::new();
    let body = tree.alloc(make_element("body", None, &[]));
    let div = tree.alloc(make_element("div", None, &[]));
    let p = tree.alloc(make_element("p", None, &[]));
    tree.append_child(NodeId::ROOT, body);
    tree.append_child(body, div);
    tree.append_child(div, p);

    assert!(parse_selector("div > p").unwrap().matches_in_tree(&tree, p));
    // body is the grandparent, not the parent.
    assert!(!parse_selector("body > p").unwrap().matches_in_tree(&tree, p));
}

#[test]
fn mixed_combinator_chain() {
    // body > div.wrap span
    let mut tree = DomTree::new();
    let body = tree.alloc(make_element("body", None, &[]));
    let wrap = tree.alloc(make_element("div", None, &["wrap"]));
    let p = tree.alloc(make_element("p", None, &[]));
    let span = tree.alloc(make_element("span", None, &[]));
    tree.append_child(NodeId::ROOT, body);
    tree.append_child(body, wrap);
    tree.append_child(wrap, p);
    tree.append_child(p, span);

    let selector = parse_selector("body > div.wrap span").unwrap();
    assert_eq!(selector.complex.combinators.len(), 2);
    assert_eq!(selector.complex.combinators[0].0, Combinator::Descendant);
    assert_eq!(selector.complex.combinators[1].0, Combinator::Child);
    assert!(selector.matches_in_tree(&tree, span));
}

#[test]
fn descendant_step_is_not_committed_to_the_nearest_ancestor() {
    // <body><div><section><div><span> — the span's nearest div ancestor is
    // not a child of body, but the outer div is, so `body > div span`
    // matches. Taking only the nearest div would wrongly fail the chain.
    let mut tree = DomTree::new();
    let body = tree.alloc(make_element("body", None, &[]));
    let outer = tree.alloc(make_element("div", None, &[]));
    let section = tree.alloc(make_element("section", None, &[]));
    let inner = tree.alloc(make_element("div", None, &[]));
    let span = tree.alloc(make_element("span", None, &[]));
    tree.append_child(NodeId::ROOT, body);
    tree.append_child(body, outer);
    tree.append_child(outer, section);
    tree.append_child(section, inner);
    tree.append_child(inner, span);

    assert!(parse_selector("body > div span").unwrap().matches_in_tree(&tree, span));
    // Still a failure when no div ancestor at any depth is a child of body.
    assert!(!parse_selector("section > body div span").unwrap().matches_in_tree(&tree, span));
}

#[test]
fn specificity_counts_id_class_type() {
    // [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    assert_eq!(parse_selector("p").unwrap().specificity, Specificity::new(0, 0, 1));
    assert_eq!(parse_selector(".note").unwrap().specificity, Specificity::new(0, 1, 0));
    assert_eq!(parse_selector("#main").unwrap().specificity, Specificity::new(1, 0, 0));
    assert_eq!(parse_selector("*").unwrap().specificity, Specificity::new(0, 0, 0));
    assert_eq!(
        parse_selector("div.wrap > ul li.item#sel").unwrap().specificity,
        Specificity::new(1, 2, 3)
    );
}

#[test]
fn specificity_compares_lexicographically() {
    // One ID beats any number of classes; one class beats any number of types.
    assert!(Specificity::new(1, 0, 0) > Specificity::new(0, 99, 99));
    assert!(Specificity::new(0, 1, 0) > Specificity::new(0, 0, 99));
    assert!(Specificity::INLINE > Specificity::new(u32::MAX, u32::MAX, 0));
}

#[test]
fn unsupported_syntax_is_rejected() {
    assert!(parse_selector("a:hover").is_none());
    assert!(parse_selector("p::before").is_none());
    assert!(parse_selector("[href]").is_none());
    assert!(parse_selector("h1 + p").is_none());
    assert!(parse_selector("h1 ~ p").is_none());
    assert!(parse_selector("").is_none());
    assert!(parse_selector("div >").is_none());
    assert!(parse_selector("> div").is_none());
    assert!(parse_selector(".").is_none());
}

#[test]
fn class_matching_uses_whitespace_separated_tokens() {
    let selector = parse_selector(".active").unwrap();
    let mut tree = DomTree::new();
    let multi = tree.alloc(make_element("div", None, &["btn", "active", "big"]));
    let partial = tree.alloc(make_element("div", None, &["inactive"]));
    tree.append_child(NodeId::ROOT, multi);
    tree.append_child(NodeId::ROOT, partial);

    assert!(selector.matches_in_tree(&tree, multi));
    // "inactive" contains "active" as a substring but is a different token.
    assert!(!selector.matches_in_tree(&tree, partial));
}

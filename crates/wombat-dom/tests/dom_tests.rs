//! Document tree construction and traversal tests.

use wombat_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

fn element(tag: &str) -> NodeType {
    NodeType::Element(ElementData {
        tag_name: tag.to_string(),
        attrs: AttributesMap::new(),
    })
}

#[test]
fn new_tree_has_only_the_document_node() {
    let tree = DomTree::new();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.root(), NodeId::ROOT);
    assert!(tree.get(NodeId::ROOT).is_some());
    assert!(tree.parent(NodeId::ROOT).is_none());
    assert!(tree.document_element().is_none());
}

#[test]
fn append_child_wires_both_directions() {
    let mut tree = DomTree::new();
    let html = tree.alloc(element("html"));
    let body = tree.alloc(element("body"));
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, body);

    assert_eq!(tree.parent(body), Some(html));
    assert_eq!(tree.children(html), &[body]);
    assert_eq!(tree.document_element(), Some(html));
}

#[test]
fn children_keep_document_order() {
    let mut tree = DomTree::new();
    let parent = tree.alloc(element("ul"));
    tree.append_child(NodeId::ROOT, parent);
    let a = tree.alloc(element("li"));
    let b = tree.alloc(element("li"));
    let c = tree.alloc(element("li"));
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    assert_eq!(tree.children(parent), &[a, b, c]);
}

#[test]
fn ancestors_iterates_nearest_first_up_to_document() {
    let mut tree = DomTree::new();
    let html = tree.alloc(element("html"));
    let body = tree.alloc(element("body"));
    let p = tree.alloc(element("p"));
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, body);
    tree.append_child(body, p);

    let chain: Vec<NodeId> = tree.ancestors(p).collect();
    assert_eq!(chain, vec![body, html, NodeId::ROOT]);
}

#[test]
fn element_and_text_accessors() {
    let mut tree = DomTree::new();
    let div = tree.alloc(element("div"));
    let text = tree.alloc(NodeType::Text("hello".to_string()));
    tree.append_child(NodeId::ROOT, div);
    tree.append_child(div, text);

    assert!(tree.as_element(div).is_some());
    assert!(tree.as_element(text).is_none());
    assert_eq!(tree.as_text(text), Some("hello"));
    assert_eq!(tree.as_text(div), None);
}

#[test]
fn classes_split_on_ascii_whitespace() {
    let mut attrs = AttributesMap::new();
    let _ = attrs.insert("class".to_string(), "  btn   active\tbig ".to_string());
    let data = ElementData {
        tag_name: "button".to_string(),
        attrs,
    };
    let classes = data.classes();
    assert_eq!(classes.len(), 3);
    assert!(classes.contains("active"));
    assert!(!classes.contains("inactive"));
}

#[test]
fn inline_style_exposes_raw_attribute_text() {
    let mut attrs = AttributesMap::new();
    let _ = attrs.insert("style".to_string(), "color: red".to_string());
    let data = ElementData {
        tag_name: "p".to_string(),
        attrs,
    };
    assert_eq!(data.inline_style(), Some("color: red"));

    let bare = ElementData {
        tag_name: "p".to_string(),
        attrs: AttributesMap::new(),
    };
    assert_eq!(bare.inline_style(), None);
}

#[test]
fn out_of_range_ids_are_not_fatal() {
    let tree = DomTree::new();
    let bogus = NodeId(999);
    assert!(tree.get(bogus).is_none());
    assert!(tree.parent(bogus).is_none());
    assert!(tree.children(bogus).is_empty());
    assert!(tree.as_element(bogus).is_none());
}

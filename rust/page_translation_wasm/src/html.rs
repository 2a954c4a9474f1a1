// PageDocument over an html5ever/rcdom tree, for translating HTML outside the browser

use std::cell::RefCell;
use std::rc::Rc;

use html5ever::parse_document;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};

use crate::document::{PageDocument, SimpleSelector};
use crate::escape::{escape_attr, escape_text};

pub struct HtmlDocument {
    dom: RcDom,
}

fn element_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string().to_ascii_lowercase()),
        _ => None,
    }
}

fn get_attr(node: &Handle, attr: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| (&*a.name.local).eq_ignore_ascii_case(attr))
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

fn put_attr(node: &Handle, attr: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        if let Some(existing) = attrs
            .iter_mut()
            .find(|a| (&*a.name.local).eq_ignore_ascii_case(attr))
        {
            existing.value = StrTendril::from_slice(value);
            return;
        }
        attrs.push(Attribute {
            name: QualName::new(None, Namespace::from(""), LocalName::from(attr)),
            value: StrTendril::from_slice(value),
        });
    }
}

fn collect_text(node: &Handle, out: &mut String) {
    for child in node.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } => collect_text(child, out),
            _ => {}
        }
    }
}

fn walk_elements(node: &Handle, visit: &mut dyn FnMut(&Handle) -> bool) -> bool {
    for child in node.children.borrow().iter() {
        if let NodeData::Element { .. } = child.data {
            if !visit(child) {
                return false;
            }
        }
        if !walk_elements(child, visit) {
            return false;
        }
    }
    true
}

fn matches(node: &Handle, selector: &SimpleSelector) -> bool {
    match element_name(node) {
        Some(tag) => selector.matches(&tag, |name| get_attr(node, name)),
        None => false,
    }
}

fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "source" | "track" | "wbr"
    )
}

fn serialize_node(out: &mut String, node: &Handle, raw_text: bool) {
    match &node.data {
        NodeData::Document => {
            for child in node.children.borrow().iter() {
                serialize_node(out, child, false);
            }
        }
        NodeData::Doctype { name, .. } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeData::Text { contents } => {
            if raw_text {
                out.push_str(&contents.borrow());
            } else {
                out.push_str(&escape_text(&contents.borrow()));
            }
        }
        NodeData::Comment { contents } => {
            out.push_str("<!--");
            out.push_str(contents);
            out.push_str("-->");
        }
        NodeData::Element { name, attrs, .. } => {
            let tag = name.local.to_string();
            out.push('<');
            out.push_str(&tag);
            for attr in attrs.borrow().iter() {
                out.push(' ');
                out.push_str(&attr.name.local);
                out.push_str("=\"");
                out.push_str(&escape_attr(&attr.value));
                out.push('"');
            }
            out.push('>');
            if is_void(&tag) {
                return;
            }
            let raw = matches!(tag.as_str(), "script" | "style");
            for child in node.children.borrow().iter() {
                serialize_node(out, child, raw);
            }
            out.push_str("</");
            out.push_str(&tag);
            out.push('>');
        }
        NodeData::ProcessingInstruction { .. } => {}
    }
}

impl HtmlDocument {
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);
        Self { dom }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        serialize_node(&mut out, &self.dom.document, false);
        out
    }

    fn find_first(&self, scope: &Handle, selector: &SimpleSelector) -> Option<Handle> {
        let mut found = None;
        walk_elements(scope, &mut |node| {
            if matches(node, selector) {
                found = Some(node.clone());
                return false;
            }
            true
        });
        found
    }

    /// The `<html>` element's `lang` attribute.
    pub fn document_lang(&self) -> Option<String> {
        let root = self.find_first(&self.dom.document, &SimpleSelector::Tag("html".to_string()))?;
        get_attr(&root, "lang")
    }
}

impl PageDocument for HtmlDocument {
    type Element = Handle;

    fn select_all(&self, selector: &str) -> Vec<Handle> {
        let Some(selector) = SimpleSelector::parse(selector) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        walk_elements(&self.dom.document, &mut |node| {
            if matches(node, &selector) {
                out.push(node.clone());
            }
            true
        });
        out
    }

    fn select_within(&self, scope: &Handle, selector: &str) -> Option<Handle> {
        let selector = SimpleSelector::parse(selector)?;
        self.find_first(scope, &selector)
    }

    fn element_by_id(&self, id: &str) -> Option<Handle> {
        self.find_first(&self.dom.document, &SimpleSelector::Id(id.to_string()))
    }

    fn tag_name(&self, element: &Handle) -> String {
        element_name(element).unwrap_or_default()
    }

    fn attribute(&self, element: &Handle, name: &str) -> Option<String> {
        get_attr(element, name)
    }

    fn set_attribute(&self, element: &Handle, name: &str, value: &str) {
        put_attr(element, name, value);
    }

    fn text_content(&self, element: &Handle) -> String {
        let mut out = String::new();
        collect_text(element, &mut out);
        out
    }

    fn set_text_content(&self, element: &Handle, text: &str) {
        let mut children = element.children.borrow_mut();
        for child in children.iter() {
            child.parent.set(None);
        }
        children.clear();
        if text.is_empty() {
            return;
        }
        let node = Node::new(NodeData::Text {
            contents: RefCell::new(StrTendril::from_slice(text)),
        });
        node.parent.set(Some(Rc::downgrade(element)));
        children.push(node);
    }

    fn form_value(&self, element: &Handle) -> Option<String> {
        if self.tag_name(element) == "textarea" {
            return Some(self.text_content(element));
        }
        get_attr(element, "value")
    }

    fn set_form_value(&self, element: &Handle, value: &str) {
        if self.tag_name(element) == "textarea" {
            self.set_text_content(element, value);
        } else {
            put_attr(element, "value", value);
        }
    }

    fn set_class(&self, element: &Handle, class: &str, enabled: bool) {
        let current = get_attr(element, "class").unwrap_or_default();
        let mut classes: Vec<&str> = current.split_whitespace().filter(|c| *c != class).collect();
        if enabled {
            classes.push(class);
        }
        put_attr(element, "class", &classes.join(" "));
    }

    fn set_document_lang(&self, lang: &str) {
        if let Some(root) = self.find_first(&self.dom.document, &SimpleSelector::Tag("html".to_string())) {
            put_attr(&root, "lang", lang);
        }
    }
}

// Minimal DOM surface the translator needs. Implemented for the live browser
// document (web.rs) and for parsed HTML (html.rs).

pub trait PageDocument {
    type Element: Clone;

    /// All elements matching a simple CSS selector, in document order.
    fn select_all(&self, selector: &str) -> Vec<Self::Element>;

    /// First descendant of `scope` matching `selector`.
    fn select_within(&self, scope: &Self::Element, selector: &str) -> Option<Self::Element>;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Lowercase tag name.
    fn tag_name(&self, element: &Self::Element) -> String;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str);

    fn text_content(&self, element: &Self::Element) -> String;

    fn set_text_content(&self, element: &Self::Element, text: &str);

    /// Current value of a form control.
    fn form_value(&self, element: &Self::Element) -> Option<String>;

    fn set_form_value(&self, element: &Self::Element, value: &str);

    fn set_class(&self, element: &Self::Element, class: &str, enabled: bool);

    /// Sets `lang` on the root element.
    fn set_document_lang(&self, lang: &str);

    fn is_input_like(&self, element: &Self::Element) -> bool {
        matches!(self.tag_name(element).as_str(), "input" | "textarea")
    }
}

/// The selector forms `HtmlDocument` understands: `tag`, `.class`, `#id`, `[attr]`, `[attr=value]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimpleSelector {
    Tag(String),
    Class(String),
    Id(String),
    Attribute { name: String, value: Option<String> },
}

impl SimpleSelector {
    pub fn parse(selector: &str) -> Option<SimpleSelector> {
        let selector = selector.trim();
        if selector.is_empty() {
            return None;
        }
        if let Some(class) = selector.strip_prefix('.') {
            return Some(SimpleSelector::Class(class.to_string()));
        }
        if let Some(id) = selector.strip_prefix('#') {
            return Some(SimpleSelector::Id(id.to_string()));
        }
        if let Some(inner) = selector.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            let (name, value) = match inner.split_once('=') {
                Some((name, value)) => (
                    name.trim(),
                    Some(value.trim().trim_matches(|c| c == '"' || c == '\'').to_string()),
                ),
                None => (inner.trim(), None),
            };
            if name.is_empty() {
                return None;
            }
            return Some(SimpleSelector::Attribute {
                name: name.to_ascii_lowercase(),
                value,
            });
        }
        Some(SimpleSelector::Tag(selector.to_ascii_lowercase()))
    }

    /// `attr` looks up an attribute on the candidate element.
    pub fn matches(&self, tag: &str, attr: impl Fn(&str) -> Option<String>) -> bool {
        match self {
            SimpleSelector::Tag(name) => tag.eq_ignore_ascii_case(name),
            SimpleSelector::Class(class) => attr("class")
                .map(|c| c.split_whitespace().any(|x| x == class))
                .unwrap_or(false),
            SimpleSelector::Id(id) => attr("id").as_deref() == Some(id.as_str()),
            SimpleSelector::Attribute { name, value } => match (attr(name), value) {
                (Some(actual), Some(expected)) => actual == *expected,
                (Some(_), None) => true,
                (None, _) => false,
            },
        }
    }
}

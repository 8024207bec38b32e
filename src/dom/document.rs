//! In-memory element tree standing in for the live page.
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by a
//! copyable [`NodeId`]. Only the parts of the DOM the capture pipeline reads
//! are modelled: tag names, ordered attributes, the live form value, text
//! content, and the document's url and title.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub enum NodeKind {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    /// Live value of form fields. Falls back to the `value` attribute.
    value: Option<String>,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub url: String,
    pub title: String,
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Create a document whose root is an `<html>` element.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        let root = Node {
            kind: NodeKind::Element(Element {
                tag: "html".to_string(),
                attrs: Vec::new(),
                value: None,
            }),
            parent: None,
            children: Vec::new(),
        };
        Self {
            url: url.into(),
            title: title.into(),
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Append a new element under `parent` and return its id.
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let element = Element {
            tag: tag.to_ascii_lowercase(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                .collect(),
            value: None,
        };
        self.push_node(parent, NodeKind::Element(element))
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push_node(parent, NodeKind::Text(text.to_string()))
    }

    fn push_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(id);
        }
        id
    }

    /// Set the live value of a form field (what the user typed or picked).
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(Node {
            kind: NodeKind::Element(el),
            ..
        }) = self.nodes.get_mut(node.0)
        {
            el.value = Some(value.to_string());
        }
    }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.nodes.get(node.0).map(|n| &n.kind)
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match self.kind(node)? {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    /// Lowercase tag name, `None` for text nodes.
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag.as_str())
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    /// The `id` attribute, if present and non-empty.
    pub fn id_of(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id").filter(|v| !v.is_empty())
    }

    pub fn class_list(&self, node: NodeId) -> Vec<&str> {
        self.attr(node, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Live value, falling back to the `value` attribute.
    pub fn value_of(&self, node: NodeId) -> Option<&str> {
        let el = self.element(node)?;
        el.value.as_deref().or_else(|| self.attr(node, "value"))
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|p| self.is_element(*p))
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Element siblings that come before `node`, nearest first.
    pub fn previous_element_siblings(&self, node: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(node) else {
            return Vec::new();
        };
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|s| *s == node).unwrap_or(0);
        siblings[..pos]
            .iter()
            .rev()
            .copied()
            .filter(|s| self.is_element(*s))
            .collect()
    }

    /// Nearest ancestor-or-self element matching `pred`.
    pub fn closest(&self, node: NodeId, pred: impl Fn(&Self, NodeId) -> bool) -> Option<NodeId> {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if self.is_element(n) && pred(self, n) {
                return Some(n);
            }
            cur = self.parent(n);
        }
        None
    }

    /// Depth-first search for an element with the given id.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.id_of(*n) == Some(id))
    }

    /// The `<label for="...">` pointing at `id`, if any.
    pub fn label_for(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.tag_name(*n) == Some("label") && self.attr(*n, "for") == Some(id))
    }

    /// Concatenated text of all descendant text nodes, document order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match self.kind(node) {
            Some(NodeKind::Text(t)) => out.push_str(t),
            Some(NodeKind::Element(_)) => {
                for child in self.children(node) {
                    self.collect_text(*child, out);
                }
            }
            None => {}
        }
    }

    /// `node` and every node below it, pre-order.
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new("https://example.com/login", "Login");
        let body = doc.append_element(doc.root(), "BODY", &[]);
        let form = doc.append_element(body, "form", &[("id", "login")]);
        let button = doc.append_element(form, "button", &[("class", "btn  primary")]);
        doc.append_text(button, "Sign ");
        let span = doc.append_element(button, "span", &[]);
        doc.append_text(span, "in");
        (doc, form, button, span)
    }

    #[test]
    fn tag_names_are_lowercased() {
        let (doc, _, _, _) = sample();
        let body = doc.children(doc.root())[0];
        assert_eq!(doc.tag_name(body), Some("body"));
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let (doc, _, button, _) = sample();
        assert_eq!(doc.text_content(button), "Sign in");
    }

    #[test]
    fn closest_is_self_inclusive() {
        let (doc, form, button, span) = sample();
        let hit = doc.closest(span, |d, n| d.tag_name(n) == Some("button"));
        assert_eq!(hit, Some(button));
        let hit = doc.closest(form, |d, n| d.tag_name(n) == Some("form"));
        assert_eq!(hit, Some(form));
    }

    #[test]
    fn class_list_splits_on_whitespace() {
        let (doc, _, button, _) = sample();
        assert_eq!(doc.class_list(button), vec!["btn", "primary"]);
    }

    #[test]
    fn live_value_overrides_attribute() {
        let mut doc = Document::new("u", "t");
        let input = doc.append_element(doc.root(), "input", &[("value", "initial")]);
        assert_eq!(doc.value_of(input), Some("initial"));
        doc.set_value(input, "typed");
        assert_eq!(doc.value_of(input), Some("typed"));
    }

    #[test]
    fn previous_siblings_skip_text_nodes() {
        let mut doc = Document::new("u", "t");
        let ul = doc.append_element(doc.root(), "ul", &[]);
        let a = doc.append_element(ul, "li", &[]);
        doc.append_text(ul, "\n");
        let b = doc.append_element(ul, "li", &[]);
        assert_eq!(doc.previous_element_siblings(b), vec![a]);
    }

    #[test]
    fn element_by_id_and_label_for() {
        let mut doc = Document::new("u", "t");
        let label = doc.append_element(doc.root(), "label", &[("for", "email")]);
        let input = doc.append_element(doc.root(), "input", &[("id", "email")]);
        assert_eq!(doc.element_by_id("email"), Some(input));
        assert_eq!(doc.label_for("email"), Some(label));
        assert_eq!(doc.label_for("missing"), None);
    }
}

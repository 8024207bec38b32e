//! Human-readable labels for recorded elements.

use super::document::{Document, NodeId};

/// Resolve a short description of `node`.
///
/// Sources are tried in order: `aria-label`, `alt`, `name`, the associated
/// `<label for>`, the element's own text (button and link tags or roles), and the
/// text of the closest `label` or `[role=button]` container. Returns `None`
/// when none yields non-blank text.
pub fn resolve(doc: &Document, node: NodeId) -> Option<String> {
    if !doc.is_element(node) {
        return None;
    }

    for attr in ["aria-label", "alt", "name"] {
        if let Some(text) = doc.attr(node, attr).and_then(normalize) {
            return Some(text);
        }
    }

    if let Some(id) = doc.id_of(node) {
        if let Some(text) = doc.label_for(id).and_then(|l| normalize(&doc.text_content(l))) {
            return Some(text);
        }
    }

    let own_text = matches!(doc.tag_name(node), Some("button") | Some("a"))
        || matches!(doc.attr(node, "role"), Some("button") | Some("link"));
    if own_text {
        if let Some(text) = normalize(&doc.text_content(node)) {
            return Some(text);
        }
    }

    let container = doc.closest(node, |d, n| {
        d.tag_name(n) == Some("label") || d.attr(n, "role") == Some("button")
    })?;
    normalize(&doc.text_content(container))
}

/// Collapse whitespace runs to a single space; `None` if nothing is left.
pub fn normalize(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aria_label_first() {
        let mut doc = Document::new("u", "t");
        let btn = doc.append_element(
            doc.root(),
            "button",
            &[("aria-label", "  Close   dialog "), ("name", "close")],
        );
        doc.append_text(btn, "X");
        assert_eq!(resolve(&doc, btn).as_deref(), Some("Close dialog"));
    }

    #[test]
    fn blank_attribute_is_skipped() {
        let mut doc = Document::new("u", "t");
        let img = doc.append_element(doc.root(), "img", &[("aria-label", "   "), ("alt", "Logo")]);
        assert_eq!(resolve(&doc, img).as_deref(), Some("Logo"));
    }

    #[test]
    fn label_for_id() {
        let mut doc = Document::new("u", "t");
        let label = doc.append_element(doc.root(), "label", &[("for", "qty")]);
        doc.append_text(label, "\n  Quantity\n ");
        let input = doc.append_element(doc.root(), "input", &[("id", "qty")]);
        assert_eq!(resolve(&doc, input).as_deref(), Some("Quantity"));
    }

    #[test]
    fn link_text() {
        let mut doc = Document::new("u", "t");
        let a = doc.append_element(doc.root(), "a", &[("href", "/docs")]);
        doc.append_text(a, "Read   the docs");
        assert_eq!(resolve(&doc, a).as_deref(), Some("Read the docs"));
    }

    #[test]
    fn role_link_uses_own_text() {
        let mut doc = Document::new("u", "t");
        let link = doc.append_element(doc.root(), "span", &[("role", "link")]);
        doc.append_text(link, " Terms of   service ");
        assert_eq!(resolve(&doc, link).as_deref(), Some("Terms of service"));
    }

    #[test]
    fn div_text_is_not_used_directly() {
        let mut doc = Document::new("u", "t");
        let div = doc.append_element(doc.root(), "div", &[("onclick", "go()")]);
        doc.append_text(div, "Go");
        assert_eq!(resolve(&doc, div), None);
    }

    #[test]
    fn wrapping_label_container() {
        let mut doc = Document::new("u", "t");
        let label = doc.append_element(doc.root(), "label", &[]);
        let checkbox = doc.append_element(label, "input", &[("type", "checkbox")]);
        doc.append_text(label, " Remember me");
        assert_eq!(resolve(&doc, checkbox).as_deref(), Some("Remember me"));
    }

    #[test]
    fn role_button_container() {
        let mut doc = Document::new("u", "t");
        let wrapper = doc.append_element(doc.root(), "div", &[("role", "button")]);
        let icon = doc.append_element(wrapper, "span", &[]);
        doc.append_text(wrapper, "Add item");
        assert_eq!(resolve(&doc, icon).as_deref(), Some("Add item"));
    }

    #[test]
    fn none_when_nothing_applies() {
        let mut doc = Document::new("u", "t");
        let input = doc.append_element(doc.root(), "input", &[("type", "text")]);
        assert_eq!(resolve(&doc, input), None);
    }
}

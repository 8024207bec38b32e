//! Decides whether a form field's value must be redacted.

use regex::Regex;
use std::sync::OnceLock;

use super::document::{Document, NodeId};

const SENSITIVE_NAME_PATTERN: &str = r"(?i)pass|pwd|secret|token|card|ssn|email|phone";

fn sensitive_names() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SENSITIVE_NAME_PATTERN).expect("static pattern compiles"))
}

/// True for masked inputs and fields whose `name` or `id` hints at
/// credentials or personal data.
///
/// Only gates the captured value; the step itself is still recorded.
pub fn is_sensitive(doc: &Document, node: NodeId) -> bool {
    if doc
        .attr(node, "type")
        .is_some_and(|t| t.eq_ignore_ascii_case("password"))
    {
        return true;
    }
    ["name", "id"]
        .iter()
        .filter_map(|attr| doc.attr(node, attr))
        .any(|v| sensitive_names().is_match(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(attrs: &[(&str, &str)]) -> (Document, NodeId) {
        let mut doc = Document::new("u", "t");
        let input = doc.append_element(doc.root(), "input", attrs);
        (doc, input)
    }

    #[test]
    fn password_type_is_sensitive() {
        let (doc, n) = field(&[("type", "PASSWORD"), ("name", "login")]);
        assert!(is_sensitive(&doc, n));
    }

    #[test]
    fn name_patterns_are_case_insensitive() {
        for name in ["userPassword", "PWD", "api_token", "CardNumber", "ssn", "Email", "phone2"] {
            let (doc, n) = field(&[("name", name)]);
            assert!(is_sensitive(&doc, n), "{name} should be sensitive");
        }
    }

    #[test]
    fn id_is_checked_too() {
        let (doc, n) = field(&[("id", "client-secret")]);
        assert!(is_sensitive(&doc, n));
    }

    #[test]
    fn ordinary_fields_are_not_sensitive() {
        let (doc, n) = field(&[("type", "text"), ("name", "city"), ("id", "shipping-city")]);
        assert!(!is_sensitive(&doc, n));
    }
}

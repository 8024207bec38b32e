//! Selector synthesis for recorded elements.
//!
//! Prefers a single stable attribute; falls back to a short structural path.
//! Identifiers that look machine-generated (hashes, counters) never anchor a
//! selector because they change between page loads.

use super::document::{Document, NodeId};

/// Attributes tried in order before falling back to a structural path.
pub const PREFERRED_ATTRS: [&str; 7] = [
    "data-testid",
    "data-test",
    "data-qa",
    "id",
    "name",
    "role",
    "aria-label",
];

/// Maximum number of path segments in a structural selector.
pub const MAX_DEPTH: usize = 5;

/// Maximum number of classes kept per path segment.
const MAX_CLASSES: usize = 2;

/// Build a selector that re-identifies `node` in `doc`.
///
/// Returns an empty string for text nodes and unknown ids.
pub fn synthesize(doc: &Document, node: NodeId) -> String {
    if !doc.is_element(node) {
        return String::new();
    }

    for attr in PREFERRED_ATTRS {
        if let Some(value) = doc.attr(node, attr) {
            if !value.is_empty() && !looks_random(value) {
                return format!("[{attr}=\"{}\"]", css_escape(value));
            }
        }
    }

    structural_path(doc, node)
}

fn structural_path(doc: &Document, node: NodeId) -> String {
    let mut path: Vec<String> = Vec::new();
    let mut cur = Some(node);

    for _ in 0..MAX_DEPTH {
        let Some(n) = cur else { break };
        let Some(tag) = doc.tag_name(n) else { break };
        let mut part = tag.to_string();

        if let Some(id) = doc.id_of(n).filter(|id| !looks_random(id)) {
            part.push('#');
            part.push_str(&css_escape(id));
            path.push(part);
            break;
        }

        let classes: Vec<String> = doc
            .class_list(n)
            .into_iter()
            .filter(|c| !looks_random(c))
            .take(MAX_CLASSES)
            .map(css_escape)
            .collect();
        if !classes.is_empty() {
            part.push('.');
            part.push_str(&classes.join("."));
        }

        part.push_str(&format!(":nth-of-type({})", nth_of_type(doc, n)));
        path.push(part);
        cur = doc.parent_element(n);
    }

    path.reverse();
    path.join(" > ")
}

/// 1-based position of `node` among element siblings sharing its tag.
pub fn nth_of_type(doc: &Document, node: NodeId) -> usize {
    let tag = doc.tag_name(node);
    1 + doc
        .previous_element_siblings(node)
        .into_iter()
        .filter(|s| doc.tag_name(*s) == tag)
        .count()
}

/// True for tokens that look generated: 6+ chars mixing letters and digits.
pub fn looks_random(s: &str) -> bool {
    s.chars().count() >= 6
        && s.chars().any(|c| c.is_ascii_alphabetic())
        && s.chars().any(|c| c.is_ascii_digit())
}

/// Escape a string for use as a CSS identifier or quoted value
/// (CSSOM `CSS.escape`).
pub fn css_escape(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());

    if chars.len() == 1 && chars[0] == '-' {
        return "\\-".to_string();
    }

    for (i, &c) in chars.iter().enumerate() {
        let starts_with_digit = c.is_ascii_digit() && (i == 0 || (i == 1 && chars[0] == '-'));
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => out.push_str(&format!("\\{:x} ", c as u32)),
            _ if starts_with_digit => out.push_str(&format!("\\{:x} ", c as u32)),
            _ if (c as u32) >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() => {
                out.push(c)
            }
            _ => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

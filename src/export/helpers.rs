use crate::recorder::types::Step;
use chrono::{DateTime, Utc};

pub const DEFAULT_TITLE: &str = "WorkMap Workflow Recording";

/// Inputs shared by all renderers besides the step log.
///
/// The generation instant is passed in so the same log and options always
/// render the same text.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub title: String,
    pub generated_at: DateTime<Utc>,
}

impl ExportOptions {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            generated_at,
        }
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn generated_label(&self) -> String {
        format_instant(&self.generated_at)
    }
}

fn format_instant(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Render a step timestamp (ms since epoch) for humans.
pub fn format_timestamp(ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ms) {
        Some(at) => format_instant(&at),
        None => ms.to_string(),
    }
}

/// Minutes between the first and last step, rounded; `0` for empty logs.
pub fn duration_minutes(steps: &[Step]) -> i64 {
    match (steps.first(), steps.last()) {
        (Some(first), Some(last)) => {
            let ms = last.timestamp.saturating_sub(first.timestamp).max(0);
            ms.saturating_add(30_000) / 60_000
        }
        _ => 0,
    }
}

/// One-line summary of the action and its label, or just the action.
pub fn step_summary(step: &Step) -> String {
    match step.label.as_deref() {
        Some(label) => format!("{} \u{2014} {}", step.action, label),
        None => step.action.to_string(),
    }
}

/// Escape HTML special characters (`&`, `<`, `>`).
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a value for a double-quoted HTML attribute.
pub fn attr_escape(s: &str) -> String {
    html_escape(s).replace('"', "&quot;")
}

/// Backslash-escape Markdown emphasis and code characters.
pub fn md_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '*' | '_' | '`' | '~') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::types::Step;

    fn at(ts: i64) -> Step {
        let mut s = Step::sample();
        s.timestamp = ts;
        s
    }

    #[test]
    fn duration_rounds_to_minutes() {
        assert_eq!(duration_minutes(&[]), 0);
        assert_eq!(duration_minutes(&[at(5_000)]), 0);
        assert_eq!(duration_minutes(&[at(0), at(180_000)]), 3);
        assert_eq!(duration_minutes(&[at(0), at(89_999)]), 1);
        assert_eq!(duration_minutes(&[at(0), at(90_000)]), 2);
    }

    #[test]
    fn duration_survives_extreme_timestamps() {
        assert_eq!(duration_minutes(&[at(0), at(i64::MAX - 1_000)]), i64::MAX / 60_000);
        assert_eq!(duration_minutes(&[at(i64::MIN), at(i64::MAX)]), i64::MAX / 60_000);
    }

    #[test]
    fn summary_with_and_without_label() {
        let mut s = Step::sample();
        assert_eq!(step_summary(&s), "click \u{2014} Pay now");
        s.label = None;
        assert_eq!(step_summary(&s), "click");
    }

    #[test]
    fn html_escape_special_chars() {
        assert_eq!(html_escape("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(html_escape(r#"say "hi""#), r#"say "hi""#);
    }

    #[test]
    fn attr_escape_quotes() {
        assert_eq!(attr_escape(r#"x" onerror="a&b"#), "x&quot; onerror=&quot;a&amp;b");
    }

    #[test]
    fn md_escape_emphasis() {
        assert_eq!(md_escape("*bold* _it_ `code` ~x~"), r"\*bold\* \_it\_ \`code\` \~x\~");
    }

    #[test]
    fn timestamp_formatting() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp(i64::MAX), i64::MAX.to_string());
    }
}

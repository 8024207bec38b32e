use super::helpers::{format_timestamp, md_escape, ExportOptions};
use crate::recorder::types::Step;

/// Shown instead of the step list when nothing was recorded.
pub const NO_STEPS_NOTICE: &str = "_No steps recorded yet._";

/// Generate markdown content. Screenshots are only marked, never inlined.
pub fn generate(steps: &[Step], options: &ExportOptions) -> String {
    let mut lines: Vec<String> = vec![format!("# {}", md_escape(&options.title))];

    if steps.is_empty() {
        lines.push(format!("\n{NO_STEPS_NOTICE}"));
        return lines.join("\n");
    }

    lines.push(format!("\n**Generated:** {}", options.generated_label()));
    lines.push(format!("**Total Steps:** {}", steps.len()));
    lines.push("\n---\n".to_string());

    for (i, step) in steps.iter().enumerate() {
        lines.push(format!("## Step {} \u{2014} {}", i + 1, step.action));
        lines.push(format!("**Time:** {}", format_timestamp(step.timestamp)));
        lines.push(format!("**Page:** {}", md_escape(&step.page_title)));
        lines.push(format!("**URL:** {}", md_escape(&step.url)));
        if let Some(label) = step.label.as_deref().filter(|l| !l.is_empty()) {
            lines.push(format!("**Target:** {}", md_escape(label)));
        }
        if let Some(value) = step.value.as_deref().filter(|v| !v.is_empty()) {
            lines.push(format!("**Value:** `{}`", md_escape(value)));
        }
        if !step.selector.is_empty() {
            lines.push(format!("**Selector:** `{}`", md_escape(&step.selector)));
        }
        if step.visual_capture.is_some() {
            lines.push("**Screenshot:** Captured".to_string());
        }
        lines.push("\n---\n".to_string());
    }

    lines.join("\n")
}

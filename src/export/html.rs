use super::helpers::{attr_escape, format_timestamp, html_escape, step_summary, ExportOptions};
use crate::recorder::types::Step;

/// Generate a self-contained HTML document from steps.
///
/// Meant to be saved as `.doc` and opened by word processors, so the styling
/// stays conservative.
pub fn generate(steps: &[Step], options: &ExportOptions) -> String {
    let steps_html: String = if steps.is_empty() {
        r#"<p class="empty">No steps recorded yet.</p>"#.to_string()
    } else {
        steps
            .iter()
            .enumerate()
            .map(|(i, step)| render_step(i + 1, step))
            .collect()
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title_esc}</title>
<style>
{css}
</style>
</head>
<body>
<header><h1>{title_esc}</h1></header>
<p class="meta"><b>Generated:</b> {generated}</p>
<p class="meta"><b>Total Steps:</b> {count}</p>
{steps_html}
</body>
</html>"#,
        title_esc = html_escape(&options.title),
        css = CSS,
        generated = html_escape(&options.generated_label()),
        count = steps.len(),
    )
}

fn render_step(num: usize, step: &Step) -> String {
    let mut meta = vec![
        meta_line("Page", &html_escape(&step.page_title)),
        meta_line("URL", &html_escape(&step.url)),
    ];
    if !step.selector.is_empty() {
        meta.push(code_line("Selector", &step.selector));
    }
    if let Some(value) = step.value.as_deref().filter(|v| !v.is_empty()) {
        meta.push(code_line("Value", value));
    }
    meta.push(meta_line("Time", &html_escape(&format_timestamp(step.timestamp))));

    let image_html = step
        .visual_capture
        .as_ref()
        .map(|c| {
            format!(
                r#"
  <div><img src="{}" alt="Step {num}"></div>"#,
                attr_escape(c.data_url())
            )
        })
        .unwrap_or_default();

    format!(
        r#"
<div class="step">
  <h2>Step {num}: {summary}</h2>
  {meta}{image_html}
</div>"#,
        summary = html_escape(&step_summary(step)),
        meta = meta.join("\n  "),
    )
}

fn meta_line(name: &str, escaped: &str) -> String {
    format!(r#"<div class="meta"><b>{name}:</b> {escaped}</div>"#)
}

fn code_line(name: &str, raw: &str) -> String {
    meta_line(name, &format!(r#"<span class="code">{}</span>"#, html_escape(raw)))
}

const CSS: &str = r#"body { font-family: Calibri, Arial, sans-serif; margin: 20px; }
header { background: linear-gradient(135deg, #6366f1, #06d6a0); color: #fff; padding: 16px 18px; border-radius: 12px; }
h1 { font-size: 22pt; margin: 0; }
h2 { font-size: 16pt; margin: 18px 0 6px; }
.meta { color: #444; font-size: 10pt; margin: 2px 0; }
.empty { color: #666; font-style: italic; }
img { max-width: 700px; height: auto; border: 1px solid #ddd; border-radius: 6px; }
.step { page-break-inside: avoid; margin: 14px 0 18px; padding-bottom: 8px; border-bottom: 1px solid #eee; }
.code { font-family: Consolas, monospace; background: #f6f6f6; padding: 2px 4px; border-radius: 3px; }"#;

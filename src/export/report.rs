//! Styled, print-ready report (A4 pages). Printing it to PDF is left to the
//! host; this module only produces the HTML.

use super::helpers::{
    attr_escape, duration_minutes, format_timestamp, html_escape, step_summary, ExportOptions,
};
use crate::recorder::types::Step;

pub fn generate(steps: &[Step], options: &ExportOptions) -> String {
    let title_esc = html_escape(&options.title);
    let cards: String = steps
        .iter()
        .enumerate()
        .map(|(i, step)| render_card(i + 1, step))
        .collect();
    let empty = if steps.is_empty() {
        r#"<p class="empty">No steps recorded yet.</p>"#
    } else {
        ""
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
<div class="header">
  <h1>{title_esc}</h1>
  <div class="subtitle">Automated Step-by-Step Documentation</div>
</div>
<div class="summary">
  <div class="summary-item"><div class="summary-label">Generated</div><div class="summary-value">{generated}</div></div>
  <div class="summary-item"><div class="summary-label">Total Steps</div><div class="summary-value">{count}</div></div>
  <div class="summary-item"><div class="summary-label">Duration</div><div class="summary-value">{minutes}m</div></div>
</div>
{empty}{cards}
<div class="footer">Generated by WorkMap &bull; Visual Workflow Recording</div>
</body>
</html>"#,
        css = CSS,
        generated = html_escape(&options.generated_label()),
        count = steps.len(),
        minutes = duration_minutes(steps),
    )
}

fn render_card(num: usize, step: &Step) -> String {
    let mut items = vec![
        meta_item("Page Title", &html_escape(&step.page_title), false),
        meta_item("Timestamp", &html_escape(&format_timestamp(step.timestamp)), false),
    ];
    if !step.url.is_empty() {
        items.push(meta_item("URL", &html_escape(&step.url), true));
    }
    if !step.selector.is_empty() {
        items.push(meta_item("Element Selector", &code(&step.selector), true));
    }
    if let Some(value) = step.value.as_deref().filter(|v| !v.is_empty()) {
        items.push(meta_item("Input Value", &code(value), true));
    }

    let screenshot = step
        .visual_capture
        .as_ref()
        .map(|c| {
            format!(
                r#"
    <div class="screenshot"><img src="{}" alt="Screenshot of step {num}"></div>"#,
                attr_escape(c.data_url())
            )
        })
        .unwrap_or_default();

    format!(
        r#"
<div class="step">
  <div class="step-header">
    <div class="step-number">{num}</div>
    <h2 class="step-title">{summary}</h2>
  </div>
  <div class="step-content">
    <div class="meta-grid">
      {items}
    </div>{screenshot}
  </div>
</div>"#,
        summary = html_escape(&step_summary(step)),
        items = items.join("\n      "),
    )
}

fn meta_item(label: &str, escaped: &str, wide: bool) -> String {
    let class = if wide { "meta-item wide" } else { "meta-item" };
    format!(
        r#"<div class="{class}"><div class="meta-label">{label}</div><div class="meta-value">{escaped}</div></div>"#
    )
}

fn code(raw: &str) -> String {
    format!(r#"<span class="meta-code">{}</span>"#, html_escape(raw))
}

const CSS: &str = r#"@page { margin: 20mm; size: A4; }
* { box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif; line-height: 1.6; color: #2d3748; margin: 0; padding: 0; background: white; }
.header { background: linear-gradient(135deg, #6366f1, #06d6a0); color: white; padding: 30px; border-radius: 12px; margin-bottom: 30px; text-align: center; box-shadow: 0 4px 20px rgba(99, 102, 241, 0.2); }
.header h1 { margin: 0; font-size: 28px; font-weight: 700; letter-spacing: -0.5px; }
.header .subtitle { margin: 8px 0 0 0; font-size: 16px; opacity: 0.9; }
.summary { background: #f8fafc; border: 1px solid #e2e8f0; border-radius: 8px; padding: 20px; margin-bottom: 30px; display: grid; grid-template-columns: 1fr 1fr 1fr; gap: 20px; }
.summary-item { text-align: center; }
.summary-label { font-size: 12px; font-weight: 600; text-transform: uppercase; letter-spacing: 0.5px; color: #64748b; margin-bottom: 4px; }
.summary-value { font-size: 18px; font-weight: 700; color: #1e293b; }
.empty { text-align: center; color: #64748b; font-style: italic; }
.step { background: white; border: 1px solid #e2e8f0; border-radius: 12px; padding: 24px; margin-bottom: 20px; box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1); page-break-inside: avoid; position: relative; }
.step::before { content: ''; position: absolute; left: 0; top: 0; bottom: 0; width: 4px; background: linear-gradient(180deg, #6366f1, #06d6a0); border-radius: 0 2px 2px 0; }
.step-header { display: flex; align-items: center; gap: 12px; margin-bottom: 16px; padding-left: 16px; }
.step-number { background: linear-gradient(135deg, #6366f1, #06d6a0); color: white; width: 32px; height: 32px; border-radius: 50%; display: flex; align-items: center; justify-content: center; font-weight: 700; font-size: 14px; flex-shrink: 0; }
.step-title { font-size: 18px; font-weight: 600; color: #1e293b; margin: 0; }
.step-content { padding-left: 16px; }
.meta-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; margin-bottom: 16px; }
.meta-item { background: #f8fafc; padding: 12px; border-radius: 6px; border-left: 3px solid #6366f1; }
.meta-item.wide { grid-column: span 2; }
.meta-label { font-size: 11px; font-weight: 600; text-transform: uppercase; letter-spacing: 0.5px; color: #64748b; margin-bottom: 4px; }
.meta-value { font-size: 13px; color: #1e293b; word-break: break-all; }
.meta-code { font-family: 'SF Mono', Monaco, 'Cascadia Code', monospace; background: #1e293b; color: #f1f5f9; padding: 2px 6px; border-radius: 4px; font-size: 12px; }
.screenshot { margin-top: 16px; text-align: center; }
.screenshot img { max-width: 100%; height: auto; border-radius: 8px; box-shadow: 0 4px 12px rgba(0, 0, 0, 0.1); border: 1px solid #e2e8f0; }
.footer { text-align: center; padding: 20px; color: #64748b; font-size: 12px; border-top: 1px solid #e2e8f0; margin-top: 40px; }
@media print {
  body { print-color-adjust: exact; }
  .step { break-inside: avoid; }
}"#;

//! Capture pipeline that turns one interaction into at most one step draft.
//!
//! - Resolves the element the event is really about (nearest interactive
//!   ancestor for clicks, the field for value commits, the form for submits)
//! - Synthesizes its selector and label
//! - Redacts the value of sensitive fields when masking is on
//! - Stamps id, capture instant, url and title
//!
//! The pipeline keeps no state between calls. Settings arrive as a snapshot.

use uuid::Uuid;

use super::click_event::InteractionEvent;
use super::types::{ActionType, StepDraft};
use crate::dom::{label, locator, sensitive, Document, NodeId};
use crate::settings::Settings;

/// Tags that count as interactive for pointer activation.
const INTERACTIVE_TAGS: [&str; 5] = ["button", "a", "input", "select", "textarea"];

/// Label used for submits of forms without a name.
const DEFAULT_FORM_LABEL: &str = "Form";

/// Capture `event` at the current instant.
pub fn capture(doc: &Document, event: &InteractionEvent, settings: &Settings) -> Option<StepDraft> {
    capture_at(doc, event, settings, InteractionEvent::now_ms())
}

/// Capture `event` with an explicit timestamp.
///
/// Returns `None` when no element can be resolved for the interaction.
pub fn capture_at(
    doc: &Document,
    event: &InteractionEvent,
    settings: &Settings,
    timestamp: i64,
) -> Option<StepDraft> {
    let draft = match *event {
        InteractionEvent::Click { target } => {
            let el = interactive_ancestor(doc, target)?;
            draft(doc, timestamp, ActionType::Click, el, None)
        }
        InteractionEvent::Change { target } => {
            let field = doc.closest(target, |_, _| true)?;
            match doc.tag_name(field)? {
                "select" => {
                    let value = doc.value_of(field).unwrap_or_default().to_string();
                    draft(doc, timestamp, ActionType::Select, field, Some(value))
                }
                "input" | "textarea" => {
                    let redact = settings.mask_sensitive && sensitive::is_sensitive(doc, field);
                    let value = if redact {
                        String::new()
                    } else {
                        doc.value_of(field).unwrap_or_default().to_string()
                    };
                    draft(doc, timestamp, ActionType::Input, field, Some(value))
                }
                _ => return None,
            }
        }
        InteractionEvent::Submit { form } => {
            if !doc.is_element(form) {
                return None;
            }
            let mut step = draft(doc, timestamp, ActionType::Submit, form, None);
            step.label = Some(
                ["name", "aria-label"]
                    .iter()
                    .find_map(|attr| doc.attr(form, attr).filter(|v| !v.is_empty()))
                    .unwrap_or(DEFAULT_FORM_LABEL)
                    .to_string(),
            );
            step
        }
        InteractionEvent::Navigate { trigger } => {
            tracing::trace!(?trigger, url = %doc.url, "navigation");
            StepDraft {
                id: Uuid::new_v4().to_string(),
                timestamp,
                url: doc.url.clone(),
                page_title: doc.title.clone(),
                action: ActionType::Navigate,
                selector: String::new(),
                label: None,
                value: None,
            }
        }
    };
    Some(draft)
}

fn draft(
    doc: &Document,
    timestamp: i64,
    action: ActionType,
    el: NodeId,
    value: Option<String>,
) -> StepDraft {
    StepDraft {
        id: Uuid::new_v4().to_string(),
        timestamp,
        url: doc.url.clone(),
        page_title: doc.title.clone(),
        action,
        selector: locator::synthesize(doc, el),
        label: label::resolve(doc, el),
        value,
    }
}

/// Nearest ancestor-or-self a user would consider clickable.
pub fn interactive_ancestor(doc: &Document, target: NodeId) -> Option<NodeId> {
    doc.closest(target, |d, n| {
        d.tag_name(n).is_some_and(|t| INTERACTIVE_TAGS.contains(&t))
            || d.attr(n, "role") == Some("button")
            || d.has_attr(n, "onclick")
    })
}

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Click,
    Input,
    Select,
    Submit,
    Navigate,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Click => "click",
            ActionType::Input => "input",
            ActionType::Select => "select",
            ActionType::Submit => "submit",
            ActionType::Navigate => "navigate",
        }
    }

    /// Actions that get a viewport capture when screenshots are enabled.
    pub fn wants_visual_capture(&self) -> bool {
        match self {
            ActionType::Click | ActionType::Submit => true,
            ActionType::Input | ActionType::Select | ActionType::Navigate => false,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoded viewport image attached to a step, kept as a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisualCapture(String);

impl VisualCapture {
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        use base64::Engine;
        let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self(format!("data:{mime};base64,{b64}"))
    }

    pub fn data_url(&self) -> &str {
        &self.0
    }

    pub fn mime(&self) -> Option<&str> {
        self.0.strip_prefix("data:")?.split(';').next()
    }
}

/// A step as produced by the capture pipeline, before session enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDraft {
    pub id: String,
    pub timestamp: i64,
    pub url: String,
    pub page_title: String,
    pub action: ActionType,
    #[serde(default)]
    pub selector: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl StepDraft {
    pub fn into_step(self, visual_capture: Option<VisualCapture>) -> Step {
        Step {
            id: self.id,
            timestamp: self.timestamp,
            url: self.url,
            page_title: self.page_title,
            action: self.action,
            selector: self.selector,
            label: self.label,
            value: self.value,
            visual_capture,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub url: String,
    pub page_title: String,
    pub action: ActionType,
    #[serde(default)]
    pub selector: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub visual_capture: Option<VisualCapture>,
}

impl Step {
    #[cfg(test)]
    pub fn sample() -> Self {
        Self {
            id: "step-1".to_string(),
            timestamp: 0,
            url: "https://example.com/checkout".to_string(),
            page_title: "Checkout".to_string(),
            action: ActionType::Click,
            selector: r#"[data-testid="pay"]"#.to_string(),
            label: Some("Pay now".to_string()),
            value: None,
            visual_capture: None,
        }
    }
}

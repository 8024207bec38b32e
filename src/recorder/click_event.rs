use crate::dom::NodeId;

/// History entry points the host hooks to detect client-side navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTrigger {
    PushState,
    ReplaceState,
    /// Back/forward.
    PopState,
}

/// A raw interaction observed at the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEvent {
    /// Pointer activation on `target` (may be a text node or a non-interactive child).
    Click { target: NodeId },
    /// A form field committed its value.
    Change { target: NodeId },
    Submit { form: NodeId },
    Navigate { trigger: NavigationTrigger },
}

impl InteractionEvent {
    /// Capture instant in milliseconds since the Unix epoch.
    pub fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Idle,
    Recording,
}

/// Recording on/off. Only an explicit toggle moves between the two states.
#[derive(Debug)]
pub struct RecorderState {
    state: SessionState,
}

impl RecorderState {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    pub fn current_state(&self) -> SessionState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Flip between `Idle` and `Recording`, returning the new state.
    pub fn toggle(&mut self) -> SessionState {
        self.state = match self.state {
            SessionState::Idle => SessionState::Recording,
            SessionState::Recording => SessionState::Idle,
        };
        self.state
    }
}

impl Default for RecorderState {
    fn default() -> Self {
        Self::new()
    }
}

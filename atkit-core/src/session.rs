//! Session state for a kit connection
//!
//! A session tracks:
//! - Lifecycle state (unopened, opened, selected, ready, closed)
//! - Address of the selected secure element

use std::fmt;

use tracing::info;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No HID handle yet
    Unopened,

    /// HID handle acquired
    Opened,

    /// A secure element was discovered and selected
    Selected,

    /// Ready for command/response exchange
    Ready,

    /// HID handle released
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unopened => "unopened",
            Self::Opened => "opened",
            Self::Selected => "selected",
            Self::Ready => "ready",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Session tracker
///
/// Transitions only move forward; `close` is allowed from any state.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    device_address: Option<u8>,
}

impl Session {
    /// Create a new unopened session
    pub fn new() -> Self {
        Self {
            state: SessionState::Unopened,
            device_address: None,
        }
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Address of the selected device
    pub fn device_address(&self) -> Option<u8> {
        self.device_address
    }

    /// Check if the HID handle is held
    pub fn is_open(&self) -> bool {
        matches!(
            self.state,
            SessionState::Opened | SessionState::Selected | SessionState::Ready
        )
    }

    /// Check if commands can be exchanged
    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// Mark the HID handle as acquired
    pub fn open(&mut self) -> Result<(), SessionState> {
        self.transition(SessionState::Unopened, SessionState::Opened)
    }

    /// Record the selected device address
    pub fn select(&mut self, address: u8) -> Result<(), SessionState> {
        // Re-selecting another device is fine while open
        if !self.is_open() {
            return Err(self.state);
        }

        self.device_address = Some(address);
        self.state = SessionState::Selected;
        info!(address = format!("0x{:02X}", address), "Device selected");
        Ok(())
    }

    /// Mark the session ready
    pub fn ready(&mut self) -> Result<(), SessionState> {
        self.transition(SessionState::Selected, SessionState::Ready)
    }

    /// Close session
    pub fn close(&mut self) {
        self.device_address = None;
        self.state = SessionState::Closed;
    }

    fn transition(&mut self, from: SessionState, to: SessionState) -> Result<(), SessionState> {
        if self.state != from {
            return Err(self.state);
        }

        info!(from = %from, to = %to, "Session state change");
        self.state = to;
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

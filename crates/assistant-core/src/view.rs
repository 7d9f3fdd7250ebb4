//! UI handles the chat controller drives
//!
//! A front end hands the controller one implementation of each trait at
//! construction. The in-memory implementations at the bottom of this module
//! back the headless CLI and the controller tests.

use crate::state::ChatMessage;

/// The text field the user types into
pub trait InputField {
    fn value(&self) -> String;
    fn clear(&mut self);
}

/// The control that triggers a send
pub trait SendControl {
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
}

/// The container that renders transcript entries and the typing indicator
pub trait MessageList {
    fn append(&mut self, message: &ChatMessage);
    fn show_typing(&mut self);
    fn hide_typing(&mut self);
    fn is_typing(&self) -> bool;
}

/// The scrollable ancestor of the message list
pub trait ScrollView {
    fn scroll_to_bottom(&mut self);
}

/// Plain string buffer standing in for a text field
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl InputField for TextBuffer {
    fn value(&self) -> String {
        self.text.clone()
    }

    fn clear(&mut self) {
        self.text.clear();
    }
}

#[derive(Debug, Clone)]
pub struct SendToggle {
    enabled: bool,
}

impl Default for SendToggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl SendControl for SendToggle {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Records appended entries and every typing indicator transition
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    pub messages: Vec<ChatMessage>,
    pub typing: bool,
    /// Number of times the indicator was shown
    pub typing_shown: usize,
}

impl MessageList for MessageLog {
    fn append(&mut self, message: &ChatMessage) {
        self.messages.push(message.clone());
    }

    fn show_typing(&mut self) {
        self.typing = true;
        self.typing_shown += 1;
    }

    fn hide_typing(&mut self) {
        self.typing = false;
    }

    fn is_typing(&self) -> bool {
        self.typing
    }
}

/// Counts scroll requests
#[derive(Debug, Clone, Default)]
pub struct ScrollTracker {
    pub scrolls: usize,
}

impl ScrollView for ScrollTracker {
    fn scroll_to_bottom(&mut self) {
        self.scrolls += 1;
    }
}

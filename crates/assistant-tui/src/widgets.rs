//! Terminal implementations of the controller's UI handles

use assistant_core::{ChatMessage, InputField, MessageList, ScrollView, SendControl};

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Single-line text input with a character cursor
#[derive(Debug, Clone, Default)]
pub struct InputBox {
    text: String,
    cursor: usize,
}

impl InputBox {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.chars().count();
    }
}

impl InputField for InputBox {
    fn value(&self) -> String {
        self.text.clone()
    }

    fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

#[derive(Debug, Clone)]
pub struct SendButton {
    enabled: bool,
}

impl Default for SendButton {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl SendControl for SendButton {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Entries shown in the chat pane, plus the typing line while a reply is pending
#[derive(Debug, Clone, Default)]
pub struct TranscriptPane {
    messages: Vec<ChatMessage>,
    typing: bool,
}

impl TranscriptPane {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

impl MessageList for TranscriptPane {
    fn append(&mut self, message: &ChatMessage) {
        self.messages.push(message.clone());
    }

    fn show_typing(&mut self) {
        self.typing = true;
    }

    fn hide_typing(&mut self) {
        self.typing = false;
    }

    fn is_typing(&self) -> bool {
        self.typing
    }
}

/// Scroll position of the chat pane.
///
/// While `follow` is set the pane stays pinned to the newest line; the
/// concrete offset is only known at render time once lines are wrapped.
#[derive(Debug, Clone)]
pub struct ChatScroll {
    offset: u16,
    follow: bool,
}

impl Default for ChatScroll {
    fn default() -> Self {
        Self {
            offset: 0,
            follow: true,
        }
    }
}

impl ChatScroll {
    pub fn up(&mut self, lines: u16) {
        self.follow = false;
        self.offset = self.offset.saturating_sub(lines);
    }

    pub fn down(&mut self, lines: u16) {
        self.offset = self.offset.saturating_add(lines);
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Clamp to the rendered content and return the offset to draw with
    pub fn resolve(&mut self, total_lines: u16, visible_height: u16) -> u16 {
        let max_offset = total_lines.saturating_sub(visible_height);
        if self.follow || self.offset >= max_offset {
            self.offset = max_offset;
            self.follow = true;
        }
        self.offset
    }
}

impl ScrollView for ChatScroll {
    fn scroll_to_bottom(&mut self) {
        self.follow = true;
    }
}

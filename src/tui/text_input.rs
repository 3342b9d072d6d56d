use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Style;
use ratatui::text::Span;

use crate::util::unicode;

/// Single-line text buffer with a cursor. The cursor is a byte offset that
/// always sits on a grapheme boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    buffer: String,
    cursor: usize,
}

impl TextInput {
    /// A buffer holding `text` with the cursor at the end
    pub fn new(text: impl Into<String>) -> Self {
        let buffer = text.into();
        TextInput {
            cursor: buffer.len(),
            buffer,
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_value(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = self.buffer.len();
    }

    /// Apply a line-editing key. Returns false for keys this input ignores.
    pub fn handle(&mut self, key: &KeyEvent) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => {
                self.buffer.insert(self.cursor, c);
                self.cursor += c.len_utf8();
            }
            KeyCode::Backspace => {
                if let Some(prev) = unicode::prev_grapheme_boundary(&self.buffer, self.cursor) {
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                }
            }
            KeyCode::Delete => {
                if let Some(next) = unicode::next_grapheme_boundary(&self.buffer, self.cursor) {
                    self.buffer.drain(self.cursor..next);
                }
            }
            KeyCode::Left => {
                if let Some(prev) = unicode::prev_grapheme_boundary(&self.buffer, self.cursor) {
                    self.cursor = prev;
                }
            }
            KeyCode::Right => {
                if let Some(next) = unicode::next_grapheme_boundary(&self.buffer, self.cursor) {
                    self.cursor = next;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.buffer.len(),
            _ => return false,
        }
        true
    }

    /// The buffer as spans. With `cursor_style` set, the grapheme under the
    /// cursor (or a trailing space) is highlighted.
    pub fn spans(&self, style: Style, cursor_style: Option<Style>) -> Vec<Span<'static>> {
        let Some(cursor_style) = cursor_style else {
            return vec![Span::styled(self.buffer.clone(), style)];
        };
        let mut spans = Vec::new();
        let before = &self.buffer[..self.cursor];
        if !before.is_empty() {
            spans.push(Span::styled(before.to_string(), style));
        }
        match unicode::next_grapheme_boundary(&self.buffer, self.cursor) {
            Some(end) => {
                spans.push(Span::styled(
                    self.buffer[self.cursor..end].to_string(),
                    cursor_style,
                ));
                let after = &self.buffer[end..];
                if !after.is_empty() {
                    spans.push(Span::styled(after.to_string(), style));
                }
            }
            None => spans.push(Span::styled(" ".to_string(), cursor_style)),
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn press(input: &mut TextInput, code: KeyCode) -> bool {
        input.handle(&KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(input: &mut TextInput, text: &str) {
        for c in text.chars() {
            press(input, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_inserts_at_the_cursor() {
        let mut input = TextInput::new("Pay rent");
        press(&mut input, KeyCode::Home);
        type_str(&mut input, "To do: ");
        assert_eq!(input.value(), "To do: Pay rent");
        assert_eq!(input.cursor(), 7);

        press(&mut input, KeyCode::End);
        type_str(&mut input, " p:1");
        assert_eq!(input.value(), "To do: Pay rent p:1");
    }

    #[test]
    fn backspace_and_delete_remove_whole_graphemes() {
        let mut input = TextInput::new("ae\u{301}b");
        press(&mut input, KeyCode::Left);
        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.value(), "ab");
        assert_eq!(input.cursor(), 1);

        press(&mut input, KeyCode::Delete);
        assert_eq!(input.value(), "a");
        // Nothing left of the start or right of the end
        press(&mut input, KeyCode::Delete);
        press(&mut input, KeyCode::Home);
        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.value(), "a");
    }

    #[test]
    fn modified_and_unknown_keys_are_ignored() {
        let mut input = TextInput::new("x");
        assert!(!input.handle(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!press(&mut input, KeyCode::Enter));
        assert!(input.handle(&KeyEvent::new(KeyCode::Char('Y'), KeyModifiers::SHIFT)));
        assert_eq!(input.value(), "xY");
    }

    #[test]
    fn cursor_is_highlighted_in_spans() {
        let style = Style::default();
        let cursor = Style::default().bg(ratatui::style::Color::White);
        let mut input = TextInput::new("ab");

        let spans = input.spans(style, Some(cursor));
        let text: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, vec!["ab", " "]);
        assert_eq!(spans[1].style, cursor);

        press(&mut input, KeyCode::Home);
        let spans = input.spans(style, Some(cursor));
        let text: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, vec!["a", "b"]);
        assert_eq!(spans[0].style, cursor);

        assert_eq!(input.spans(style, None).len(), 1);
    }
}

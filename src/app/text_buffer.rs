/// Single-line editing buffer used by the filter prompt and input prompts.
///
/// `cursor` is a **char index** (not byte index), always in `0..=char_count`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    pub input: String,
    pub cursor: usize,
}

impl TextBuffer {
    /// Buffer pre-filled with `input`, cursor at the end.
    pub fn new(input: impl Into<String>) -> Self {
        let input = input.into();
        let cursor = input.chars().count();
        Self { input, cursor }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.input.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_offset(self.cursor - 1);
            self.input.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete back to the previous whitespace boundary (Ctrl+W).
    pub fn delete_word(&mut self) {
        let end = self.byte_offset(self.cursor);
        let start = self.input[..end]
            .trim_end()
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        self.cursor = self.input[..start].chars().count();
        self.input.drain(start..end);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    /// Trimmed contents, `None` when blank.
    pub fn submitted(&self) -> Option<String> {
        let trimmed = self.input.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_at_cursor() {
        let mut buf = TextBuffer::new("ac");
        buf.move_left();
        buf.insert('b');
        assert_eq!(buf.input, "abc");
        assert_eq!(buf.cursor, 2);
    }

    #[test]
    fn test_backspace_multibyte() {
        let mut buf = TextBuffer::new("héllo");
        buf.home();
        buf.move_right();
        buf.move_right();
        buf.backspace();
        assert_eq!(buf.input, "hllo");
        assert_eq!(buf.cursor, 1);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut buf = TextBuffer::new("x");
        buf.home();
        buf.backspace();
        assert_eq!(buf.input, "x");
    }

    #[test]
    fn test_delete_word() {
        let mut buf = TextBuffer::new("fix login  ");
        buf.delete_word();
        assert_eq!(buf.input, "fix ");
        assert_eq!(buf.cursor, 4);
        buf.delete_word();
        assert_eq!(buf.input, "");
        assert_eq!(buf.cursor, 0);
    }

    #[test]
    fn test_cursor_bounds() {
        let mut buf = TextBuffer::new("ab");
        buf.move_right();
        assert_eq!(buf.cursor, 2);
        buf.home();
        buf.move_left();
        assert_eq!(buf.cursor, 0);
        buf.end();
        assert_eq!(buf.cursor, 2);
    }

    #[test]
    fn test_submitted_trims() {
        assert_eq!(TextBuffer::new("  api ").submitted().as_deref(), Some("api"));
        assert_eq!(TextBuffer::new("   ").submitted(), None);
        assert_eq!(TextBuffer::empty().submitted(), None);
    }
}

use unicode_width::UnicodeWidthStr;

/// Single-line editor; `cursor` is a byte offset on a char boundary.
#[derive(Debug, Clone, Default)]
pub struct InputLine {
    text: String,
    cursor: usize,
}

impl InputLine {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn left(&mut self) {
        if let Some((i, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.cursor = i;
        }
    }

    pub fn right(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn backspace(&mut self) {
        let end = self.cursor;
        self.left();
        self.text.drain(self.cursor..end);
    }

    pub fn delete(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            let end = self.cursor + ch.len_utf8();
            self.text.drain(self.cursor..end);
        }
    }

    /// Terminal columns before the caret; CJK counts double.
    pub fn caret_col(&self) -> u16 {
        UnicodeWidthStr::width(&self.text[..self.cursor]) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> InputLine {
        let mut line = InputLine::default();
        s.chars().for_each(|c| line.insert(c));
        line
    }

    #[test]
    fn editing_respects_multibyte_chars() {
        let mut line = typed("天眼x");
        line.left();
        line.backspace();
        assert_eq!(line.as_str(), "天x");
        assert_eq!(line.caret_col(), 2);
        line.home();
        line.delete();
        assert_eq!(line.as_str(), "x");
        line.end();
        line.right();
        assert_eq!(line.caret_col(), 1);
    }

    #[test]
    fn take_resets_cursor() {
        let mut line = typed("rust");
        assert_eq!(line.take(), "rust");
        assert!(line.is_empty());
        line.backspace();
        assert_eq!(line.caret_col(), 0);
    }
}

/// Character cursor over a purified doc-comment.
#[derive(Debug, Clone)]
pub(crate) struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub(crate) fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    /// Character before the cursor.
    pub(crate) fn prev(&self) -> Option<char> {
        self.input[..self.pos].chars().next_back()
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Move the cursor back to an earlier position.
    pub(crate) fn rewind(&mut self, pos: usize) {
        self.pos = pos.min(self.pos);
    }

    pub(crate) fn advance(&mut self, bytes: usize) {
        self.pos = (self.pos + bytes).min(self.input.len());
    }

    pub(crate) fn looking_at(&self, text: &str) -> bool {
        self.rest().starts_with(text)
    }

    pub(crate) fn looking_at_ci(&self, text: &str) -> bool {
        self.rest()
            .get(..text.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(text))
    }

    pub(crate) fn eat(&mut self, text: &str) -> bool {
        if self.looking_at(text) {
            self.pos += text.len();
            true
        } else {
            false
        }
    }

    pub(crate) fn skip_horiz_white(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.pos += 1;
        }
    }

    pub(crate) fn skip_white(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    pub(crate) fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.input[start..self.pos]
    }

    /// Identifier: word characters and `$`.
    pub(crate) fn ident(&mut self) -> Option<&'a str> {
        let ident = self.take_while(is_ident_char);
        (!ident.is_empty()).then_some(ident)
    }

    /// Identifier that may also contain `-`, as used by SCSS names.
    pub(crate) fn css_ident(&mut self) -> Option<&'a str> {
        let ident = self.take_while(|c| is_ident_char(c) || c == '-');
        (!ident.is_empty()).then_some(ident)
    }

    /// Dotted identifier chain `foo.bar.baz`. A trailing `.` not followed by
    /// an identifier is left unconsumed.
    pub(crate) fn ident_chain(&mut self) -> Option<&'a str> {
        let start = self.pos;
        self.ident()?;
        while self.peek() == Some('.') && self.peek_second().is_some_and(is_ident_char) {
            self.pos += 1;
            self.ident();
        }
        Some(&self.input[start..self.pos])
    }

    /// Content of a `{...}` block with balanced braces. The cursor must be on
    /// the opening brace. Unbalanced input consumes the rest of the line.
    pub(crate) fn braces(&mut self) -> Option<&'a str> {
        if self.peek() != Some('{') {
            return None;
        }
        let start = self.pos + 1;
        let mut depth = 0usize;
        while let Some(c) = self.bump() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&self.input[start..self.pos - 1]);
                    }
                }
                '\n' if depth > 0 => {
                    // type definitions do not span lines
                    self.pos -= 1;
                    return Some(&self.input[start..self.pos]);
                }
                _ => {}
            }
        }
        Some(&self.input[start..self.pos])
    }

    /// Text up to the end of the current line.
    pub(crate) fn line_rest(&mut self) -> &'a str {
        self.take_while(|c| c != '\n')
    }

    /// Indentation of the line containing the cursor.
    pub(crate) fn line_indent(&self) -> usize {
        let line_start = self.input[..self.pos].rfind('\n').map_or(0, |i| i + 1);
        self.input[line_start..]
            .chars()
            .take_while(|c| *c == ' ')
            .count()
    }
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

//! Scanning of default values written in `[name=default]` and `name=default`.
//!
//! Defaults are JavaScript-ish literals: strings, regexes, arrays and objects
//! may contain the `]` that would otherwise close the name block, so the
//! scanner keeps a stack of open brackets and skips over string and regex
//! literals.

/// Characters after which `/` begins a regex literal rather than a division.
const REGEX_PRECEDERS: &[char] = &['(', ',', '=', ':', '[', '!', '&', '|', '?', '{', '}', ';'];

struct Lexer<'a> {
    chars: Vec<(usize, char)>,
    input: &'a str,
    idx: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().collect(),
            input,
            idx: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).map(|(_, c)| *c)
    }

    /// Byte offset of the cursor.
    fn offset(&self) -> usize {
        self.chars
            .get(self.idx)
            .map_or(self.input.len(), |(offset, _)| *offset)
    }

    /// Skip a quoted string, cursor on the opening quote.
    fn skip_string(&mut self) -> Option<()> {
        let quote = self.peek()?;
        self.idx += 1;
        while let Some(c) = self.peek() {
            self.idx += 1;
            match c {
                '\\' => self.idx += 1,
                c if c == quote => return Some(()),
                _ => {}
            }
        }
        None
    }

    /// Skip a regex literal, cursor on the opening slash.
    fn skip_regex(&mut self) -> Option<()> {
        self.idx += 1;
        let mut in_class = false;
        while let Some(c) = self.peek() {
            self.idx += 1;
            match c {
                '\\' => self.idx += 1,
                '[' => in_class = true,
                ']' if in_class => in_class = false,
                '/' if !in_class => return Some(()),
                '\n' => return None,
                _ => {}
            }
        }
        None
    }

    /// Advance over balanced brackets until a closer with no matching opener.
    /// Returns the byte offset of that closer when it is `]`.
    fn scan_to_unmatched_close(&mut self) -> Option<usize> {
        let mut stack: Vec<char> = Vec::new();
        let mut prev_significant: Option<char> = None;

        while let Some(c) = self.peek() {
            match c {
                '"' | '\'' => {
                    self.skip_string()?;
                    prev_significant = Some(c);
                    continue;
                }
                '/' if prev_significant.is_none_or(|p| REGEX_PRECEDERS.contains(&p)) => {
                    self.skip_regex()?;
                    prev_significant = Some('/');
                    continue;
                }
                '[' => stack.push(']'),
                '{' => stack.push('}'),
                '(' => stack.push(')'),
                ']' | '}' | ')' => match stack.pop() {
                    Some(expected) if expected == c => {}
                    Some(_) => return None,
                    None if c == ']' => return Some(self.offset()),
                    None => return None,
                },
                _ => {}
            }
            if !c.is_whitespace() {
                prev_significant = Some(c);
            }
            self.idx += 1;
        }
        None
    }

    /// Advance past one balanced bracket group, cursor on the opener.
    fn skip_group(&mut self) -> Option<()> {
        let mut stack: Vec<char> = Vec::new();
        while let Some(c) = self.peek() {
            match c {
                '"' | '\'' => {
                    self.skip_string()?;
                    continue;
                }
                '[' => stack.push(']'),
                '{' => stack.push('}'),
                '(' => stack.push(')'),
                ']' | '}' | ')' => {
                    if stack.pop() != Some(c) {
                        return None;
                    }
                    if stack.is_empty() {
                        self.idx += 1;
                        return Some(());
                    }
                }
                _ => {}
            }
            self.idx += 1;
        }
        None
    }
}

/// Scan the default of a `[name=default]` block. `input` starts right after
/// the `=`. Returns the trimmed default and the byte length consumed,
/// including the closing `]` when one was found.
pub(crate) fn bracketed(input: &str) -> (String, usize) {
    let mut lexer = Lexer::new(input);
    if let Some(close) = lexer.scan_to_unmatched_close() {
        return (input[..close].trim().to_string(), close + 1);
    }

    // Unbalanced or unterminated literal: the default runs to the first `]`.
    match input.find(']') {
        Some(close) => (input[..close].trim().to_string(), close + 1),
        None => {
            let end = input.find('\n').unwrap_or(input.len());
            (input[..end].trim().to_string(), end)
        }
    }
}

/// Scan the default of a bare `name=default`. `input` starts at the first
/// non-blank character after the `=`. Strings and bracketed literals are
/// read whole, anything else up to the next whitespace.
pub(crate) fn bare(input: &str) -> (String, usize) {
    let mut lexer = Lexer::new(input);
    let complete = match lexer.peek() {
        Some('"' | '\'') => lexer.skip_string().is_some(),
        Some('[' | '{' | '(') => lexer.skip_group().is_some(),
        _ => false,
    };

    let end = if complete {
        lexer.offset()
    } else {
        input.find(char::is_whitespace).unwrap_or(input.len())
    };
    (input[..end].to_string(), end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_of(input: &str) -> String {
        bracketed(input).0
    }

    #[test]
    fn plain_defaults() {
        assert_eq!(default_of("42] Docs"), "42");
        assert_eq!(default_of("!haa] Docs"), "!haa");
        assert_eq!(default_of("7 and me too] Docs"), "7 and me too");
    }

    #[test]
    fn strings_may_contain_brackets() {
        assert_eq!(
            default_of("\"Hello, my [dear]!\"] Docs"),
            "\"Hello, my [dear]!\""
        );
        let (value, consumed) = bracketed("\" \\\"] \"] Something");
        assert_eq!(value, "\" \\\"] \"");
        assert_eq!(&"\" \\\"] \"] Something"[consumed..], " Something");
    }

    #[test]
    fn nested_literals() {
        assert_eq!(default_of("[1, 2, [3]]] Docs"), "[1, 2, [3]]");
        assert_eq!(default_of("{a: [1], b: {c: 2}}] Docs"), "{a: [1], b: {c: 2}}");
        assert_eq!(default_of("/[a-z]]+/] Docs"), "/[a-z]]+/");
        assert_eq!(default_of("this] Docs"), "this");
    }

    #[test]
    fn unbalanced_literals_end_at_first_bracket() {
        assert_eq!(default_of("[...] Docs"), "[...");
        assert_eq!(default_of("{ho:5] Docs"), "{ho:5");
    }

    #[test]
    fn bare_defaults() {
        assert_eq!(bare("10").0, "10");
        assert_eq!(bare("'Hello, world!' Docs").0, "'Hello, world!'");
        assert_eq!(bare("[1, 2, 3, 4] Docs").0, "[1, 2, 3, 4]");
        assert_eq!(bare("15.5 Blah").0, "15.5");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Any balanced nesting of brackets in the default is kept whole.
            #[test]
            fn balanced_defaults_survive(depth in 1usize..6, word in "[a-z]{1,8}") {
                let mut value = word.clone();
                for level in 0..depth {
                    value = if level % 2 == 0 {
                        format!("[{}, [x]]", value)
                    } else {
                        format!("{{k: {}}}", value)
                    };
                }
                let input = format!("{}] trailing doc", value);
                prop_assert_eq!(default_of(&input), value);
            }
        }
    }
}

use xcdiag_model::PreviewBlock;

/// The default marker token for preview blocks.
const PREVIEW_MARKER: &str = "#Preview";

/// Extract all `#Preview` blocks from source text, in source order.
#[must_use]
pub fn extract_preview_blocks(source: &str) -> Vec<PreviewBlock> {
    extract_marked_blocks(source, PREVIEW_MARKER)
}

/// Extract all blocks introduced by `marker`, in source order.
///
/// The marker matches only as a whole token: a longer identifier sharing the
/// prefix (`#PreviewMacro`) never matches. The optional `("Display Name")`
/// argument becomes the block name; the trailing `{ … }` body is
/// brace-balanced with string/comment awareness and trimmed. Markers inside
/// strings or comments are ignored. An unterminated block is dropped.
#[must_use]
pub fn extract_marked_blocks(source: &str, marker: &str) -> Vec<PreviewBlock> {
    if source.is_empty() || marker.is_empty() {
        return Vec::new();
    }

    let mut scanner = Scanner::new(source);
    let marker_chars: Vec<char> = marker.chars().collect();
    let mut blocks = Vec::new();

    while !scanner.at_end() {
        if !scanner.skip_to_code_char() {
            break;
        }
        if scanner.matches_token(&marker_chars) {
            let after_marker = scanner.pos + marker_chars.len();
            match scanner.read_block(after_marker) {
                Some((block, resume)) => {
                    blocks.push(block);
                    scanner.pos = resume;
                    continue;
                }
                None => {
                    scanner.pos = after_marker;
                    continue;
                }
            }
        }
        scanner.pos += 1;
    }

    blocks
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    /// Advance `pos` past comments and string literals so it rests on a
    /// character that is structurally code. Returns false at end of input.
    fn skip_to_code_char(&mut self) -> bool {
        loop {
            let Some(current) = self.peek(0) else {
                return false;
            };
            match current {
                '/' if self.peek(1) == Some('/') => {
                    while self.peek(0).is_some_and(|c| c != '\n') {
                        self.pos += 1;
                    }
                }
                '/' if self.peek(1) == Some('*') => {
                    self.pos += 2;
                    self.skip_block_comment();
                }
                '"' => {
                    self.skip_string();
                }
                _ => return true,
            }
        }
    }

    /// Past the `/*`; block comments nest.
    fn skip_block_comment(&mut self) {
        let mut depth = 1usize;
        while depth > 0 {
            match (self.peek(0), self.peek(1)) {
                (Some('/'), Some('*')) => {
                    depth += 1;
                    self.pos += 2;
                }
                (Some('*'), Some('/')) => {
                    depth -= 1;
                    self.pos += 2;
                }
                (Some(_), _) => self.pos += 1,
                (None, _) => return,
            }
        }
    }

    /// At an opening `"`: consume a single-line or `"""` multi-line literal.
    fn skip_string(&mut self) {
        if self.peek(1) == Some('"') && self.peek(2) == Some('"') {
            self.pos += 3;
            loop {
                match self.peek(0) {
                    Some('\\') => self.pos += 2,
                    Some('"') if self.peek(1) == Some('"') && self.peek(2) == Some('"') => {
                        self.pos += 3;
                        return;
                    }
                    Some(_) => self.pos += 1,
                    None => return,
                }
            }
        }

        self.pos += 1;
        loop {
            match self.peek(0) {
                Some('\\') => self.pos += 2,
                Some('"') => {
                    self.pos += 1;
                    return;
                }
                // an unterminated single-line literal ends at the newline
                Some('\n') | None => return,
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Whole-token marker match at the current position.
    fn matches_token(&self, marker: &[char]) -> bool {
        if self.chars.len() < self.pos + marker.len() {
            return false;
        }
        if self.chars[self.pos..self.pos + marker.len()] != *marker {
            return false;
        }
        if self.pos > 0 && is_ident_char(self.chars[self.pos - 1]) {
            return false;
        }
        // a longer identifier sharing the prefix must not match
        !self
            .chars
            .get(self.pos + marker.len())
            .copied()
            .is_some_and(is_ident_char)
    }

    /// Parse `("name")? { body }` starting at `from`. Returns the block and
    /// the position just past its closing brace.
    fn read_block(&self, from: usize) -> Option<(PreviewBlock, usize)> {
        let mut cursor = Cursor {
            chars: &self.chars,
            pos: from,
        };
        cursor.skip_whitespace();

        let mut name = None;
        if cursor.peek() == Some('(') {
            cursor.pos += 1;
            cursor.skip_whitespace();
            if cursor.peek() == Some('"') {
                name = cursor.read_string_literal();
            }
            cursor.skip_to_closing_paren()?;
            cursor.skip_whitespace();
        }

        if cursor.peek() != Some('{') {
            return None;
        }
        cursor.pos += 1;
        let body_start = cursor.pos;
        let body_end = cursor.skip_to_closing_brace()?;

        let body: String = self.chars[body_start..body_end].iter().collect();
        Some((
            PreviewBlock {
                name,
                body: body.trim().to_string(),
            },
            body_end + 1,
        ))
    }
}

/// Forward-only cursor sharing the scanner's string/comment skipping rules.
struct Cursor<'a> {
    chars: &'a [char],
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// At an opening `"`: read the literal's content.
    fn read_string_literal(&mut self) -> Option<String> {
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.peek() {
                Some('\\') => {
                    if let Some(escaped) = self.chars.get(self.pos + 1) {
                        value.push(*escaped);
                    }
                    self.pos += 2;
                }
                Some('"') => {
                    self.pos += 1;
                    return Some(value);
                }
                Some('\n') | None => return None,
                Some(c) => {
                    value.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    /// Inside `(`: advance just past the matching `)`.
    fn skip_to_closing_paren(&mut self) -> Option<()> {
        let mut depth = 1usize;
        while depth > 0 {
            if !self.skip_non_code() {
                return None;
            }
            match self.peek()? {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            self.pos += 1;
        }
        Some(())
    }

    /// Inside `{`: return the index of the matching `}`.
    fn skip_to_closing_brace(&mut self) -> Option<usize> {
        let mut depth = 1usize;
        loop {
            if !self.skip_non_code() {
                return None;
            }
            match self.peek()? {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(self.pos);
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    /// Skip comments and strings so the next peeked character is code.
    /// Returns false at end of input.
    fn skip_non_code(&mut self) -> bool {
        loop {
            let Some(current) = self.peek() else {
                return false;
            };
            match current {
                '/' if self.chars.get(self.pos + 1) == Some(&'/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.pos += 1;
                    }
                }
                '/' if self.chars.get(self.pos + 1) == Some(&'*') => {
                    self.pos += 2;
                    let mut depth = 1usize;
                    while depth > 0 {
                        match (self.peek(), self.chars.get(self.pos + 1).copied()) {
                            (Some('/'), Some('*')) => {
                                depth += 1;
                                self.pos += 2;
                            }
                            (Some('*'), Some('/')) => {
                                depth -= 1;
                                self.pos += 2;
                            }
                            (Some(_), _) => self.pos += 1,
                            (None, _) => return false,
                        }
                    }
                }
                '"' => {
                    if self.chars.get(self.pos + 1) == Some(&'"')
                        && self.chars.get(self.pos + 2) == Some(&'"')
                    {
                        self.pos += 3;
                        loop {
                            match self.peek() {
                                Some('\\') => self.pos += 2,
                                Some('"')
                                    if self.chars.get(self.pos + 1) == Some(&'"')
                                        && self.chars.get(self.pos + 2) == Some(&'"') =>
                                {
                                    self.pos += 3;
                                    break;
                                }
                                Some(_) => self.pos += 1,
                                None => return false,
                            }
                        }
                    } else {
                        self.pos += 1;
                        loop {
                            match self.peek() {
                                Some('\\') => self.pos += 2,
                                Some('"') => {
                                    self.pos += 1;
                                    break;
                                }
                                Some('\n') | None => break,
                                Some(_) => self.pos += 1,
                            }
                        }
                    }
                }
                _ => return true,
            }
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

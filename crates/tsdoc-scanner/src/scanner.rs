//! Scanner state machine.
//!
//! `ScannerState` walks the source text one token at a time. Trivia
//! (whitespace, newlines, comments) is skipped when `skip_trivia` is set;
//! every comment encountered is recorded as a [`CommentRange`] so the parser
//! can attach JSDoc without re-scanning.

use crate::syntax_kind::{SyntaxKind, text_to_keyword};
use tsdoc_common::CommentRange;

/// Saved scanner position used for speculative parsing.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    preceding_line_break: bool,
}

/// Tokenizer over a single source text.
pub struct ScannerState {
    text: String,
    skip_trivia: bool,
    /// Current position (byte offset, end of the current token)
    pos: usize,
    /// Start of the current token, after trivia
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    preceding_line_break: bool,
    /// Comments skipped so far, sorted by position
    comments: Vec<CommentRange>,
}

impl ScannerState {
    pub fn new(text: String, skip_trivia: bool) -> Self {
        ScannerState {
            text,
            skip_trivia,
            pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            preceding_line_break: false,
            comments: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn source_text(&self) -> &str {
        &self.text
    }

    pub fn get_token(&self) -> SyntaxKind {
        self.token
    }

    /// Processed token value (identifier text, unescaped string contents).
    pub fn get_token_value(&self) -> &str {
        &self.token_value
    }

    pub fn get_token_start(&self) -> u32 {
        self.token_start as u32
    }

    pub fn get_token_end(&self) -> u32 {
        self.pos as u32
    }

    /// Raw source text of the current token.
    pub fn get_token_text(&self) -> &str {
        &self.text[self.token_start..self.pos]
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.preceding_line_break
    }

    pub fn comments(&self) -> &[CommentRange] {
        &self.comments
    }

    /// Consume the scanner, returning the source text and recorded comments.
    pub fn into_parts(self) -> (String, Vec<CommentRange>) {
        (self.text, self.comments)
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            token_value: self.token_value.clone(),
            preceding_line_break: self.preceding_line_break,
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.token_start = snapshot.token_start;
        self.token_value = snapshot.token_value;
        self.preceding_line_break = snapshot.preceding_line_break;
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Scan the next token.
    pub fn scan(&mut self) -> SyntaxKind {
        self.preceding_line_break = false;
        self.token_value.clear();

        loop {
            self.token_start = self.pos;
            let bytes = self.text.as_bytes();
            let Some(&ch) = bytes.get(self.pos) else {
                self.token = SyntaxKind::EndOfFileToken;
                return self.token;
            };

            match ch {
                b'\n' | b'\r' => {
                    self.preceding_line_break = true;
                    self.pos += 1;
                    if !self.skip_trivia {
                        self.token = SyntaxKind::Unknown;
                        return self.token;
                    }
                }
                b' ' | b'\t' | 0x0b | 0x0c => {
                    self.pos += 1;
                }
                b'/' if bytes.get(self.pos + 1) == Some(&b'/') => {
                    let end = memchr::memchr2(b'\n', b'\r', &bytes[self.pos..])
                        .map_or(bytes.len(), |i| self.pos + i);
                    self.record_comment(self.pos, end, false);
                    self.pos = end;
                }
                b'/' if bytes.get(self.pos + 1) == Some(&b'*') => {
                    let body_start = self.pos + 2;
                    let end = memchr::memmem::find(&bytes[body_start..], b"*/")
                        .map_or(bytes.len(), |i| body_start + i + 2);
                    if memchr::memchr(b'\n', &bytes[self.pos..end]).is_some() {
                        self.preceding_line_break = true;
                    }
                    self.record_comment(self.pos, end, true);
                    self.pos = end;
                }
                _ if ch >= 0x80 && self.is_unicode_whitespace_at(self.pos) => {
                    let c = self.char_at(self.pos);
                    if c == '\u{2028}' || c == '\u{2029}' {
                        self.preceding_line_break = true;
                    }
                    self.pos += c.len_utf8();
                }
                _ => {
                    self.token = self.scan_token();
                    return self.token;
                }
            }
        }
    }

    fn record_comment(&mut self, start: usize, end: usize, is_multi_line: bool) {
        // Speculative parsing rescans the same comments; keep the list unique.
        if self.comments.last().is_some_and(|c| c.pos as usize >= start) {
            return;
        }
        self.comments
            .push(CommentRange::new(start as u32, end as u32, is_multi_line));
    }

    fn char_at(&self, pos: usize) -> char {
        self.text[pos..].chars().next().unwrap_or('\0')
    }

    fn is_unicode_whitespace_at(&self, pos: usize) -> bool {
        let c = self.char_at(pos);
        c.is_whitespace() || c == '\u{feff}'
    }

    fn scan_token(&mut self) -> SyntaxKind {
        let bytes = self.text.as_bytes();
        let ch = bytes[self.pos];
        let next = bytes.get(self.pos + 1).copied();
        let next2 = bytes.get(self.pos + 2).copied();

        let (kind, len) = match ch {
            b'{' => (SyntaxKind::OpenBraceToken, 1),
            b'}' => (SyntaxKind::CloseBraceToken, 1),
            b'(' => (SyntaxKind::OpenParenToken, 1),
            b')' => (SyntaxKind::CloseParenToken, 1),
            b'[' => (SyntaxKind::OpenBracketToken, 1),
            b']' => (SyntaxKind::CloseBracketToken, 1),
            b';' => (SyntaxKind::SemicolonToken, 1),
            b',' => (SyntaxKind::CommaToken, 1),
            b':' => (SyntaxKind::ColonToken, 1),
            b'@' => (SyntaxKind::AtToken, 1),
            b'~' => (SyntaxKind::TildeToken, 1),
            b'.' => {
                if next.is_some_and(|c| c.is_ascii_digit()) {
                    return self.scan_number();
                }
                if next == Some(b'.') && next2 == Some(b'.') {
                    (SyntaxKind::DotDotDotToken, 3)
                } else {
                    (SyntaxKind::DotToken, 1)
                }
            }
            // `>` is always scanned alone so `Array<Array<T>>` closes twice.
            b'>' => (SyntaxKind::GreaterThanToken, 1),
            b'<' => match next {
                Some(b'<') if next2 == Some(b'=') => (SyntaxKind::OperatorToken, 3),
                Some(b'<') | Some(b'=') => (SyntaxKind::OperatorToken, 2),
                _ => (SyntaxKind::LessThanToken, 1),
            },
            b'=' => match (next, next2) {
                (Some(b'='), Some(b'=')) => (SyntaxKind::EqualsEqualsEqualsToken, 3),
                (Some(b'='), _) => (SyntaxKind::EqualsEqualsToken, 2),
                (Some(b'>'), _) => (SyntaxKind::EqualsGreaterThanToken, 2),
                _ => (SyntaxKind::EqualsToken, 1),
            },
            b'!' => match (next, next2) {
                (Some(b'='), Some(b'=')) => (SyntaxKind::ExclamationEqualsEqualsToken, 3),
                (Some(b'='), _) => (SyntaxKind::ExclamationEqualsToken, 2),
                _ => (SyntaxKind::ExclamationToken, 1),
            },
            b'+' => match next {
                Some(b'+') | Some(b'=') => (SyntaxKind::OperatorToken, 2),
                _ => (SyntaxKind::PlusToken, 1),
            },
            b'-' => match next {
                Some(b'-') | Some(b'=') => (SyntaxKind::OperatorToken, 2),
                _ => (SyntaxKind::MinusToken, 1),
            },
            b'*' => match (next, next2) {
                (Some(b'*'), Some(b'=')) => (SyntaxKind::OperatorToken, 3),
                (Some(b'*'), _) | (Some(b'='), _) => (SyntaxKind::OperatorToken, 2),
                _ => (SyntaxKind::AsteriskToken, 1),
            },
            b'/' => match next {
                Some(b'=') => (SyntaxKind::OperatorToken, 2),
                _ => (SyntaxKind::SlashToken, 1),
            },
            b'%' => match next {
                Some(b'=') => (SyntaxKind::OperatorToken, 2),
                _ => (SyntaxKind::PercentToken, 1),
            },
            b'^' => match next {
                Some(b'=') => (SyntaxKind::OperatorToken, 2),
                _ => (SyntaxKind::CaretToken, 1),
            },
            b'&' => match (next, next2) {
                (Some(b'&'), Some(b'=')) => (SyntaxKind::OperatorToken, 3),
                (Some(b'&'), _) => (SyntaxKind::AmpersandAmpersandToken, 2),
                (Some(b'='), _) => (SyntaxKind::OperatorToken, 2),
                _ => (SyntaxKind::AmpersandToken, 1),
            },
            b'|' => match (next, next2) {
                (Some(b'|'), Some(b'=')) => (SyntaxKind::OperatorToken, 3),
                (Some(b'|'), _) => (SyntaxKind::BarBarToken, 2),
                (Some(b'='), _) => (SyntaxKind::OperatorToken, 2),
                _ => (SyntaxKind::BarToken, 1),
            },
            b'?' => match (next, next2) {
                (Some(b'?'), Some(b'=')) => (SyntaxKind::OperatorToken, 3),
                (Some(b'?'), _) => (SyntaxKind::QuestionQuestionToken, 2),
                (Some(b'.'), n) if !n.is_some_and(|c| c.is_ascii_digit()) => {
                    (SyntaxKind::QuestionDotToken, 2)
                }
                _ => (SyntaxKind::QuestionToken, 1),
            },
            b'"' | b'\'' => return self.scan_string(ch),
            b'`' => return self.scan_template(),
            b'0'..=b'9' => return self.scan_number(),
            b'#' => {
                self.pos += 1;
                if self.scan_identifier_parts() {
                    self.token_value = self.get_token_text().to_string();
                    return SyntaxKind::PrivateIdentifier;
                }
                return SyntaxKind::Unknown;
            }
            _ => {
                if self.scan_identifier_parts() {
                    self.token_value = self.get_token_text().to_string();
                    return text_to_keyword(&self.token_value).unwrap_or(SyntaxKind::Identifier);
                }
                // Unrecognized character: consume it whole.
                self.pos += self.char_at(self.pos).len_utf8().max(1);
                return SyntaxKind::Unknown;
            }
        };

        self.pos += len;
        self.token_value = self.text[self.token_start..self.pos].to_string();
        kind
    }

    /// Advance over identifier characters. Returns false if none matched.
    fn scan_identifier_parts(&mut self) -> bool {
        let start = self.pos;
        while self.pos < self.text.len() {
            let c = self.char_at(self.pos);
            let ok = if self.pos == start {
                is_identifier_start(c)
            } else {
                is_identifier_part(c)
            };
            if !ok {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.pos > start
    }

    fn scan_string(&mut self, quote: u8) -> SyntaxKind {
        let bytes = self.text.as_bytes();
        self.pos += 1;
        let mut value = String::new();
        while self.pos < bytes.len() {
            let ch = bytes[self.pos];
            if ch == quote {
                self.pos += 1;
                break;
            }
            if ch == b'\n' || ch == b'\r' {
                // Unterminated string; stop at the line end.
                break;
            }
            if ch == b'\\' {
                self.pos += 1;
                if self.pos >= bytes.len() {
                    break;
                }
                let escaped = self.char_at(self.pos);
                self.pos += escaped.len_utf8();
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    '0' => value.push('\0'),
                    '\r' | '\n' | '\0' => {}
                    other => value.push(other),
                }
                continue;
            }
            let c = self.char_at(self.pos);
            value.push(c);
            self.pos += c.len_utf8();
        }
        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    /// Scan a whole template literal, including any `${...}` substitutions.
    fn scan_template(&mut self) -> SyntaxKind {
        let len = self.text.len();
        self.pos += 1;
        let mut has_substitution = false;
        let mut terminated = false;
        while self.pos < len {
            match self.text.as_bytes()[self.pos] {
                b'`' => {
                    self.pos += 1;
                    terminated = true;
                    break;
                }
                b'\\' => self.pos += 2,
                b'$' if self.text.as_bytes().get(self.pos + 1) == Some(&b'{') => {
                    has_substitution = true;
                    self.pos += 2;
                    self.skip_template_substitution();
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(len);
        let end = if terminated { self.pos - 1 } else { len };
        self.token_value = self.text[self.token_start + 1..end].to_string();
        if has_substitution {
            SyntaxKind::TemplateLiteral
        } else {
            SyntaxKind::NoSubstitutionTemplateLiteral
        }
    }

    fn skip_template_substitution(&mut self) {
        let len = self.text.len();
        let mut depth = 1usize;
        while self.pos < len {
            match self.text.as_bytes()[self.pos] {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return;
                    }
                }
                q @ (b'"' | b'\'') => {
                    let saved = self.token_start;
                    self.token_start = self.pos;
                    self.scan_string(q);
                    self.token_start = saved;
                    continue;
                }
                b'`' => {
                    let saved = self.token_start;
                    self.token_start = self.pos;
                    self.scan_template();
                    self.token_start = saved;
                    continue;
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let bytes = self.text.as_bytes();
        let start = self.pos;
        if bytes[start] == b'0'
            && matches!(
                bytes.get(start + 1),
                Some(b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
            )
        {
            self.pos += 2;
            while self.pos < bytes.len()
                && (bytes[self.pos].is_ascii_hexdigit() || bytes[self.pos] == b'_')
            {
                self.pos += 1;
            }
        } else {
            while self.pos < bytes.len()
                && (bytes[self.pos].is_ascii_digit() || bytes[self.pos] == b'_')
            {
                self.pos += 1;
            }
            if bytes.get(self.pos) == Some(&b'.') {
                self.pos += 1;
                while self.pos < bytes.len()
                    && (bytes[self.pos].is_ascii_digit() || bytes[self.pos] == b'_')
                {
                    self.pos += 1;
                }
            }
            if matches!(bytes.get(self.pos), Some(b'e' | b'E')) {
                let mut p = self.pos + 1;
                if matches!(bytes.get(p), Some(b'+' | b'-')) {
                    p += 1;
                }
                if bytes.get(p).is_some_and(|c| c.is_ascii_digit()) {
                    self.pos = p;
                    while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                        self.pos += 1;
                    }
                }
            }
        }

        let kind = if bytes.get(self.pos) == Some(&b'n') {
            self.pos += 1;
            SyntaxKind::BigIntLiteral
        } else {
            SyntaxKind::NumericLiteral
        };
        self.token_value = self.text[start..self.pos].to_string();
        kind
    }

    /// Re-scan the current `/` (or `/=`) token as a regular expression
    /// literal. Leaves the token unchanged if no closing slash is found on
    /// the same line.
    pub fn rescan_slash_token(&mut self) -> SyntaxKind {
        if !matches!(self.token, SyntaxKind::SlashToken | SyntaxKind::OperatorToken)
            || self.text.as_bytes().get(self.token_start) != Some(&b'/')
        {
            return self.token;
        }
        let bytes = self.text.as_bytes();
        let mut p = self.token_start + 1;
        let mut in_class = false;
        loop {
            let Some(&ch) = bytes.get(p) else {
                return self.token;
            };
            match ch {
                b'\n' | b'\r' => return self.token,
                b'\\' => p += 1,
                b'[' => in_class = true,
                b']' => in_class = false,
                b'/' if !in_class => {
                    p += 1;
                    break;
                }
                _ => {}
            }
            p += 1;
        }
        while p < bytes.len() && bytes[p].is_ascii_alphabetic() {
            p += 1;
        }
        self.pos = p;
        self.token_value = self.text[self.token_start..p].to_string();
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

fn is_identifier_part(c: char) -> bool {
    c == '$' || c == '_' || c == '\u{200c}' || c == '\u{200d}' || c.is_alphanumeric()
}

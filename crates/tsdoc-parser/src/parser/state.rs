//! Parser state and token-level helpers.
//!
//! The parse methods themselves live in the `state_*` modules; this file
//! owns the token cursor, look-ahead, diagnostics and the balanced-token
//! skipping used for bodies the declaration parser does not model.

use super::base::NodeIndex;
use super::node::{ModifierFlags, NodeData};
use super::node_arena::NodeArena;
use serde::Serialize;
use tsdoc_common::CommentRange;
use tsdoc_scanner::{ScannerState, SyntaxKind};

/// Inside the check type of a conditional type, where `extends` belongs to
/// the enclosing conditional.
pub(crate) const CONTEXT_FLAG_DISALLOW_CONDITIONAL: u32 = 1 << 0;

/// Nesting limit for recursive type and expression parsing.
const MAX_RECURSION_DEPTH: u32 = 512;

/// A syntax error found while parsing. Parsing always continues.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    pub start: u32,
    pub length: u32,
    pub message: String,
}

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) arena: NodeArena,
    pub(crate) file_name: String,
    pub(crate) current_token: SyntaxKind,
    pub(crate) prev_token: SyntaxKind,
    /// End of the last consumed token; node spans end here
    pub(crate) prev_token_end: u32,
    pub(crate) context_flags: u32,
    pub(crate) parse_diagnostics: Vec<ParseDiagnostic>,
    pub(crate) recursion_depth: u32,
}

struct ParserSnapshot {
    scanner: tsdoc_scanner::ScannerSnapshot,
    current_token: SyntaxKind,
    prev_token: SyntaxKind,
    prev_token_end: u32,
    context_flags: u32,
    diagnostics_len: usize,
    arena_len: usize,
}

impl ParserState {
    pub fn new(file_name: String, source_text: String) -> ParserState {
        ParserState {
            scanner: ScannerState::new(source_text, true),
            arena: NodeArena::new(),
            file_name,
            current_token: SyntaxKind::Unknown,
            prev_token: SyntaxKind::Unknown,
            prev_token_end: 0,
            context_flags: 0,
            parse_diagnostics: Vec::new(),
            recursion_depth: 0,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn get_diagnostics(&self) -> &[ParseDiagnostic] {
        &self.parse_diagnostics
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn source_text(&self) -> &str {
        self.scanner.source_text()
    }

    /// Consume the parser, returning the arena, source text, comments and
    /// diagnostics.
    pub fn into_parts(self) -> (NodeArena, String, Vec<CommentRange>, Vec<ParseDiagnostic>) {
        let (text, comments) = self.scanner.into_parts();
        (self.arena, text, comments, self.parse_diagnostics)
    }

    // =========================================================================
    // Token Cursor
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.current_token
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.get_token_start()
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.get_token_end()
    }

    pub(crate) fn token_value(&self) -> String {
        self.scanner.get_token_value().to_string()
    }

    #[inline]
    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_token = self.current_token;
        self.prev_token_end = self.scanner.get_token_end();
        self.current_token = self.scanner.scan();
        self.current_token
    }

    /// Advance in expression position: a `/` that cannot be a division is
    /// rescanned as a regular expression literal.
    pub(crate) fn next_token_in_expression(&mut self) -> SyntaxKind {
        self.next_token();
        if matches!(
            self.current_token,
            SyntaxKind::SlashToken | SyntaxKind::OperatorToken
        ) && !ends_expression(self.prev_token)
        {
            self.current_token = self.scanner.rescan_slash_token();
        }
        self.current_token
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.current_token == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.parse_optional(kind) {
            return true;
        }
        self.parse_error_at_current_token(&format!("{} expected", token_display(kind)));
        false
    }

    pub(crate) fn parse_error_at_current_token(&mut self, message: &str) {
        let start = self.token_pos();
        // One diagnostic per position keeps error recovery from cascading.
        if self.parse_diagnostics.last().is_some_and(|d| d.start == start) {
            return;
        }
        tracing::trace!(file = %self.file_name, start, message, "parse error");
        self.parse_diagnostics.push(ParseDiagnostic {
            start,
            length: self.token_end().saturating_sub(start),
            message: message.to_string(),
        });
    }

    // =========================================================================
    // Look-ahead and Speculation
    // =========================================================================

    fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            scanner: self.scanner.save_state(),
            current_token: self.current_token,
            prev_token: self.prev_token,
            prev_token_end: self.prev_token_end,
            context_flags: self.context_flags,
            diagnostics_len: self.parse_diagnostics.len(),
            arena_len: self.arena.len(),
        }
    }

    fn restore(&mut self, snapshot: ParserSnapshot) {
        self.scanner.restore_state(snapshot.scanner);
        self.current_token = snapshot.current_token;
        self.prev_token = snapshot.prev_token;
        self.prev_token_end = snapshot.prev_token_end;
        self.context_flags = snapshot.context_flags;
        self.parse_diagnostics.truncate(snapshot.diagnostics_len);
        self.arena.truncate(snapshot.arena_len);
    }

    /// Run `f` and rewind the parser afterwards.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let snapshot = self.snapshot();
        let result = f(self);
        self.restore(snapshot);
        result
    }

    /// Run `f`; rewind only if it returns `None`.
    pub(crate) fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let snapshot = self.snapshot();
        let result = f(self);
        if result.is_none() {
            self.restore(snapshot);
        }
        result
    }

    pub(crate) fn next_token_is(&mut self, kind: SyntaxKind) -> bool {
        self.look_ahead(|p| p.next_token() == kind)
    }

    /// The next token is an identifier or keyword on the same line.
    pub(crate) fn next_is_identifier_or_keyword_on_same_line(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            p.token().is_identifier_or_keyword() && !p.has_preceding_line_break()
        })
    }

    // =========================================================================
    // Node Construction
    // =========================================================================

    /// Create a node spanning `pos` to the end of the last consumed token.
    pub(crate) fn finish_node(
        &mut self,
        pos: u32,
        modifiers: ModifierFlags,
        data: NodeData,
    ) -> NodeIndex {
        let end = self.prev_token_end.max(pos);
        self.arena.add(pos, end, modifiers, data)
    }

    /// Source text from `pos` to the end of the last consumed token.
    pub(crate) fn text_from(&self, pos: u32) -> String {
        let end = self.prev_token_end.max(pos) as usize;
        self.source_text()
            .get(pos as usize..end)
            .unwrap_or_default()
            .to_string()
    }

    pub(crate) fn enter_recursion(&mut self) -> bool {
        if self.recursion_depth >= MAX_RECURSION_DEPTH {
            self.parse_error_at_current_token("Nesting too deep");
            return false;
        }
        self.recursion_depth += 1;
        true
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }

    // =========================================================================
    // Identifiers and Semicolons
    // =========================================================================

    /// Identifiers and keywords that are not reserved words.
    pub(crate) fn is_identifier(&self) -> bool {
        let token = self.current_token;
        token == SyntaxKind::Identifier
            || token.is_contextual_keyword()
            || token.is_strict_reserved_word()
    }

    /// Consume an identifier or keyword and return its text.
    pub(crate) fn parse_identifier_name(&mut self) -> String {
        if self.current_token.is_identifier_or_keyword()
            || self.is_token(SyntaxKind::PrivateIdentifier)
        {
            let text = self.token_value();
            self.next_token();
            text
        } else {
            self.parse_error_at_current_token("Identifier expected");
            String::new()
        }
    }

    /// Dotted name (`A.B.C`).
    pub(crate) fn parse_entity_name(&mut self) -> Vec<String> {
        let mut segments = vec![self.parse_identifier_name()];
        while self.is_token(SyntaxKind::DotToken) {
            self.next_token();
            segments.push(self.parse_identifier_name());
        }
        segments
    }

    /// A statement can end here: `;`, `}`, end of file or a line break.
    pub(crate) fn can_parse_semicolon(&self) -> bool {
        matches!(
            self.current_token,
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.has_preceding_line_break()
    }

    pub(crate) fn parse_semicolon(&mut self) {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return;
        }
        if !self.can_parse_semicolon() {
            self.parse_error_at_current_token("';' expected");
        }
    }

    // =========================================================================
    // Skipping
    // =========================================================================

    /// Consume a bracketed group starting at the current `(`, `[` or `{`
    /// through its matching close.
    pub(crate) fn skip_balanced(&mut self) {
        if !is_open_bracket(self.current_token) {
            return;
        }
        let mut depth = 0usize;
        loop {
            match self.current_token {
                SyntaxKind::EndOfFileToken => {
                    self.parse_error_at_current_token("Unexpected end of file");
                    return;
                }
                kind if is_open_bracket(kind) => depth += 1,
                kind if is_close_bracket(kind) => {
                    depth -= 1;
                    if depth == 0 {
                        self.next_token();
                        return;
                    }
                }
                _ => {}
            }
            self.next_token_in_expression();
        }
    }

    /// The current token ends an expression at nesting depth zero.
    pub(crate) fn is_expression_terminator(&self) -> bool {
        matches!(
            self.current_token,
            SyntaxKind::CommaToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::EndOfFileToken
        ) || self.is_automatic_semicolon()
    }

    /// A line break separates two complete statements here.
    pub(crate) fn is_automatic_semicolon(&self) -> bool {
        self.has_preceding_line_break()
            && ends_expression(self.prev_token)
            && (self.current_token.is_identifier_or_keyword()
                || self.current_token.is_literal()
                || matches!(
                    self.current_token,
                    SyntaxKind::AtToken | SyntaxKind::PrivateIdentifier
                ))
    }

    /// Skip an expression up to (not including) its terminator.
    pub(crate) fn skip_expression(&mut self) {
        let start = self.token_pos();
        loop {
            if self.token_pos() != start && self.is_expression_terminator() {
                return;
            }
            match self.current_token {
                SyntaxKind::CommaToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::EndOfFileToken => return,
                kind if is_open_bracket(kind) => self.skip_balanced(),
                _ => {
                    self.next_token_in_expression();
                }
            }
        }
    }

    /// Skip a statement the parser does not model (`if`, `for`, expression
    /// statements, ...). Always consumes at least one token unless the
    /// current token closes the enclosing block.
    pub(crate) fn skip_statement(&mut self) {
        let start = self.token_pos();
        loop {
            match self.current_token {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::CloseBraceToken if self.token_pos() != start => return,
                SyntaxKind::SemicolonToken => {
                    self.next_token_in_expression();
                    return;
                }
                _ if self.token_pos() != start && self.is_automatic_semicolon() => return,
                kind if is_open_bracket(kind) => self.skip_balanced(),
                _ => {
                    self.next_token_in_expression();
                }
            }
        }
    }
}

pub(crate) fn is_open_bracket(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::OpenParenToken | SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken
    )
}

pub(crate) fn is_close_bracket(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::CloseParenToken | SyntaxKind::CloseBracketToken | SyntaxKind::CloseBraceToken
    )
}

/// Tokens after which a `/` is a division and a line break may end a
/// statement.
pub(crate) fn ends_expression(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::Identifier
        || kind.is_literal()
        || kind.is_contextual_keyword()
        || matches!(
            kind,
            SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::ThisKeyword
                | SyntaxKind::SuperKeyword
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::PrivateIdentifier
        )
}

fn token_display(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::OpenBraceToken => "'{'",
        SyntaxKind::CloseBraceToken => "'}'",
        SyntaxKind::OpenParenToken => "'('",
        SyntaxKind::CloseParenToken => "')'",
        SyntaxKind::OpenBracketToken => "'['",
        SyntaxKind::CloseBracketToken => "']'",
        SyntaxKind::SemicolonToken => "';'",
        SyntaxKind::CommaToken => "','",
        SyntaxKind::ColonToken => "':'",
        SyntaxKind::LessThanToken => "'<'",
        SyntaxKind::GreaterThanToken => "'>'",
        SyntaxKind::EqualsToken => "'='",
        SyntaxKind::EqualsGreaterThanToken => "'=>'",
        SyntaxKind::QuestionToken => "'?'",
        SyntaxKind::StringLiteral => "String literal",
        SyntaxKind::Identifier => "Identifier",
        _ => "Token",
    }
}

//! Parser state - initializer expressions
//!
//! Expressions are only parsed far enough to give a variable, property or
//! parameter a display type and a default-value text. Anything more complex
//! becomes `OtherExpression` spanning its source text.

use super::base::NodeIndex;
use super::node::{
    AsExpressionData, ModifierFlags, NodeData, ParameterData, SignatureData, TypeReferenceData,
};
use super::state::ParserState;
use tsdoc_scanner::SyntaxKind;

impl ParserState {
    /// Parse the expression after `=` (or after `export =` / `export default`).
    pub(crate) fn parse_initializer(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            let pos = self.token_pos();
            self.skip_expression();
            return self.finish_node(pos, ModifierFlags::empty(), NodeData::OtherExpression);
        }
        let result = self.parse_initializer_worker();
        self.exit_recursion();
        result
    }

    fn parse_initializer_worker(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let arena_len = self.arena.len();
        // A leading regex literal (`= /x/g`)
        if matches!(
            self.token(),
            SyntaxKind::SlashToken | SyntaxKind::OperatorToken
        ) {
            self.current_token = self.scanner.rescan_slash_token();
        }

        let primary = self.parse_primary_initializer(pos);
        if self.is_expression_terminator() {
            return primary;
        }

        match self.token() {
            SyntaxKind::AsKeyword | SyntaxKind::SatisfiesKeyword
                if !self.has_preceding_line_break() =>
            {
                let is_satisfies = self.is_token(SyntaxKind::SatisfiesKeyword);
                self.next_token();
                let type_node = if self.is_token(SyntaxKind::ConstKeyword) {
                    self.next_token();
                    NodeIndex::NONE
                } else {
                    self.parse_type()
                };
                if !self.is_expression_terminator() {
                    return self.finish_other_expression(pos, arena_len);
                }
                if is_satisfies {
                    return primary;
                }
                self.finish_node(
                    pos,
                    ModifierFlags::empty(),
                    NodeData::AsExpression(AsExpressionData {
                        expression: primary,
                        type_node,
                    }),
                )
            }
            _ => self.finish_other_expression(pos, arena_len),
        }
    }

    /// Discard any partial nodes and cover the whole expression as
    /// `OtherExpression`.
    fn finish_other_expression(&mut self, pos: u32, arena_len: usize) -> NodeIndex {
        self.skip_expression();
        self.arena.truncate(arena_len);
        self.finish_node(pos, ModifierFlags::empty(), NodeData::OtherExpression)
    }

    fn parse_primary_initializer(&mut self, pos: u32) -> NodeIndex {
        match self.token() {
            kind @ (SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateLiteral
            | SyntaxKind::RegularExpressionLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword) => {
                self.next_token();
                self.finish_node(pos, ModifierFlags::empty(), NodeData::Literal(kind))
            }
            SyntaxKind::MinusToken | SyntaxKind::PlusToken
                if self.look_ahead(|p| {
                    matches!(
                        p.next_token(),
                        SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral
                    )
                }) =>
            {
                self.next_token();
                let kind = self.token();
                self.next_token();
                self.finish_node(pos, ModifierFlags::empty(), NodeData::Literal(kind))
            }
            SyntaxKind::FunctionKeyword => self.parse_function_expression(pos),
            SyntaxKind::ClassKeyword => {
                let data = self.parse_class_like();
                self.finish_node(pos, ModifierFlags::empty(), NodeData::ClassExpression(data))
            }
            SyntaxKind::NewKeyword => self.parse_new_expression(pos),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(pos),
            SyntaxKind::OpenBraceToken => {
                self.skip_balanced();
                self.finish_node(pos, ModifierFlags::empty(), NodeData::ObjectLiteral)
            }
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken | SyntaxKind::AsyncKeyword => {
                if let Some(arrow) = self.try_parse(|p| p.parse_arrow_function(pos)) {
                    return arrow;
                }
                if self.is_token(SyntaxKind::AsyncKeyword)
                    && self.next_token_is(SyntaxKind::FunctionKeyword)
                {
                    self.next_token();
                    return self.parse_function_expression(pos);
                }
                self.skip_expression();
                self.finish_node(pos, ModifierFlags::empty(), NodeData::OtherExpression)
            }
            kind if kind.is_identifier_or_keyword() => {
                if self.next_token_is(SyntaxKind::EqualsGreaterThanToken) {
                    if let Some(arrow) = self.try_parse(|p| p.parse_arrow_function(pos)) {
                        return arrow;
                    }
                }
                let name = self.parse_entity_name();
                self.finish_node(pos, ModifierFlags::empty(), NodeData::EntityExpression(name))
            }
            _ => {
                self.skip_expression();
                self.finish_node(pos, ModifierFlags::empty(), NodeData::OtherExpression)
            }
        }
    }

    /// `function* name<T>(params): R { ... }` in expression position.
    fn parse_function_expression(&mut self, pos: u32) -> NodeIndex {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        self.parse_optional(SyntaxKind::AsteriskToken);
        if self.token().is_identifier_or_keyword() {
            self.next_token();
        }
        let signature = self.parse_signature(SyntaxKind::ColonToken);
        if self.is_token(SyntaxKind::OpenBraceToken) {
            self.skip_balanced();
        }
        self.finish_node(pos, ModifierFlags::empty(), NodeData::FunctionExpression(signature))
    }

    /// `async? (params): R => body` or `async? x => body`. Returns `None`
    /// when the tokens do not form an arrow function.
    fn parse_arrow_function(&mut self, pos: u32) -> Option<NodeIndex> {
        if self.is_token(SyntaxKind::AsyncKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                !p.has_preceding_line_break()
                    && (p.is_token(SyntaxKind::OpenParenToken)
                        || p.is_token(SyntaxKind::LessThanToken)
                        || p.token().is_identifier_or_keyword())
            })
        {
            self.next_token();
        }

        let signature = if self.token().is_identifier_or_keyword() {
            let param_pos = self.token_pos();
            let name = self.parse_identifier_name();
            let parameter = self.finish_node(
                param_pos,
                ModifierFlags::empty(),
                NodeData::Parameter(ParameterData {
                    name,
                    optional: false,
                    rest: false,
                    type_node: NodeIndex::NONE,
                    initializer: NodeIndex::NONE,
                }),
            );
            SignatureData {
                type_parameters: Vec::new(),
                parameters: vec![parameter],
                return_type: NodeIndex::NONE,
            }
        } else {
            if !matches!(
                self.token(),
                SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
            ) {
                return None;
            }
            let diagnostics_before = self.parse_diagnostics.len();
            let signature = self.parse_signature(SyntaxKind::ColonToken);
            if self.parse_diagnostics.len() != diagnostics_before {
                return None;
            }
            signature
        };

        if !self.is_token(SyntaxKind::EqualsGreaterThanToken) || self.has_preceding_line_break() {
            return None;
        }
        self.next_token_in_expression();
        if self.is_token(SyntaxKind::OpenBraceToken) {
            self.skip_balanced();
        } else {
            self.skip_expression();
        }
        Some(self.finish_node(pos, ModifierFlags::empty(), NodeData::ArrowFunction(signature)))
    }

    /// `new A.B<T>(args)`
    fn parse_new_expression(&mut self, pos: u32) -> NodeIndex {
        self.parse_expected(SyntaxKind::NewKeyword);
        if !self.token().is_identifier_or_keyword() {
            self.skip_expression();
            return self.finish_node(pos, ModifierFlags::empty(), NodeData::OtherExpression);
        }
        let name = self.parse_entity_name();
        let type_arguments = if self.is_token(SyntaxKind::LessThanToken) {
            self.try_parse(|p| {
                let arguments = p.parse_type_arguments();
                p.is_token(SyntaxKind::OpenParenToken).then_some(arguments)
            })
            .unwrap_or_default()
        } else {
            Vec::new()
        };
        if self.is_token(SyntaxKind::OpenParenToken) {
            self.skip_balanced();
        }
        self.finish_node(
            pos,
            ModifierFlags::empty(),
            NodeData::NewExpression(TypeReferenceData {
                name,
                type_arguments,
            }),
        )
    }

    /// `[a, b, ...c]`
    fn parse_array_literal(&mut self, pos: u32) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let mut elements = Vec::new();
        while !matches!(
            self.token(),
            SyntaxKind::CloseBracketToken | SyntaxKind::EndOfFileToken
        ) {
            let start = self.token_pos();
            if self.parse_optional(SyntaxKind::CommaToken) {
                continue;
            }
            self.parse_optional(SyntaxKind::DotDotDotToken);
            elements.push(self.parse_initializer());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
            if self.token_pos() == start {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.finish_node(pos, ModifierFlags::empty(), NodeData::ArrayLiteral(elements))
    }
}

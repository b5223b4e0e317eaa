//! Parser state - type node parsing methods

use super::base::NodeIndex;
use super::node::{
    ModifierFlags, NodeData, TupleMemberData, TypeOperatorData, TypePredicateData,
    TypeReferenceData,
};
use super::state::{CONTEXT_FLAG_DISALLOW_CONDITIONAL, ParserState};
use tsdoc_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Entry Points
    // =========================================================================

    /// Parse a type, including function/constructor types and conditional
    /// types.
    pub(crate) fn parse_type(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            let pos = self.token_pos();
            return self.finish_node(pos, ModifierFlags::empty(), NodeData::OpaqueType);
        }
        let result = self.parse_type_worker();
        self.exit_recursion();
        result
    }

    fn parse_type_worker(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        if self.is_start_of_function_or_constructor_type() {
            return self.parse_function_or_constructor_type();
        }
        let saved_flags = self.context_flags;
        let check_type = self.parse_union_type();
        if saved_flags & CONTEXT_FLAG_DISALLOW_CONDITIONAL == 0
            && self.is_token(SyntaxKind::ExtendsKeyword)
            && !self.has_preceding_line_break()
        {
            // `Check extends Extends ? True : False`
            self.next_token();
            self.context_flags |= CONTEXT_FLAG_DISALLOW_CONDITIONAL;
            self.parse_type();
            self.context_flags = saved_flags;
            self.parse_expected(SyntaxKind::QuestionToken);
            self.parse_type();
            self.parse_expected(SyntaxKind::ColonToken);
            self.parse_type();
            return self.finish_node(pos, ModifierFlags::empty(), NodeData::OpaqueType);
        }
        check_type
    }

    /// Return type position: a type or a type predicate (`x is T`,
    /// `asserts x`, `asserts this is T`).
    pub(crate) fn parse_return_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let asserts = self.is_token(SyntaxKind::AssertsKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                !p.has_preceding_line_break()
                    && (p.is_identifier() || p.is_token(SyntaxKind::ThisKeyword))
            });
        if asserts {
            self.next_token();
        }
        let is_predicate = asserts
            || ((self.is_identifier() || self.is_token(SyntaxKind::ThisKeyword))
                && self.look_ahead(|p| {
                    p.next_token();
                    p.is_token(SyntaxKind::IsKeyword) && !p.has_preceding_line_break()
                }));
        if !is_predicate {
            return self.parse_type();
        }
        let parameter_name = self.parse_identifier_name();
        let type_node = if self.parse_optional(SyntaxKind::IsKeyword) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        self.finish_node(
            pos,
            ModifierFlags::empty(),
            NodeData::TypePredicate(TypePredicateData {
                asserts,
                parameter_name,
                type_node,
            }),
        )
    }

    /// `A.B<C>` as a type reference node.
    pub(crate) fn parse_type_reference(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let name = self.parse_entity_name();
        let type_arguments = if self.is_token(SyntaxKind::LessThanToken) {
            self.parse_type_arguments()
        } else {
            Vec::new()
        };
        self.finish_node(
            pos,
            ModifierFlags::empty(),
            NodeData::TypeReference(TypeReferenceData {
                name,
                type_arguments,
            }),
        )
    }

    /// `<A, B>`; the current token is `<`.
    pub(crate) fn parse_type_arguments(&mut self) -> Vec<NodeIndex> {
        let mut arguments = Vec::new();
        self.parse_expected(SyntaxKind::LessThanToken);
        let saved_flags = self.context_flags;
        self.context_flags &= !CONTEXT_FLAG_DISALLOW_CONDITIONAL;
        while !matches!(
            self.token(),
            SyntaxKind::GreaterThanToken | SyntaxKind::EndOfFileToken
        ) {
            let start = self.token_pos();
            arguments.push(self.parse_type());
            if !self.parse_optional(SyntaxKind::CommaToken) || self.token_pos() == start {
                break;
            }
        }
        self.context_flags = saved_flags;
        self.parse_expected(SyntaxKind::GreaterThanToken);
        arguments
    }

    // =========================================================================
    // Function and Constructor Types
    // =========================================================================

    fn is_start_of_function_or_constructor_type(&mut self) -> bool {
        match self.token() {
            SyntaxKind::LessThanToken | SyntaxKind::NewKeyword => true,
            SyntaxKind::AbstractKeyword => self.next_token_is(SyntaxKind::NewKeyword),
            SyntaxKind::OpenParenToken => self.look_ahead(|p| p.is_unambiguously_function_type()),
            _ => false,
        }
    }

    /// Called on `(`: decide between a parenthesized type and the parameter
    /// list of a function type.
    fn is_unambiguously_function_type(&mut self) -> bool {
        self.next_token();
        if matches!(
            self.token(),
            SyntaxKind::CloseParenToken | SyntaxKind::DotDotDotToken
        ) {
            return true;
        }
        if matches!(
            self.token(),
            SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken
        ) {
            // A destructuring parameter is followed by `:`, `,`, `?`, `=` or `)`.
            self.skip_balanced();
            return matches!(
                self.token(),
                SyntaxKind::ColonToken
                    | SyntaxKind::CommaToken
                    | SyntaxKind::QuestionToken
                    | SyntaxKind::EqualsToken
                    | SyntaxKind::CloseParenToken
            );
        }
        if self.is_identifier() || self.is_token(SyntaxKind::ThisKeyword) {
            self.next_token();
            if matches!(
                self.token(),
                SyntaxKind::ColonToken
                    | SyntaxKind::CommaToken
                    | SyntaxKind::QuestionToken
                    | SyntaxKind::EqualsToken
            ) {
                return true;
            }
            if self.is_token(SyntaxKind::CloseParenToken) {
                return self.next_token() == SyntaxKind::EqualsGreaterThanToken;
            }
        }
        false
    }

    fn parse_function_or_constructor_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_optional(SyntaxKind::AbstractKeyword);
        let is_constructor = self.parse_optional(SyntaxKind::NewKeyword);
        let saved_flags = self.context_flags;
        self.context_flags &= !CONTEXT_FLAG_DISALLOW_CONDITIONAL;
        let signature = self.parse_signature(SyntaxKind::EqualsGreaterThanToken);
        self.context_flags = saved_flags;
        let data = if is_constructor {
            NodeData::ConstructorType(signature)
        } else {
            NodeData::FunctionType(signature)
        };
        self.finish_node(pos, ModifierFlags::empty(), data)
    }

    // =========================================================================
    // Union, Intersection and Operators
    // =========================================================================

    fn parse_union_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_optional(SyntaxKind::BarToken);
        let first = self.parse_intersection_type();
        if !self.is_token(SyntaxKind::BarToken) {
            return first;
        }
        let mut types = vec![first];
        while self.parse_optional(SyntaxKind::BarToken) {
            types.push(self.parse_intersection_type());
        }
        self.finish_node(pos, ModifierFlags::empty(), NodeData::UnionType(types))
    }

    fn parse_intersection_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_optional(SyntaxKind::AmpersandToken);
        let first = self.parse_type_operator();
        if !self.is_token(SyntaxKind::AmpersandToken) {
            return first;
        }
        let mut types = vec![first];
        while self.parse_optional(SyntaxKind::AmpersandToken) {
            types.push(self.parse_type_operator());
        }
        self.finish_node(pos, ModifierFlags::empty(), NodeData::IntersectionType(types))
    }

    fn parse_type_operator(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::KeyOfKeyword | SyntaxKind::UniqueKeyword | SyntaxKind::ReadonlyKeyword => {
                let operator = self.token();
                self.next_token();
                let type_node = self.parse_type_operator();
                self.finish_node(
                    pos,
                    ModifierFlags::empty(),
                    NodeData::TypeOperator(TypeOperatorData {
                        operator,
                        type_node,
                    }),
                )
            }
            SyntaxKind::InferKeyword => {
                self.next_token();
                self.parse_identifier_name();
                if self.is_token(SyntaxKind::ExtendsKeyword)
                    && self.context_flags & CONTEXT_FLAG_DISALLOW_CONDITIONAL != 0
                {
                    // `infer U extends C` unless it is the check of a
                    // conditional (`infer U extends C ? X : Y`).
                    self.try_parse(|p| {
                        p.next_token();
                        p.parse_type();
                        (!p.is_token(SyntaxKind::QuestionToken)).then_some(())
                    });
                }
                self.finish_node(pos, ModifierFlags::empty(), NodeData::OpaqueType)
            }
            _ => self.parse_postfix_type(),
        }
    }

    /// `T[]` and indexed access `T[K]`.
    fn parse_postfix_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut ty = self.parse_non_array_type();
        while self.is_token(SyntaxKind::OpenBracketToken) && !self.has_preceding_line_break() {
            if self.next_token_is(SyntaxKind::CloseBracketToken) {
                self.next_token();
                self.next_token();
                ty = self.finish_node(pos, ModifierFlags::empty(), NodeData::ArrayType(ty));
            } else {
                self.next_token();
                let saved_flags = self.context_flags;
                self.context_flags &= !CONTEXT_FLAG_DISALLOW_CONDITIONAL;
                self.parse_type();
                self.context_flags = saved_flags;
                self.parse_expected(SyntaxKind::CloseBracketToken);
                ty = self.finish_node(pos, ModifierFlags::empty(), NodeData::OpaqueType);
            }
        }
        ty
    }

    // =========================================================================
    // Primary Types
    // =========================================================================

    fn parse_non_array_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::AnyKeyword
            | SyntaxKind::UnknownKeyword
            | SyntaxKind::StringKeyword
            | SyntaxKind::NumberKeyword
            | SyntaxKind::BooleanKeyword
            | SyntaxKind::BigIntKeyword
            | SyntaxKind::SymbolKeyword
            | SyntaxKind::ObjectKeyword
            | SyntaxKind::NeverKeyword
            | SyntaxKind::UndefinedKeyword
                if !self.next_token_is(SyntaxKind::DotToken) =>
            {
                let kind = self.token();
                self.next_token();
                self.finish_node(pos, ModifierFlags::empty(), NodeData::KeywordType(kind))
            }
            SyntaxKind::VoidKeyword | SyntaxKind::NullKeyword | SyntaxKind::ThisKeyword => {
                let kind = self.token();
                self.next_token();
                self.finish_node(pos, ModifierFlags::empty(), NodeData::KeywordType(kind))
            }
            SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => {
                self.next_token();
                self.finish_node(pos, ModifierFlags::empty(), NodeData::LiteralType)
            }
            SyntaxKind::MinusToken
                if self.look_ahead(|p| {
                    matches!(
                        p.next_token(),
                        SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral
                    )
                }) =>
            {
                self.next_token();
                self.next_token();
                self.finish_node(pos, ModifierFlags::empty(), NodeData::LiteralType)
            }
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateLiteral => {
                self.next_token();
                self.finish_node(pos, ModifierFlags::empty(), NodeData::OpaqueType)
            }
            SyntaxKind::TypeOfKeyword => self.parse_type_query(),
            SyntaxKind::ImportKeyword => self.parse_import_type(),
            SyntaxKind::OpenBraceToken => {
                if self.look_ahead(|p| p.is_start_of_mapped_type()) {
                    self.skip_balanced();
                    self.finish_node(pos, ModifierFlags::empty(), NodeData::OpaqueType)
                } else {
                    let members = self.parse_object_type_members();
                    self.finish_node(pos, ModifierFlags::empty(), NodeData::TypeLiteral(members))
                }
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let saved_flags = self.context_flags;
                self.context_flags &= !CONTEXT_FLAG_DISALLOW_CONDITIONAL;
                let inner = self.parse_type();
                self.context_flags = saved_flags;
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.finish_node(pos, ModifierFlags::empty(), NodeData::ParenthesizedType(inner))
            }
            kind if kind.is_identifier_or_keyword() => self.parse_type_reference(),
            _ => {
                self.parse_error_at_current_token("Type expected");
                self.finish_node(pos, ModifierFlags::empty(), NodeData::OpaqueType)
            }
        }
    }

    /// Called on `{`: `{ [K in T]: ... }`, optionally with `readonly`/`+`/`-`.
    fn is_start_of_mapped_type(&mut self) -> bool {
        self.next_token();
        if matches!(self.token(), SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
            self.next_token();
        }
        if self.is_token(SyntaxKind::ReadonlyKeyword) {
            self.next_token();
        }
        if !self.is_token(SyntaxKind::OpenBracketToken) {
            return false;
        }
        self.next_token();
        if !self.token().is_identifier_or_keyword() {
            return false;
        }
        self.next_token() == SyntaxKind::InKeyword
    }

    /// `typeof A.B` (or `typeof import("x")`, kept opaque).
    fn parse_type_query(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::TypeOfKeyword);
        if self.is_token(SyntaxKind::ImportKeyword) {
            self.parse_import_type();
            return self.finish_node(pos, ModifierFlags::empty(), NodeData::OpaqueType);
        }
        let name = self.parse_entity_name();
        if self.is_token(SyntaxKind::LessThanToken) && !self.has_preceding_line_break() {
            self.parse_type_arguments();
        }
        self.finish_node(pos, ModifierFlags::empty(), NodeData::TypeQuery(name))
    }

    /// `import("m").A.B<T>`, kept opaque.
    fn parse_import_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::ImportKeyword);
        if self.is_token(SyntaxKind::OpenParenToken) {
            self.skip_balanced();
        }
        while self.parse_optional(SyntaxKind::DotToken) {
            self.parse_identifier_name();
        }
        if self.is_token(SyntaxKind::LessThanToken) {
            self.parse_type_arguments();
        }
        self.finish_node(pos, ModifierFlags::empty(), NodeData::OpaqueType)
    }

    /// `[A, b?: B, ...rest: C[]]`
    fn parse_tuple_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let mut elements = Vec::new();
        while !matches!(
            self.token(),
            SyntaxKind::CloseBracketToken | SyntaxKind::EndOfFileToken
        ) {
            let member_pos = self.token_pos();
            let rest = self.parse_optional(SyntaxKind::DotDotDotToken);
            let is_named = self.token().is_identifier_or_keyword()
                && self.look_ahead(|p| {
                    p.next_token();
                    if p.is_token(SyntaxKind::QuestionToken) {
                        p.next_token();
                    }
                    p.is_token(SyntaxKind::ColonToken)
                });
            let (name, mut optional) = if is_named {
                let name = self.parse_identifier_name();
                let optional = self.parse_optional(SyntaxKind::QuestionToken);
                self.parse_expected(SyntaxKind::ColonToken);
                (Some(name), optional)
            } else {
                (None, false)
            };
            let type_node = self.parse_type();
            if self.parse_optional(SyntaxKind::QuestionToken) {
                optional = true;
            }
            elements.push(self.finish_node(
                member_pos,
                ModifierFlags::empty(),
                NodeData::TupleMember(TupleMemberData {
                    name,
                    optional,
                    rest,
                    type_node,
                }),
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) || self.token_pos() == member_pos {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.finish_node(pos, ModifierFlags::empty(), NodeData::TupleType(elements))
    }
}

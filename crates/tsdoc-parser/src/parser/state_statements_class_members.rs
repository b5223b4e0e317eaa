//! Parser state - interface, type literal and class member parsing, plus
//! the signature pieces (parameters, type parameters) they share.

use super::base::NodeIndex;
use super::node::{
    IndexSignatureData, MethodData, ModifierFlags, NodeData, ParameterData, PropertyData,
    SignatureData, TypeParameterData,
};
use super::state::ParserState;
use tsdoc_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Property Names
    // =========================================================================

    /// Identifier, keyword, string/numeric literal, private name, or a
    /// computed name (`[Symbol.iterator]`, kept as written).
    pub(crate) fn parse_property_name(&mut self) -> String {
        match self.token() {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral => {
                let text = self.token_value();
                self.next_token();
                text
            }
            SyntaxKind::OpenBracketToken => {
                let start = self.token_pos();
                self.skip_balanced();
                self.text_from(start)
            }
            _ => self.parse_identifier_name(),
        }
    }

    fn is_property_name_start(kind: SyntaxKind) -> bool {
        kind.is_identifier_or_keyword()
            || matches!(
                kind,
                SyntaxKind::StringLiteral
                    | SyntaxKind::NumericLiteral
                    | SyntaxKind::BigIntLiteral
                    | SyntaxKind::OpenBracketToken
                    | SyntaxKind::PrivateIdentifier
            )
    }

    /// The current keyword acts as a modifier: a member name follows on the
    /// same line.
    fn next_token_can_follow_modifier(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            !p.has_preceding_line_break()
                && (Self::is_property_name_start(p.token())
                    || matches!(
                        p.token(),
                        SyntaxKind::AsteriskToken | SyntaxKind::OpenBraceToken
                    ))
        })
    }

    /// The current `[` starts an index signature (`[key: string]: T`).
    fn is_index_signature(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if p.is_token(SyntaxKind::DotDotDotToken) {
                return true;
            }
            if !p.token().is_identifier_or_keyword() {
                return false;
            }
            p.next_token();
            matches!(p.token(), SyntaxKind::ColonToken | SyntaxKind::CommaToken)
        })
    }

    fn parse_index_signature(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let parameter = self.parse_parameter();
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let type_node = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        self.finish_node(
            pos,
            modifiers,
            NodeData::IndexSignature(IndexSignatureData {
                parameter,
                type_node,
            }),
        )
    }

    // =========================================================================
    // Interface and Type Literal Members
    // =========================================================================

    /// `{ member; member, ... }` of an interface or type literal.
    pub(crate) fn parse_object_type_members(&mut self) -> Vec<NodeIndex> {
        let mut members = Vec::new();
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return members;
        }
        while !matches!(
            self.token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            let start = self.token_pos();
            let member = self.parse_type_member();
            if member.is_some() {
                members.push(member);
            }
            if !self.parse_optional(SyntaxKind::SemicolonToken) {
                self.parse_optional(SyntaxKind::CommaToken);
            }
            if self.token_pos() == start {
                self.parse_error_at_current_token("Property or signature expected");
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        members
    }

    fn parse_type_member(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken => {
                let signature = self.parse_signature(SyntaxKind::ColonToken);
                return self.finish_node(pos, ModifierFlags::empty(), NodeData::CallSignature(signature));
            }
            SyntaxKind::NewKeyword
                if self.look_ahead(|p| {
                    matches!(
                        p.next_token(),
                        SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
                    )
                }) =>
            {
                self.next_token();
                let signature = self.parse_signature(SyntaxKind::ColonToken);
                return self.finish_node(
                    pos,
                    ModifierFlags::empty(),
                    NodeData::ConstructSignature(signature),
                );
            }
            _ => {}
        }

        let mut modifiers = ModifierFlags::empty();
        while self.is_token(SyntaxKind::ReadonlyKeyword) && self.next_token_can_follow_modifier() {
            modifiers |= ModifierFlags::READONLY;
            self.next_token();
        }

        if self.is_token(SyntaxKind::OpenBracketToken) && self.is_index_signature() {
            return self.parse_index_signature(pos, modifiers);
        }

        if let Some(accessor) = self.try_parse_accessor(pos, modifiers) {
            return accessor;
        }

        let name = self.parse_property_name();
        let optional = self.parse_optional(SyntaxKind::QuestionToken);
        if matches!(
            self.token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            let signature = self.parse_signature(SyntaxKind::ColonToken);
            return self.finish_node(
                pos,
                modifiers,
                NodeData::MethodSignature(MethodData {
                    name,
                    optional,
                    signature,
                }),
            );
        }
        let type_node = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        self.finish_node(
            pos,
            modifiers,
            NodeData::PropertySignature(PropertyData {
                name,
                optional,
                type_node,
                initializer: NodeIndex::NONE,
            }),
        )
    }

    /// `get name(): T` / `set name(v: T)`; `None` when `get`/`set` is itself
    /// the member name.
    fn try_parse_accessor(&mut self, pos: u32, modifiers: ModifierFlags) -> Option<NodeIndex> {
        let is_getter = match self.token() {
            SyntaxKind::GetKeyword => true,
            SyntaxKind::SetKeyword => false,
            _ => return None,
        };
        if !self.look_ahead(|p| {
            p.next_token();
            !p.has_preceding_line_break() && Self::is_property_name_start(p.token())
        }) {
            return None;
        }
        self.next_token();
        let name = self.parse_property_name();
        let optional = self.parse_optional(SyntaxKind::QuestionToken);
        let signature = self.parse_signature(SyntaxKind::ColonToken);
        if self.is_token(SyntaxKind::OpenBraceToken) {
            self.skip_balanced();
        }
        let data = MethodData {
            name,
            optional,
            signature,
        };
        let data = if is_getter {
            NodeData::GetAccessor(data)
        } else {
            NodeData::SetAccessor(data)
        };
        Some(self.finish_node(pos, modifiers, data))
    }

    // =========================================================================
    // Class Members
    // =========================================================================

    /// `{ ... }` of a class declaration or expression.
    pub(crate) fn parse_class_members(&mut self) -> Vec<NodeIndex> {
        let mut members = Vec::new();
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return members;
        }
        while !matches!(
            self.token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            let start = self.token_pos();
            let member = self.parse_class_member();
            if member.is_some() {
                members.push(member);
            }
            if self.token_pos() == start {
                self.parse_error_at_current_token("Unexpected token. A constructor, method, accessor, or property was expected");
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        members
    }

    fn parse_class_member(&mut self) -> NodeIndex {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return NodeIndex::NONE;
        }
        let pos = self.token_pos();
        self.skip_decorators();

        let mut modifiers = ModifierFlags::empty();
        loop {
            let Some(flag) = ModifierFlags::from_keyword(self.token()) else {
                break;
            };
            if flag.intersects(ModifierFlags::EXPORT | ModifierFlags::DEFAULT | ModifierFlags::CONST)
                || !self.next_token_can_follow_modifier()
            {
                break;
            }
            modifiers |= flag;
            self.next_token();
        }

        // static { ... }
        if modifiers.contains(ModifierFlags::STATIC) && self.is_token(SyntaxKind::OpenBraceToken) {
            self.skip_balanced();
            return NodeIndex::NONE;
        }

        if self.is_token(SyntaxKind::ConstructorKeyword)
            && self.look_ahead(|p| {
                matches!(
                    p.next_token(),
                    SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
                )
            })
        {
            self.next_token();
            let signature = self.parse_signature(SyntaxKind::ColonToken);
            self.parse_function_body();
            return self.finish_node(pos, modifiers, NodeData::Constructor(signature));
        }

        if self.is_token(SyntaxKind::OpenBracketToken) && self.is_index_signature() {
            let node = self.parse_index_signature(pos, modifiers);
            self.parse_semicolon();
            return node;
        }

        if let Some(accessor) = self.try_parse_accessor(pos, modifiers) {
            return accessor;
        }

        self.parse_optional(SyntaxKind::AsteriskToken);
        let name = self.parse_property_name();
        let optional = self.parse_optional(SyntaxKind::QuestionToken);
        self.parse_optional(SyntaxKind::ExclamationToken);

        if matches!(
            self.token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            let signature = self.parse_signature(SyntaxKind::ColonToken);
            self.parse_function_body();
            return self.finish_node(
                pos,
                modifiers,
                NodeData::MethodDeclaration(MethodData {
                    name,
                    optional,
                    signature,
                }),
            );
        }

        let type_node = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_initializer()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        self.finish_node(
            pos,
            modifiers,
            NodeData::PropertyDeclaration(PropertyData {
                name,
                optional,
                type_node,
                initializer,
            }),
        )
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    /// `<T>(params) <return_token> ReturnType`. The return type is optional
    /// when `return_token` is `:`.
    pub(crate) fn parse_signature(&mut self, return_token: SyntaxKind) -> SignatureData {
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        let return_type = if return_token == SyntaxKind::EqualsGreaterThanToken {
            if self.parse_expected(SyntaxKind::EqualsGreaterThanToken) {
                self.parse_return_type()
            } else {
                NodeIndex::NONE
            }
        } else if self.parse_optional(return_token) {
            self.parse_return_type()
        } else {
            NodeIndex::NONE
        };
        SignatureData {
            type_parameters,
            parameters,
            return_type,
        }
    }

    pub(crate) fn parse_parameter_list(&mut self) -> Vec<NodeIndex> {
        let mut parameters = Vec::new();
        if !self.parse_expected(SyntaxKind::OpenParenToken) {
            return parameters;
        }
        while !matches!(
            self.token(),
            SyntaxKind::CloseParenToken | SyntaxKind::EndOfFileToken
        ) {
            let start = self.token_pos();
            parameters.push(self.parse_parameter());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
            if self.token_pos() == start {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        parameters
    }

    pub(crate) fn parse_parameter(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.skip_decorators();
        let mut modifiers = ModifierFlags::empty();
        loop {
            let Some(flag) = ModifierFlags::from_keyword(self.token()) else {
                break;
            };
            if !ModifierFlags::PARAMETER_PROPERTY.contains(flag)
                || !self.next_token_can_follow_modifier()
            {
                break;
            }
            modifiers |= flag;
            self.next_token();
        }

        let rest = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = if matches!(
            self.token(),
            SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken
        ) {
            let start = self.token_pos();
            self.skip_balanced();
            self.text_from(start)
        } else {
            self.parse_identifier_name()
        };
        let optional = self.parse_optional(SyntaxKind::QuestionToken);
        let type_node = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_initializer()
        } else {
            NodeIndex::NONE
        };
        self.finish_node(
            pos,
            modifiers,
            NodeData::Parameter(ParameterData {
                name,
                optional,
                rest,
                type_node,
                initializer,
            }),
        )
    }

    /// `<T extends C = D, ...>`; empty when the current token is not `<`.
    pub(crate) fn parse_type_parameters(&mut self) -> Vec<NodeIndex> {
        let mut type_parameters = Vec::new();
        if !self.parse_optional(SyntaxKind::LessThanToken) {
            return type_parameters;
        }
        while !matches!(
            self.token(),
            SyntaxKind::GreaterThanToken | SyntaxKind::EndOfFileToken
        ) {
            let pos = self.token_pos();
            // `const T`, `in T`, `out T`
            while matches!(
                self.token(),
                SyntaxKind::ConstKeyword | SyntaxKind::InKeyword | SyntaxKind::OutKeyword
            ) && self.next_is_identifier_or_keyword_on_same_line()
            {
                self.next_token();
            }
            let name = self.parse_identifier_name();
            let constraint = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            let default = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            type_parameters.push(self.finish_node(
                pos,
                ModifierFlags::empty(),
                NodeData::TypeParameter(TypeParameterData {
                    name,
                    constraint,
                    default,
                }),
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken);
        type_parameters
    }
}

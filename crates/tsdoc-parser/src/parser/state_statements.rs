//! Parser state - statement and declaration parsing methods

use super::base::NodeIndex;
use super::node::{
    ClassData, EnumData, EnumMemberData, ExportAssignmentData, ExportDeclData,
    ExportSpecifierData, FunctionData, ImportDeclData, ImportEqualsData, ImportSpecifierData,
    InterfaceData, ModifierFlags, ModuleData, ModuleReference, NodeData, SourceFileData,
    TypeAliasData, VariableDeclarationData, VariableKind, VariableStatementData,
};
use super::state::ParserState;
use tsdoc_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Source File and Statement Lists
    // =========================================================================

    /// Parse a source file and return its root node.
    pub fn parse_source_file(&mut self) -> NodeIndex {
        self.next_token();
        let statements = self.parse_statement_list(false);
        let end = self.source_text().len() as u32;
        let root = self.arena.add(
            0,
            end,
            ModifierFlags::empty(),
            NodeData::SourceFile(SourceFileData { statements }),
        );
        self.arena.set_parents(root);
        tracing::trace!(
            file = %self.file_name,
            nodes = self.arena.len(),
            diagnostics = self.parse_diagnostics.len(),
            "parsed source file"
        );
        root
    }

    /// Parse statements until end of file, or until the closing `}` of a
    /// block when `in_block` is set.
    pub(crate) fn parse_statement_list(&mut self, in_block: bool) -> Vec<NodeIndex> {
        let mut statements = Vec::new();
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken => break,
                SyntaxKind::CloseBraceToken if in_block => break,
                SyntaxKind::CloseBraceToken => {
                    self.parse_error_at_current_token("Declaration or statement expected");
                    self.next_token();
                    continue;
                }
                _ => {}
            }
            let start = self.token_pos();
            let statement = self.parse_statement();
            if statement.is_some() {
                statements.push(statement);
            }
            if self.token_pos() == start && !self.is_token(SyntaxKind::EndOfFileToken) {
                // No progress; drop the offending token.
                self.parse_error_at_current_token("Declaration or statement expected");
                self.next_token();
            }
        }
        statements
    }

    /// Parse one statement. Statements that declare nothing are skipped and
    /// yield `NodeIndex::NONE`.
    pub(crate) fn parse_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::SemicolonToken => {
                self.next_token();
                return NodeIndex::NONE;
            }
            SyntaxKind::ExportKeyword => {
                if let Some(node) = self.parse_export_statement(pos) {
                    return node;
                }
            }
            SyntaxKind::ImportKeyword => {
                if self.look_ahead(|p| {
                    matches!(
                        p.next_token(),
                        SyntaxKind::OpenParenToken | SyntaxKind::DotToken
                    )
                }) {
                    // `import("x")` / `import.meta` expression statement
                    self.skip_statement();
                    return NodeIndex::NONE;
                }
                self.next_token();
                return self.parse_import_declaration(pos, ModifierFlags::empty());
            }
            SyntaxKind::AtToken => self.skip_decorators(),
            _ => {}
        }

        let modifiers = self.parse_declaration_modifiers();
        self.parse_declaration(pos, modifiers)
    }

    /// Parse the declaration following any modifiers already consumed.
    fn parse_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        match self.token() {
            SyntaxKind::InterfaceKeyword if self.next_is_identifier_or_keyword_on_same_line() => {
                self.parse_interface_declaration(pos, modifiers)
            }
            SyntaxKind::ClassKeyword => self.parse_class_declaration(pos, modifiers),
            SyntaxKind::TypeKeyword if self.next_is_identifier_or_keyword_on_same_line() => {
                self.parse_type_alias_declaration(pos, modifiers)
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(pos, modifiers),
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => {
                self.parse_variable_statement(pos, modifiers)
            }
            SyntaxKind::LetKeyword | SyntaxKind::UsingKeyword
                if self.look_ahead(|p| {
                    p.next_token();
                    p.token().is_identifier_or_keyword()
                        || matches!(
                            p.token(),
                            SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken
                        )
                }) =>
            {
                self.parse_variable_statement(pos, modifiers)
            }
            SyntaxKind::EnumKeyword => self.parse_enum_declaration(pos, modifiers),
            SyntaxKind::NamespaceKeyword | SyntaxKind::ModuleKeyword
                if self.look_ahead(|p| {
                    p.next_token();
                    !p.has_preceding_line_break()
                        && (p.token().is_identifier_or_keyword()
                            || p.is_token(SyntaxKind::StringLiteral))
                }) =>
            {
                self.parse_module_declaration(pos, modifiers)
            }
            SyntaxKind::GlobalKeyword
                if modifiers.contains(ModifierFlags::DECLARE)
                    || self.next_token_is(SyntaxKind::OpenBraceToken) =>
            {
                self.parse_global_declaration(pos, modifiers)
            }
            SyntaxKind::ImportKeyword if modifiers.contains(ModifierFlags::EXPORT) => {
                // `export import a = b.c;`
                self.next_token();
                self.parse_import_declaration(pos, modifiers)
            }
            _ => {
                if !modifiers.is_empty() {
                    self.parse_error_at_current_token("Declaration expected");
                }
                self.skip_statement();
                NodeIndex::NONE
            }
        }
    }

    /// Declaration modifiers: `export`, `default`, `declare`, `abstract`,
    /// `async` and the `const` of `const enum`.
    pub(crate) fn parse_declaration_modifiers(&mut self) -> ModifierFlags {
        let mut flags = ModifierFlags::empty();
        loop {
            let flag = match self.token() {
                SyntaxKind::ExportKeyword => ModifierFlags::EXPORT,
                SyntaxKind::DefaultKeyword if flags.contains(ModifierFlags::EXPORT) => {
                    ModifierFlags::DEFAULT
                }
                SyntaxKind::DeclareKeyword | SyntaxKind::AbstractKeyword | SyntaxKind::AsyncKeyword
                    if self.next_is_identifier_or_keyword_on_same_line() =>
                {
                    ModifierFlags::from_keyword(self.token()).unwrap_or_default()
                }
                SyntaxKind::ConstKeyword if self.next_token_is(SyntaxKind::EnumKeyword) => {
                    ModifierFlags::CONST
                }
                _ => break,
            };
            flags |= flag;
            self.next_token();
        }
        flags
    }

    pub(crate) fn skip_decorators(&mut self) {
        while self.parse_optional(SyntaxKind::AtToken) {
            self.parse_entity_name();
            if self.is_token(SyntaxKind::OpenParenToken) {
                self.skip_balanced();
            }
        }
    }

    // =========================================================================
    // Export Forms
    // =========================================================================

    /// Export statements that are not a modifier on a declaration. Returns
    /// `None` (without consuming) when `export` is such a modifier.
    fn parse_export_statement(&mut self, pos: u32) -> Option<NodeIndex> {
        let next = self.look_ahead(|p| {
            let next = p.next_token();
            let after = p.next_token();
            (next, after)
        });
        match next {
            (SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken, _) => {
                self.next_token();
                Some(self.parse_export_declaration(pos, false))
            }
            (SyntaxKind::TypeKeyword, SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken) => {
                self.next_token();
                self.next_token();
                Some(self.parse_export_declaration(pos, true))
            }
            (SyntaxKind::EqualsToken, _) => {
                self.next_token();
                self.next_token();
                let expression = self.parse_initializer();
                self.parse_semicolon();
                Some(self.finish_node(
                    pos,
                    ModifierFlags::EXPORT,
                    NodeData::ExportAssignment(ExportAssignmentData {
                        is_export_equals: true,
                        expression,
                    }),
                ))
            }
            (SyntaxKind::AsKeyword, SyntaxKind::NamespaceKeyword) => {
                self.next_token();
                self.next_token();
                self.next_token();
                let name = self.parse_identifier_name();
                self.parse_semicolon();
                Some(self.finish_node(pos, ModifierFlags::EXPORT, NodeData::NamespaceExport(name)))
            }
            (SyntaxKind::DefaultKeyword, _) => {
                let is_declaration = self.look_ahead(|p| {
                    p.next_token();
                    p.next_token();
                    match p.token() {
                        SyntaxKind::FunctionKeyword
                        | SyntaxKind::ClassKeyword
                        | SyntaxKind::InterfaceKeyword
                        | SyntaxKind::EnumKeyword => true,
                        SyntaxKind::AbstractKeyword | SyntaxKind::AsyncKeyword => {
                            p.next_is_identifier_or_keyword_on_same_line()
                        }
                        _ => false,
                    }
                });
                if is_declaration {
                    return None;
                }
                self.next_token();
                self.next_token();
                let expression = self.parse_initializer();
                self.parse_semicolon();
                Some(self.finish_node(
                    pos,
                    ModifierFlags::EXPORT | ModifierFlags::DEFAULT,
                    NodeData::ExportAssignment(ExportAssignmentData {
                        is_export_equals: false,
                        expression,
                    }),
                ))
            }
            _ => None,
        }
    }

    /// `export { a, b as c } from "m"`, `export * from "m"`,
    /// `export * as ns from "m"`. The current token is `{` or `*`.
    fn parse_export_declaration(&mut self, pos: u32, is_type_only: bool) -> NodeIndex {
        let mut specifiers = None;
        let mut namespace_export = None;
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            if self.parse_optional(SyntaxKind::AsKeyword) {
                namespace_export = Some(self.parse_module_export_name());
            }
        } else {
            specifiers = Some(self.parse_export_specifiers());
        }
        let module_specifier = if self.parse_optional(SyntaxKind::FromKeyword) {
            Some(self.parse_module_specifier())
        } else {
            None
        };
        self.skip_import_attributes();
        self.parse_semicolon();
        self.finish_node(
            pos,
            ModifierFlags::EXPORT,
            NodeData::ExportDeclaration(ExportDeclData {
                module_specifier,
                is_type_only,
                specifiers,
                namespace_export,
            }),
        )
    }

    fn parse_export_specifiers(&mut self) -> Vec<NodeIndex> {
        let mut specifiers = Vec::new();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        while !matches!(
            self.token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            let pos = self.token_pos();
            let is_type_only = self.parse_specifier_type_modifier();
            let first = self.parse_module_export_name();
            let (name, property_name) = if self.parse_optional(SyntaxKind::AsKeyword) {
                (self.parse_module_export_name(), Some(first))
            } else {
                (first, None)
            };
            specifiers.push(self.finish_node(
                pos,
                ModifierFlags::empty(),
                NodeData::ExportSpecifier(ExportSpecifierData {
                    name,
                    property_name,
                    is_type_only,
                }),
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        specifiers
    }

    /// `type` before an import/export specifier name.
    fn parse_specifier_type_modifier(&mut self) -> bool {
        if self.is_token(SyntaxKind::TypeKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                p.token().is_identifier_or_keyword() || p.is_token(SyntaxKind::StringLiteral)
            })
        {
            self.next_token();
            return true;
        }
        false
    }

    /// Identifier, keyword or string literal naming an import/export.
    fn parse_module_export_name(&mut self) -> String {
        if self.is_token(SyntaxKind::StringLiteral) {
            let text = self.token_value();
            self.next_token();
            return text;
        }
        self.parse_identifier_name()
    }

    fn parse_module_specifier(&mut self) -> String {
        if self.is_token(SyntaxKind::StringLiteral) {
            let text = self.token_value();
            self.next_token();
            text
        } else {
            self.parse_error_at_current_token("String literal expected");
            String::new()
        }
    }

    /// `with { type: "json" }` / `assert { ... }` after a module specifier.
    fn skip_import_attributes(&mut self) {
        let is_attributes = (self.is_token(SyntaxKind::WithKeyword)
            || (self.is_token(SyntaxKind::Identifier) && self.token_value() == "assert"))
            && !self.has_preceding_line_break()
            && self.next_token_is(SyntaxKind::OpenBraceToken);
        if is_attributes {
            self.next_token();
            self.skip_balanced();
        }
    }

    // =========================================================================
    // Imports
    // =========================================================================

    /// Everything after the `import` keyword.
    fn parse_import_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        // import "side-effect";
        if self.is_token(SyntaxKind::StringLiteral) {
            let module_specifier = self.parse_module_specifier();
            self.skip_import_attributes();
            self.parse_semicolon();
            return self.finish_node(
                pos,
                modifiers,
                NodeData::Import(ImportDeclData {
                    module_specifier,
                    is_type_only: false,
                    bindings: Vec::new(),
                }),
            );
        }

        let is_type_only = self.is_token(SyntaxKind::TypeKeyword)
            && self.look_ahead(|p| {
                p.next_token();
                match p.token() {
                    SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken => true,
                    SyntaxKind::FromKeyword => p.next_token_is(SyntaxKind::FromKeyword),
                    kind => kind.is_identifier_or_keyword(),
                }
            });
        if is_type_only {
            self.next_token();
        }

        if self.token().is_identifier_or_keyword() && self.next_token_is(SyntaxKind::EqualsToken)
        {
            return self.parse_import_equals_declaration(pos, modifiers);
        }

        let mut bindings = Vec::new();
        let has_default_binding = if self.is_token(SyntaxKind::FromKeyword) {
            // `import from from "m"` binds a default import named `from`
            self.next_token_is(SyntaxKind::FromKeyword)
        } else {
            self.token().is_identifier_or_keyword()
        };
        if has_default_binding {
            let binding_pos = self.token_pos();
            let name = self.parse_identifier_name();
            bindings.push(self.finish_node(
                binding_pos,
                ModifierFlags::empty(),
                NodeData::ImportSpecifier(ImportSpecifierData {
                    name,
                    property_name: Some("default".to_string()),
                    is_type_only,
                }),
            ));
            self.parse_optional(SyntaxKind::CommaToken);
        }

        if self.is_token(SyntaxKind::AsteriskToken) {
            let binding_pos = self.token_pos();
            self.next_token();
            self.parse_expected(SyntaxKind::AsKeyword);
            let name = self.parse_identifier_name();
            bindings.push(self.finish_node(
                binding_pos,
                ModifierFlags::empty(),
                NodeData::NamespaceImport(name),
            ));
        } else if self.is_token(SyntaxKind::OpenBraceToken) {
            self.next_token();
            while !matches!(
                self.token(),
                SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
            ) {
                let binding_pos = self.token_pos();
                let specifier_type_only = self.parse_specifier_type_modifier() || is_type_only;
                let first = self.parse_module_export_name();
                let (name, property_name) = if self.parse_optional(SyntaxKind::AsKeyword) {
                    (self.parse_identifier_name(), Some(first))
                } else {
                    (first, None)
                };
                bindings.push(self.finish_node(
                    binding_pos,
                    ModifierFlags::empty(),
                    NodeData::ImportSpecifier(ImportSpecifierData {
                        name,
                        property_name,
                        is_type_only: specifier_type_only,
                    }),
                ));
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.parse_expected(SyntaxKind::CloseBraceToken);
        }

        self.parse_expected(SyntaxKind::FromKeyword);
        let module_specifier = self.parse_module_specifier();
        self.skip_import_attributes();
        self.parse_semicolon();
        self.finish_node(
            pos,
            modifiers,
            NodeData::Import(ImportDeclData {
                module_specifier,
                is_type_only,
                bindings,
            }),
        )
    }

    /// `import x = require("m")` / `import x = A.B`
    fn parse_import_equals_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        let name = self.parse_identifier_name();
        self.parse_expected(SyntaxKind::EqualsToken);
        let module_reference = if self.is_token(SyntaxKind::RequireKeyword)
            && self.next_token_is(SyntaxKind::OpenParenToken)
        {
            self.next_token();
            self.next_token();
            let specifier = self.parse_module_specifier();
            self.parse_expected(SyntaxKind::CloseParenToken);
            ModuleReference::External(specifier)
        } else {
            ModuleReference::Entity(self.parse_entity_name())
        };
        self.parse_semicolon();
        self.finish_node(
            pos,
            modifiers,
            NodeData::ImportEquals(ImportEqualsData {
                name,
                module_reference,
            }),
        )
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_interface_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        self.parse_expected(SyntaxKind::InterfaceKeyword);
        let name = self.parse_identifier_name();
        let type_parameters = self.parse_type_parameters();
        let mut heritage = Vec::new();
        while matches!(
            self.token(),
            SyntaxKind::ExtendsKeyword | SyntaxKind::ImplementsKeyword
        ) {
            self.next_token();
            loop {
                heritage.push(self.parse_type_reference());
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }
        let members = self.parse_object_type_members();
        self.finish_node(
            pos,
            modifiers,
            NodeData::Interface(InterfaceData {
                name,
                type_parameters,
                heritage,
                members,
            }),
        )
    }

    fn parse_class_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        let data = self.parse_class_like();
        self.finish_node(pos, modifiers, NodeData::Class(data))
    }

    /// `class Name<T> extends Base implements I { ... }`; the current token
    /// is `class`.
    pub(crate) fn parse_class_like(&mut self) -> ClassData {
        self.parse_expected(SyntaxKind::ClassKeyword);
        let name = if self.is_identifier() && !self.is_token(SyntaxKind::ImplementsKeyword) {
            Some(self.parse_identifier_name())
        } else {
            None
        };
        let type_parameters = self.parse_type_parameters();
        let mut extends = NodeIndex::NONE;
        let mut implements = Vec::new();
        loop {
            if self.parse_optional(SyntaxKind::ExtendsKeyword) {
                extends = self.parse_class_heritage_expression();
            } else if self.parse_optional(SyntaxKind::ImplementsKeyword) {
                loop {
                    implements.push(self.parse_type_reference());
                    if !self.parse_optional(SyntaxKind::CommaToken) {
                        break;
                    }
                }
            } else {
                break;
            }
        }
        let members = self.parse_class_members();
        ClassData {
            name,
            type_parameters,
            extends,
            implements,
            members,
        }
    }

    /// The `extends` target of a class: a type reference, or an arbitrary
    /// expression (mixin call) kept opaque.
    fn parse_class_heritage_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        if !self.token().is_identifier_or_keyword() {
            while !matches!(
                self.token(),
                SyntaxKind::OpenBraceToken
                    | SyntaxKind::ImplementsKeyword
                    | SyntaxKind::EndOfFileToken
            ) {
                if self.is_token(SyntaxKind::OpenParenToken) {
                    self.skip_balanced();
                } else {
                    self.next_token();
                }
            }
            return self.finish_node(pos, ModifierFlags::empty(), NodeData::OpaqueType);
        }
        let reference = self.parse_type_reference();
        if !self.is_token(SyntaxKind::OpenParenToken) {
            return reference;
        }
        while matches!(
            self.token(),
            SyntaxKind::OpenParenToken | SyntaxKind::DotToken
        ) || self.token().is_identifier_or_keyword()
            && self.prev_token == SyntaxKind::DotToken
        {
            if self.is_token(SyntaxKind::OpenParenToken) {
                self.skip_balanced();
            } else {
                self.next_token();
            }
        }
        self.finish_node(pos, ModifierFlags::empty(), NodeData::OpaqueType)
    }

    fn parse_type_alias_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        self.parse_expected(SyntaxKind::TypeKeyword);
        let name = self.parse_identifier_name();
        let type_parameters = self.parse_type_parameters();
        self.parse_expected(SyntaxKind::EqualsToken);
        let type_node = self.parse_type();
        self.parse_semicolon();
        self.finish_node(
            pos,
            modifiers,
            NodeData::TypeAlias(TypeAliasData {
                name,
                type_parameters,
                type_node,
            }),
        )
    }

    fn parse_function_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        self.parse_optional(SyntaxKind::AsteriskToken);
        let name = if self.token().is_identifier_or_keyword() {
            Some(self.parse_identifier_name())
        } else {
            None
        };
        let signature = self.parse_signature(SyntaxKind::ColonToken);
        let has_body = self.parse_function_body();
        self.finish_node(
            pos,
            modifiers,
            NodeData::Function(FunctionData {
                name,
                signature,
                has_body,
            }),
        )
    }

    /// Skip a `{ ... }` body if present; otherwise consume the terminating
    /// semicolon of an overload or ambient declaration.
    pub(crate) fn parse_function_body(&mut self) -> bool {
        if self.is_token(SyntaxKind::OpenBraceToken) {
            self.skip_balanced();
            true
        } else {
            self.parse_semicolon();
            false
        }
    }

    fn parse_variable_statement(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        let kind = match self.token() {
            SyntaxKind::LetKeyword => VariableKind::Let,
            SyntaxKind::ConstKeyword => VariableKind::Const,
            SyntaxKind::UsingKeyword => VariableKind::Using,
            _ => VariableKind::Var,
        };
        self.next_token();
        let mut declaration_modifiers = modifiers;
        if kind == VariableKind::Const {
            declaration_modifiers |= ModifierFlags::CONST;
        }

        let mut declarations = Vec::new();
        loop {
            let decl_pos = self.token_pos();
            let is_binding_pattern = matches!(
                self.token(),
                SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken
            );
            let name = if is_binding_pattern {
                let start = self.token_pos();
                self.skip_balanced();
                self.text_from(start)
            } else {
                self.parse_identifier_name()
            };
            self.parse_optional(SyntaxKind::ExclamationToken);
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
            declarations.push(self.finish_node(
                decl_pos,
                declaration_modifiers,
                NodeData::VariableDeclaration(VariableDeclarationData {
                    name,
                    is_binding_pattern,
                    type_node,
                    initializer,
                }),
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_semicolon();
        self.finish_node(
            pos,
            modifiers,
            NodeData::VariableStatement(VariableStatementData { kind, declarations }),
        )
    }

    fn parse_enum_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        self.parse_expected(SyntaxKind::EnumKeyword);
        let name = self.parse_identifier_name();
        let mut members = Vec::new();
        if self.parse_expected(SyntaxKind::OpenBraceToken) {
            while !matches!(
                self.token(),
                SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
            ) {
                let member_pos = self.token_pos();
                let member_name = self.parse_property_name();
                let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                    self.parse_initializer()
                } else {
                    NodeIndex::NONE
                };
                members.push(self.finish_node(
                    member_pos,
                    ModifierFlags::empty(),
                    NodeData::EnumMember(EnumMemberData {
                        name: member_name,
                        initializer,
                    }),
                ));
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.parse_expected(SyntaxKind::CloseBraceToken);
        }
        self.finish_node(
            pos,
            modifiers,
            NodeData::Enum(EnumData { name, members }),
        )
    }

    /// `namespace A.B { }`, `module "x" { }`, `declare module "x";`
    fn parse_module_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        self.next_token();
        if self.is_token(SyntaxKind::StringLiteral) {
            let name = self.token_value();
            self.next_token();
            let body = if self.is_token(SyntaxKind::OpenBraceToken) {
                Some(self.parse_module_block())
            } else {
                self.parse_semicolon();
                None
            };
            return self.finish_node(
                pos,
                modifiers,
                NodeData::Module(ModuleData {
                    name,
                    is_string_name: true,
                    is_global: false,
                    body,
                }),
            );
        }
        self.parse_namespace_body(pos, modifiers)
    }

    /// A (possibly dotted) namespace name and its block. `A.B.C { }` nests
    /// one exported module declaration per segment.
    fn parse_namespace_body(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        let name = self.parse_identifier_name();
        let body = if self.parse_optional(SyntaxKind::DotToken) {
            let inner_pos = self.token_pos();
            let inner_modifiers =
                ModifierFlags::EXPORT | (modifiers & ModifierFlags::DECLARE);
            vec![self.parse_namespace_body(inner_pos, inner_modifiers)]
        } else {
            self.parse_module_block()
        };
        self.finish_node(
            pos,
            modifiers,
            NodeData::Module(ModuleData {
                name,
                is_string_name: false,
                is_global: false,
                body: Some(body),
            }),
        )
    }

    fn parse_global_declaration(&mut self, pos: u32, modifiers: ModifierFlags) -> NodeIndex {
        self.parse_expected(SyntaxKind::GlobalKeyword);
        let body = self.parse_module_block();
        self.finish_node(
            pos,
            modifiers,
            NodeData::Module(ModuleData {
                name: "global".to_string(),
                is_string_name: false,
                is_global: true,
                body: Some(body),
            }),
        )
    }

    fn parse_module_block(&mut self) -> Vec<NodeIndex> {
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return Vec::new();
        }
        let statements = self.parse_statement_list(true);
        self.parse_expected(SyntaxKind::CloseBraceToken);
        statements
    }
}

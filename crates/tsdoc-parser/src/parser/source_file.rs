//! Parsed source file: the arena together with the text and comments the
//! nodes point into.

use super::base::NodeIndex;
use super::node::{ModifierFlags, ModuleReference, Node, NodeData};
use super::node_arena::NodeArena;
use super::state::{ParseDiagnostic, ParserState};
use tsdoc_common::comments::{leading_jsdoc, reference_paths};
use tsdoc_common::{CommentRange, LineMap};

/// One parsed file.
#[derive(Debug)]
pub struct SourceFile {
    pub file_name: String,
    pub text: String,
    pub arena: NodeArena,
    pub root: NodeIndex,
    /// Every comment in the file, sorted by position
    pub comments: Vec<CommentRange>,
    pub line_map: LineMap,
    /// `.d.ts` / `.d.mts` / `.d.cts`
    pub is_declaration_file: bool,
    /// Has a top-level import or export, so its declarations are not global
    pub is_external_module: bool,
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// Parse `text` as the file `file_name`.
pub fn parse_file(file_name: impl Into<String>, text: String) -> SourceFile {
    let file_name = file_name.into();
    let mut parser = ParserState::new(file_name.clone(), text);
    let root = parser.parse_source_file();
    let (arena, text, comments, diagnostics) = parser.into_parts();
    let line_map = LineMap::build(&text);
    let is_declaration_file = is_declaration_file_name(&file_name);
    let mut file = SourceFile {
        file_name,
        text,
        arena,
        root,
        comments,
        line_map,
        is_declaration_file,
        is_external_module: false,
        diagnostics,
    };
    file.is_external_module = file.statements().iter().any(|&s| file.is_module_indicator(s));
    file
}

pub(crate) fn is_declaration_file_name(file_name: &str) -> bool {
    [".d.ts", ".d.mts", ".d.cts"]
        .iter()
        .any(|ext| file_name.ends_with(ext))
        || (file_name.contains(".d.") && file_name.ends_with(".ts"))
}

impl SourceFile {
    pub fn statements(&self) -> &[NodeIndex] {
        match self.arena.data(self.root) {
            Some(NodeData::SourceFile(data)) => &data.statements,
            _ => &[],
        }
    }

    #[inline]
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.arena.get(index)
    }

    #[inline]
    pub fn data(&self, index: NodeIndex) -> Option<&NodeData> {
        self.arena.data(index)
    }

    /// Source text covered by a node.
    pub fn node_text(&self, index: NodeIndex) -> &str {
        self.node(index)
            .and_then(|n| self.text.get(n.pos as usize..n.end as usize))
            .unwrap_or_default()
    }

    /// 1-based line of a node's first token.
    pub fn line_of(&self, index: NodeIndex) -> u32 {
        self.node(index)
            .map_or(1, |n| self.line_map.line_number(n.pos))
    }

    /// The JSDoc comment directly preceding a node.
    pub fn jsdoc_of(&self, index: NodeIndex) -> Option<&CommentRange> {
        let node = self.node(index)?;
        leading_jsdoc(&self.comments, node.pos, &self.text)
    }

    /// `/// <reference path="..." />` targets.
    pub fn referenced_paths(&self) -> Vec<String> {
        let header_end = self
            .statements()
            .first()
            .and_then(|&s| self.node(s))
            .map_or(self.text.len() as u32, |n| n.pos);
        let header: Vec<CommentRange> = self
            .comments
            .iter()
            .take_while(|c| c.end <= header_end)
            .cloned()
            .collect();
        reference_paths(&header, &self.text)
    }

    /// Module specifiers of imports and re-exports, in source order.
    pub fn module_specifiers(&self) -> Vec<&str> {
        let mut specifiers = Vec::new();
        for &statement in self.statements() {
            match self.data(statement) {
                Some(NodeData::Import(d)) => specifiers.push(d.module_specifier.as_str()),
                Some(NodeData::ExportDeclaration(d)) => {
                    if let Some(spec) = &d.module_specifier {
                        specifiers.push(spec.as_str());
                    }
                }
                Some(NodeData::ImportEquals(d)) => {
                    if let ModuleReference::External(spec) = &d.module_reference {
                        specifiers.push(spec.as_str());
                    }
                }
                _ => {}
            }
        }
        specifiers
    }

    fn is_module_indicator(&self, statement: NodeIndex) -> bool {
        let Some(node) = self.node(statement) else {
            return false;
        };
        match &node.data {
            NodeData::Import(_)
            | NodeData::ExportDeclaration(_)
            | NodeData::ExportAssignment(_) => true,
            NodeData::ImportEquals(d) => {
                matches!(d.module_reference, ModuleReference::External(_))
                    || node.modifiers.contains(ModifierFlags::EXPORT)
            }
            _ => node.modifiers.contains(ModifierFlags::EXPORT),
        }
    }
}

//! NodeArena storage and child traversal.

use super::base::NodeIndex;
use super::node::{ModifierFlags, Node, NodeData, SignatureData};

/// Flat storage for every node of one source file.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node and return its index. The parent link is filled in by
    /// [`NodeArena::set_parents`] once the tree is complete.
    pub fn add(&mut self, pos: u32, end: u32, modifiers: ModifierFlags, data: NodeData) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node {
            pos,
            end,
            parent: NodeIndex::NONE,
            modifiers,
            data,
        });
        index
    }

    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            return None;
        }
        self.nodes.get(index.0 as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            return None;
        }
        self.nodes.get_mut(index.0 as usize)
    }

    #[inline]
    pub fn data(&self, index: NodeIndex) -> Option<&NodeData> {
        self.get(index).map(|n| &n.data)
    }

    pub fn parent_of(&self, index: NodeIndex) -> NodeIndex {
        self.get(index).map_or(NodeIndex::NONE, |n| n.parent)
    }

    /// Drop nodes created after `len` (used to discard a failed speculative
    /// parse).
    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    /// Visit the direct children of a node in source order.
    pub fn for_each_child(&self, index: NodeIndex, mut f: impl FnMut(NodeIndex)) {
        let Some(node) = self.get(index) else {
            return;
        };
        let mut one = |child: NodeIndex| {
            if child.is_some() {
                f(child);
            }
        };
        match &node.data {
            NodeData::SourceFile(d) => d.statements.iter().copied().for_each(&mut one),
            NodeData::Interface(d) => {
                d.type_parameters.iter().copied().for_each(&mut one);
                d.heritage.iter().copied().for_each(&mut one);
                d.members.iter().copied().for_each(&mut one);
            }
            NodeData::Class(d) | NodeData::ClassExpression(d) => {
                d.type_parameters.iter().copied().for_each(&mut one);
                one(d.extends);
                d.implements.iter().copied().for_each(&mut one);
                d.members.iter().copied().for_each(&mut one);
            }
            NodeData::TypeAlias(d) => {
                d.type_parameters.iter().copied().for_each(&mut one);
                one(d.type_node);
            }
            NodeData::VariableStatement(d) => d.declarations.iter().copied().for_each(&mut one),
            NodeData::VariableDeclaration(d) => {
                one(d.type_node);
                one(d.initializer);
            }
            NodeData::Enum(d) => d.members.iter().copied().for_each(&mut one),
            NodeData::EnumMember(d) => one(d.initializer),
            NodeData::Module(d) => {
                if let Some(body) = &d.body {
                    body.iter().copied().for_each(&mut one);
                }
            }
            NodeData::Import(d) => d.bindings.iter().copied().for_each(&mut one),
            NodeData::ExportDeclaration(d) => {
                if let Some(specifiers) = &d.specifiers {
                    specifiers.iter().copied().for_each(&mut one);
                }
            }
            NodeData::ExportAssignment(d) => one(d.expression),
            NodeData::PropertySignature(d) | NodeData::PropertyDeclaration(d) => {
                one(d.type_node);
                one(d.initializer);
            }
            NodeData::IndexSignature(d) => {
                one(d.parameter);
                one(d.type_node);
            }
            NodeData::Parameter(d) => {
                one(d.type_node);
                one(d.initializer);
            }
            NodeData::TypeParameter(d) => {
                one(d.constraint);
                one(d.default);
            }
            NodeData::TypeReference(d) | NodeData::NewExpression(d) => {
                d.type_arguments.iter().copied().for_each(&mut one)
            }
            NodeData::ArrayType(inner) | NodeData::ParenthesizedType(inner) => one(*inner),
            NodeData::TupleType(list)
            | NodeData::UnionType(list)
            | NodeData::IntersectionType(list)
            | NodeData::TypeLiteral(list)
            | NodeData::ArrayLiteral(list) => list.iter().copied().for_each(&mut one),
            NodeData::TupleMember(d) => one(d.type_node),
            NodeData::TypePredicate(d) => one(d.type_node),
            NodeData::TypeOperator(d) => one(d.type_node),
            NodeData::AsExpression(d) => {
                one(d.expression);
                one(d.type_node);
            }
            data => {
                if let Some(sig) = data.signature() {
                    visit_signature(sig, &mut one);
                }
            }
        }
    }

    /// Fill in parent links for every node reachable from `root`.
    pub fn set_parents(&mut self, root: NodeIndex) {
        let mut stack = vec![root];
        let mut children = Vec::new();
        while let Some(parent) = stack.pop() {
            children.clear();
            self.for_each_child(parent, |child| children.push(child));
            for &child in &children {
                if let Some(node) = self.get_mut(child) {
                    node.parent = parent;
                }
                stack.push(child);
            }
        }
    }
}

fn visit_signature(sig: &SignatureData, f: &mut impl FnMut(NodeIndex)) {
    sig.type_parameters.iter().copied().for_each(&mut *f);
    sig.parameters.iter().copied().for_each(&mut *f);
    f(sig.return_type);
}

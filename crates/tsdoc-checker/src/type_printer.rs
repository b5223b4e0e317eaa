//! Rendering types and signatures as TypeScript source text.

use crate::checker::Checker;
use crate::signatures::{ParameterInfo, Signature, SignatureKind, TypeParameterInfo};
use crate::types::{TupleElement, TypeData, TypeId};
use tsdoc_binder::{DeclRef, SymbolFlags, SymbolId};
use tsdoc_common::limits::MAX_TYPE_PRINT_DEPTH;
use tsdoc_parser::{ModifierFlags, NodeData, NodeIndex};

impl Checker<'_> {
    pub fn type_to_string(&self, ty: TypeId) -> String {
        self.print_type(ty, 0)
    }

    /// `<T>(a: string, b?: number): R`, prefixed with `new ` for construct
    /// signatures.
    pub fn signature_to_string(&self, signature: &Signature) -> String {
        let mut out = String::new();
        if signature.kind == SignatureKind::Construct {
            out.push_str("new ");
        }
        out.push_str(&self.signature_head(signature, 0));
        out.push_str(": ");
        out.push_str(&self.print_type(signature.return_type, 1));
        out
    }

    /// `(a: string) => R` form used for function types.
    pub fn signature_to_arrow_string(&self, signature: &Signature) -> String {
        self.print_arrow(signature, 0)
    }

    /// Parenthesized parameter list with leading type parameters, without
    /// the return type.
    pub fn signature_head(&self, signature: &Signature, depth: usize) -> String {
        format!(
            "{}({})",
            self.print_type_parameters(&signature.type_parameters, depth),
            self.print_parameters(&signature.parameters, depth)
        )
    }

    /// One member line of an object type, as declared:
    /// `readonly name?: T`, `name(a: T): R`, `(a: T): R`, `new (): R`,
    /// `[key: string]: V`, `get name(): T`.
    pub fn member_to_string(&self, decl: DeclRef) -> Option<String> {
        self.print_member(decl, 0)
    }

    fn print_type(&self, ty: TypeId, depth: usize) -> String {
        if depth > MAX_TYPE_PRINT_DEPTH {
            return "...".to_string();
        }
        match self.type_data(ty) {
            TypeData::Error => "any".to_string(),
            TypeData::Intrinsic(kind) => kind.as_str().to_string(),
            TypeData::Literal(text) => text,
            TypeData::Reference { target, args } => {
                let mut out = self.qualified_name(target);
                if !args.is_empty() {
                    let args: Vec<String> = args.iter().map(|&a| self.print_type(a, depth + 1)).collect();
                    out.push('<');
                    out.push_str(&args.join(", "));
                    out.push('>');
                }
                out
            }
            TypeData::Anonymous { symbol } => self.print_anonymous(symbol, depth),
            TypeData::Function { decl, construct } => {
                let kind = if construct {
                    SignatureKind::Construct
                } else {
                    SignatureKind::Call
                };
                match self.signature_from_node(decl, kind) {
                    Some(signature) => self.print_arrow(&signature, depth),
                    None => "Function".to_string(),
                }
            }
            TypeData::Array(element) => {
                let inner = self.print_type(element, depth + 1);
                if self.needs_parens(element) {
                    format!("({inner})[]")
                } else {
                    format!("{inner}[]")
                }
            }
            TypeData::Tuple(elements) => {
                let elements: Vec<String> = elements.iter().map(|e| self.print_tuple_element(e, depth)).collect();
                format!("[{}]", elements.join(", "))
            }
            TypeData::Union(members) => self.print_joined(&members, " | ", depth),
            TypeData::Intersection(members) => self.print_joined(&members, " & ", depth),
            TypeData::TypeParameter { name, .. } => name,
            TypeData::Opaque(text) => collapse_whitespace(&text),
        }
    }

    fn print_joined(&self, members: &[TypeId], separator: &str, depth: usize) -> String {
        let parts: Vec<String> = members
            .iter()
            .map(|&m| {
                let text = self.print_type(m, depth + 1);
                if self.is_function_like(m) { format!("({text})") } else { text }
            })
            .collect();
        parts.join(separator)
    }

    fn print_tuple_element(&self, element: &TupleElement, depth: usize) -> String {
        let ty = self.print_type(element.ty, depth + 1);
        let rest = if element.rest { "..." } else { "" };
        match &element.name {
            Some(name) => {
                let optional = if element.optional { "?" } else { "" };
                format!("{rest}{name}{optional}: {ty}")
            }
            None if element.optional => format!("{ty}?"),
            None => format!("{rest}{ty}"),
        }
    }

    fn needs_parens(&self, ty: TypeId) -> bool {
        matches!(self.type_data(ty), TypeData::Union(_) | TypeData::Intersection(_)) || self.is_function_like(ty)
    }

    fn is_function_like(&self, ty: TypeId) -> bool {
        match self.type_data(ty) {
            TypeData::Function { .. } => true,
            TypeData::Anonymous { symbol } => {
                let flags = self.symbol_flags(symbol);
                (flags.intersects(SymbolFlags::FUNCTION | SymbolFlags::METHOD)
                    && !flags.intersects(SymbolFlags::NAMESPACE | SymbolFlags::CLASS))
                    && self.signatures_of_type(ty, SignatureKind::Call).len() == 1
            }
            _ => false,
        }
    }

    /// Name of a referenced type. Enum members are qualified by their enum.
    fn qualified_name(&self, id: SymbolId) -> String {
        let Some(symbol) = self.symbol(id) else {
            return "any".to_string();
        };
        if symbol.flags.contains(SymbolFlags::ENUM_MEMBER) {
            if let Some(parent) = symbol.parent {
                return format!("{}.{}", self.symbol_name(parent), symbol.name);
            }
        }
        symbol.name.clone()
    }

    fn print_anonymous(&self, symbol: SymbolId, depth: usize) -> String {
        let flags = self.symbol_flags(symbol);
        let ty = self.intern(TypeData::Anonymous { symbol });
        if flags.contains(SymbolFlags::TYPE_LITERAL) {
            return self.print_type_literal(symbol, depth);
        }
        if flags.intersects(SymbolFlags::FUNCTION | SymbolFlags::METHOD)
            && !flags.intersects(SymbolFlags::NAMESPACE | SymbolFlags::CLASS)
        {
            if let [signature] = self.signatures_of_type(ty, SignatureKind::Call).as_slice() {
                return self.print_arrow(signature, depth);
            }
        }
        let name = self.symbol_name(symbol);
        if name.is_empty() || name == "default" {
            "typeof (Anonymous class)".to_string()
        } else {
            format!("typeof {name}")
        }
    }

    fn print_type_literal(&self, symbol: SymbolId, depth: usize) -> String {
        let Some(literal) = self.symbol(symbol) else {
            return "{}".to_string();
        };
        let declarations: Vec<DeclRef> = literal
            .members
            .values()
            .filter_map(|&m| self.symbol(m))
            .flat_map(|m| m.declarations.iter().copied())
            .collect();

        // A lone call signature reads better as a function type
        if let [decl] = declarations.as_slice() {
            if let Some(NodeData::CallSignature(_)) = self.decl_data(*decl) {
                if let Some(signature) = self.signature_from_node(*decl, SignatureKind::Call) {
                    return self.print_arrow(&signature, depth);
                }
            }
        }
        if declarations.is_empty() {
            return "{}".to_string();
        }
        let members: Vec<String> = declarations
            .iter()
            .filter_map(|&decl| self.print_member(decl, depth + 1))
            .map(|m| format!("{m};"))
            .collect();
        format!("{{ {} }}", members.join(" "))
    }

    fn print_member(&self, decl: DeclRef, depth: usize) -> Option<String> {
        let node = self.file(decl.file)?.node(decl.node)?;
        let readonly = if node.modifiers.contains(ModifierFlags::READONLY) {
            "readonly "
        } else {
            ""
        };
        let text = match &node.data {
            NodeData::PropertySignature(p) | NodeData::PropertyDeclaration(p) => {
                let symbol = self.binder().symbol_of_node(decl.file, decl.node)?;
                let ty = self.print_type(self.type_of_symbol(symbol), depth + 1);
                let optional = if p.optional { "?" } else { "" };
                format!("{readonly}{}{optional}: {ty}", p.name)
            }
            NodeData::MethodSignature(m) | NodeData::MethodDeclaration(m) => {
                let signature = self.signature_from_node(decl, SignatureKind::Call)?;
                let optional = if m.optional { "?" } else { "" };
                format!(
                    "{}{optional}{}: {}",
                    m.name,
                    self.signature_head(&signature, depth),
                    self.print_type(signature.return_type, depth + 1)
                )
            }
            NodeData::GetAccessor(m) => {
                let signature = self.signature_from_node(decl, SignatureKind::Call)?;
                format!("get {}(): {}", m.name, self.print_type(signature.return_type, depth + 1))
            }
            NodeData::SetAccessor(m) => {
                let signature = self.signature_from_node(decl, SignatureKind::Call)?;
                format!("set {}({})", m.name, self.print_parameters(&signature.parameters, depth))
            }
            NodeData::CallSignature(_) => {
                let signature = self.signature_from_node(decl, SignatureKind::Call)?;
                format!(
                    "{}: {}",
                    self.signature_head(&signature, depth),
                    self.print_type(signature.return_type, depth + 1)
                )
            }
            NodeData::ConstructSignature(_) => {
                let signature = self.signature_from_node(decl, SignatureKind::Construct)?;
                format!(
                    "new {}: {}",
                    self.signature_head(&signature, depth),
                    self.print_type(signature.return_type, depth + 1)
                )
            }
            NodeData::IndexSignature(index) => {
                let key = self.index_key_to_string(decl, index.parameter)?;
                let value = self.print_type(self.type_of_type_node(decl.file, index.type_node), depth + 1);
                format!("{readonly}{key}: {value}")
            }
            _ => return None,
        };
        Some(text)
    }

    /// `[key: string]` for an index signature's parameter node.
    pub fn index_key_to_string(&self, decl: DeclRef, parameter: NodeIndex) -> Option<String> {
        let source = self.file(decl.file)?;
        let NodeData::Parameter(p) = source.data(parameter)? else {
            return None;
        };
        let key_type = self.type_of_type_node(decl.file, p.type_node);
        Some(format!("[{}: {}]", p.name, self.type_to_string(key_type)))
    }

    fn print_arrow(&self, signature: &Signature, depth: usize) -> String {
        let prefix = if signature.kind == SignatureKind::Construct {
            "new "
        } else {
            ""
        };
        format!(
            "{prefix}{} => {}",
            self.signature_head(signature, depth),
            self.print_type(signature.return_type, depth + 1)
        )
    }

    fn print_type_parameters(&self, params: &[TypeParameterInfo], depth: usize) -> String {
        if params.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = params
            .iter()
            .map(|p| {
                let mut out = p.name.clone();
                if let Some(constraint) = p.constraint {
                    out.push_str(" extends ");
                    out.push_str(&self.print_type(constraint, depth + 1));
                }
                if let Some(default) = p.default {
                    out.push_str(" = ");
                    out.push_str(&self.print_type(default, depth + 1));
                }
                out
            })
            .collect();
        format!("<{}>", parts.join(", "))
    }

    fn print_parameters(&self, params: &[ParameterInfo], depth: usize) -> String {
        params
            .iter()
            .map(|p| self.print_parameter(p, depth))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn print_parameter(&self, param: &ParameterInfo, depth: usize) -> String {
        let ty = self.print_type(param.ty, depth + 1);
        if param.rest {
            format!("...{}: {ty}", param.name)
        } else if param.optional {
            format!("{}?: {ty}", param.name)
        } else {
            format!("{}: {ty}", param.name)
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::collapse_whitespace;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("{\n    [K in keyof T]:\n        T[K]\n}"),
            "{ [K in keyof T]: T[K] }"
        );
    }
}

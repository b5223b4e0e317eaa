//! Tests for type node parsing.
use tsdoc_parser::{NodeData, NodeIndex, SourceFile, parse_file};
use tsdoc_scanner::SyntaxKind;

/// Parse `type T = <source>;` and return the file and the aliased type node.
fn parse_alias(source: &str) -> (SourceFile, NodeIndex) {
    let file = parse_file("test.d.ts", format!("type T = {source};"));
    let Some(NodeData::TypeAlias(alias)) = file.data(file.statements()[0]) else {
        panic!("expected type alias");
    };
    let type_node = alias.type_node;
    (file, type_node)
}

#[test]
fn parse_keyword_and_union_types() {
    let (file, ty) = parse_alias("string | number | undefined");
    assert!(file.diagnostics.is_empty());
    let Some(NodeData::UnionType(types)) = file.data(ty) else {
        panic!("expected union");
    };
    assert_eq!(types.len(), 3);
    assert!(matches!(
        file.data(types[0]),
        Some(NodeData::KeywordType(SyntaxKind::StringKeyword))
    ));
}

#[test]
fn parse_function_type_vs_parenthesized() {
    let (file, ty) = parse_alias("(value: T, index: number) => U");
    assert!(matches!(file.data(ty), Some(NodeData::FunctionType(sig)) if sig.parameters.len() == 2));

    let (file, ty) = parse_alias("(string | number)[]");
    let Some(NodeData::ArrayType(element)) = file.data(ty) else {
        panic!("expected array");
    };
    assert!(matches!(file.data(*element), Some(NodeData::ParenthesizedType(_))));
}

#[test]
fn parse_complex_types_are_opaque() {
    for source in [
        "{ [K in keyof O]?: O[K] }",
        "T extends { a: infer V } ? V : never",
        "`prefix-${string}`",
        "import('./mod').Thing<number>",
        "O[K]",
    ] {
        let (file, ty) = parse_alias(source);
        assert!(file.diagnostics.is_empty(), "{source}: {:?}", file.diagnostics);
        assert!(
            matches!(file.data(ty), Some(NodeData::OpaqueType)),
            "{source} should be opaque"
        );
        assert_eq!(file.node_text(ty), source);
    }
}

#[test]
fn parse_nested_generic_arguments() {
    let (file, ty) = parse_alias("Promise<Array<Map<string, number>>>");
    assert!(file.diagnostics.is_empty(), "{:?}", file.diagnostics);
    let Some(NodeData::TypeReference(reference)) = file.data(ty) else {
        panic!("expected reference");
    };
    assert_eq!(reference.name, vec!["Promise".to_string()]);
    assert_eq!(reference.type_arguments.len(), 1);
}

#[test]
fn parse_tuples_and_operators() {
    let (file, ty) = parse_alias("readonly [first: string, second?: number, ...rest: boolean[]]");
    assert!(file.diagnostics.is_empty(), "{:?}", file.diagnostics);
    let Some(NodeData::TypeOperator(op)) = file.data(ty) else {
        panic!("expected type operator");
    };
    assert_eq!(op.operator, SyntaxKind::ReadonlyKeyword);
    let Some(NodeData::TupleType(elements)) = file.data(op.type_node) else {
        panic!("expected tuple");
    };
    assert_eq!(elements.len(), 3);
    assert!(matches!(file.data(elements[1]), Some(NodeData::TupleMember(m)) if m.optional));
    assert!(matches!(file.data(elements[2]), Some(NodeData::TupleMember(m)) if m.rest));
}

#[test]
fn parse_type_predicates_in_return_position() {
    let file = parse_file(
        "test.d.ts",
        "declare function isString(x: unknown): x is string;\ndeclare function check(v: unknown): asserts v;".to_string(),
    );
    assert!(file.diagnostics.is_empty(), "{:?}", file.diagnostics);
    for (i, asserts) in [(0, false), (1, true)] {
        let Some(NodeData::Function(f)) = file.data(file.statements()[i]) else {
            panic!("expected function");
        };
        assert!(matches!(
            file.data(f.signature.return_type),
            Some(NodeData::TypePredicate(p)) if p.asserts == asserts
        ));
    }
}

#[test]
fn parse_type_literal_and_constructor_type() {
    let (file, ty) = parse_alias("{ a: string; b(): void, new (): T } & (abstract new (...args: any) => any)");
    assert!(file.diagnostics.is_empty(), "{:?}", file.diagnostics);
    let Some(NodeData::IntersectionType(parts)) = file.data(ty) else {
        panic!("expected intersection");
    };
    assert!(matches!(file.data(parts[0]), Some(NodeData::TypeLiteral(m)) if m.len() == 3));
    let Some(NodeData::ParenthesizedType(inner)) = file.data(parts[1]) else {
        panic!("expected parenthesized");
    };
    assert!(matches!(file.data(*inner), Some(NodeData::ConstructorType(_))));
}

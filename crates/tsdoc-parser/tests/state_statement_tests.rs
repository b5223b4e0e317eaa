//! Tests for declaration and statement parsing.
use tsdoc_parser::parser::node::{ModuleReference, VariableKind};
use tsdoc_parser::{ModifierFlags, NodeData, NodeIndex, SourceFile, parse_file};

fn parse_source(source: &str) -> SourceFile {
    parse_file("test.ts", source.to_string())
}

fn parse_declaration_file(source: &str) -> SourceFile {
    parse_file("test.d.ts", source.to_string())
}

fn statement_names(file: &SourceFile) -> Vec<String> {
    file.statements()
        .iter()
        .filter_map(|&s| match file.data(s) {
            Some(NodeData::VariableStatement(v)) => v
                .declarations
                .first()
                .and_then(|&d| file.data(d))
                .and_then(|d| d.name())
                .map(str::to_string),
            Some(data) => data.name().map(str::to_string),
            None => None,
        })
        .collect()
}

#[test]
fn parse_local_module_declarations() {
    let file = parse_source(
        r#"
/** Greets someone. */
export function greet(name: string): string {
    return `Hello, ${name}!`;
}

export interface Person {
    name: string;
    age?: number;
}

export const add = (a: number, b: number): number => a + b;

export type Config = { verbose: boolean };
"#,
    );
    assert!(file.diagnostics.is_empty(), "{:?}", file.diagnostics);
    assert!(file.is_external_module);
    assert!(!file.is_declaration_file);
    assert_eq!(
        statement_names(&file),
        vec!["greet", "Person", "add", "Config"]
    );

    let greet = file.statements()[0];
    assert!(file.node(greet).unwrap().modifiers.contains(ModifierFlags::EXPORT));
    assert!(file.jsdoc_of(greet).is_some());
    assert_eq!(file.line_of(greet), 3);
}

#[test]
fn parse_variable_statement_declarators() {
    let file = parse_source("export const a = 1, b: string = 'x';\nlet c;");
    let Some(NodeData::VariableStatement(first)) = file.data(file.statements()[0]) else {
        panic!("expected variable statement");
    };
    assert_eq!(first.kind, VariableKind::Const);
    assert_eq!(first.declarations.len(), 2);
    let b = file.node(first.declarations[1]).unwrap();
    assert!(b.modifiers.contains(ModifierFlags::EXPORT | ModifierFlags::CONST));
    let Some(NodeData::VariableStatement(second)) = file.data(file.statements()[1]) else {
        panic!("expected variable statement");
    };
    assert_eq!(second.kind, VariableKind::Let);
}

#[test]
fn parse_lib_style_interfaces_and_vars() {
    let file = parse_declaration_file(
        r#"
interface ArrayConstructor {
    new (arrayLength?: number): any[];
    new <T>(arrayLength: number): T[];
    (arrayLength?: number): any[];
    isArray(arg: any): arg is any[];
    readonly prototype: any[];
}
declare var Array: ArrayConstructor;
interface Array<T> {
    length: number;
    [n: number]: T;
    map<U>(callbackfn: (value: T, index: number, array: T[]) => U, thisArg?: any): U[];
    [Symbol.iterator](): IterableIterator<T>;
}
"#,
    );
    assert!(file.diagnostics.is_empty(), "{:?}", file.diagnostics);
    assert!(file.is_declaration_file);
    assert!(!file.is_external_module);

    let Some(NodeData::Interface(ctor)) = file.data(file.statements()[0]) else {
        panic!("expected interface");
    };
    let kinds: Vec<&str> = ctor
        .members
        .iter()
        .map(|&m| match file.data(m) {
            Some(NodeData::ConstructSignature(_)) => "construct",
            Some(NodeData::CallSignature(_)) => "call",
            Some(NodeData::MethodSignature(_)) => "method",
            Some(NodeData::PropertySignature(_)) => "property",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["construct", "construct", "call", "method", "property"]
    );
    let readonly = file.node(ctor.members[4]).unwrap();
    assert!(readonly.modifiers.contains(ModifierFlags::READONLY));

    let Some(NodeData::Interface(array)) = file.data(file.statements()[2]) else {
        panic!("expected interface");
    };
    assert!(matches!(
        file.data(array.members[1]),
        Some(NodeData::IndexSignature(_))
    ));
    assert_eq!(
        file.data(array.members[3]).and_then(|d| d.name()),
        Some("[Symbol.iterator]")
    );
}

#[test]
fn parse_class_members_and_parameter_properties() {
    let file = parse_source(
        r#"
export abstract class Shape<T = number> extends Base<T> implements Drawable {
    static readonly count = 0;
    private cache?: Map<string, T>;
    #secret = 1;
    constructor(public readonly name: string, size = 10) {
        super();
    }
    abstract area(): number;
    get label(): string { return this.name; }
    static { init(); }
    render = () => { draw(this); };
}
"#,
    );
    assert!(file.diagnostics.is_empty(), "{:?}", file.diagnostics);
    let class = file.statements()[0];
    let node = file.node(class).unwrap();
    assert!(node.modifiers.contains(ModifierFlags::ABSTRACT | ModifierFlags::EXPORT));
    let NodeData::Class(data) = &node.data else {
        panic!("expected class");
    };
    assert!(data.extends.is_some());
    assert_eq!(data.implements.len(), 1);
    let names: Vec<&str> = data
        .members
        .iter()
        .map(|&m| file.data(m).and_then(|d| d.name()).unwrap_or("<ctor>"))
        .collect();
    assert_eq!(
        names,
        vec!["count", "cache", "#secret", "<ctor>", "area", "label", "render"]
    );

    let Some(NodeData::Constructor(ctor)) = file.data(data.members[3]) else {
        panic!("expected constructor");
    };
    let param = file.node(ctor.parameters[0]).unwrap();
    assert!(param.modifiers.contains(ModifierFlags::PUBLIC | ModifierFlags::READONLY));
    let NodeData::Parameter(size) = &file.node(ctor.parameters[1]).unwrap().data else {
        panic!("expected parameter");
    };
    assert_eq!(file.node_text(size.initializer), "10");
}

#[test]
fn parse_modules_and_namespaces() {
    let file = parse_declaration_file(
        r#"
declare namespace Intl.Segmenter {
    interface Options {}
}
declare module "express" {
    export = e;
}
declare module "shorthand";
declare global {
    interface Window {}
}
export {};
"#,
    );
    assert!(file.diagnostics.is_empty(), "{:?}", file.diagnostics);
    let Some(NodeData::Module(outer)) = file.data(file.statements()[0]) else {
        panic!("expected module");
    };
    assert_eq!(outer.name, "Intl");
    let body = outer.body.as_ref().unwrap();
    let inner = file.node(body[0]).unwrap();
    assert!(inner.modifiers.contains(ModifierFlags::EXPORT));
    assert_eq!(inner.data.name(), Some("Segmenter"));

    let Some(NodeData::Module(express)) = file.data(file.statements()[1]) else {
        panic!("expected module");
    };
    assert!(express.is_string_name);
    assert!(matches!(
        file.data(express.body.as_ref().unwrap()[0]),
        Some(NodeData::ExportAssignment(a)) if a.is_export_equals
    ));

    let Some(NodeData::Module(shorthand)) = file.data(file.statements()[2]) else {
        panic!("expected module");
    };
    assert!(shorthand.body.is_none());

    let Some(NodeData::Module(global)) = file.data(file.statements()[3]) else {
        panic!("expected module");
    };
    assert!(global.is_global);
    assert!(file.is_external_module);
}

#[test]
fn parse_imports_and_exports() {
    let file = parse_source(
        r#"
import def, { a as b, type C } from "./dep";
import * as ns from "./ns";
import type { T } from "./types";
import legacy = require("legacy");
export { b as renamed, C };
export * from "./all";
export * as grouped from "./grouped";
export default greet;
"#,
    );
    assert!(file.diagnostics.is_empty(), "{:?}", file.diagnostics);
    assert_eq!(
        file.module_specifiers(),
        vec!["./dep", "./ns", "./types", "legacy", "./all", "./grouped"]
    );

    let Some(NodeData::Import(first)) = file.data(file.statements()[0]) else {
        panic!("expected import");
    };
    assert_eq!(first.bindings.len(), 3);
    let Some(NodeData::ImportSpecifier(default)) = file.data(first.bindings[0]) else {
        panic!("expected specifier");
    };
    assert_eq!(default.property_name.as_deref(), Some("default"));

    let Some(NodeData::ImportEquals(legacy)) = file.data(file.statements()[3]) else {
        panic!("expected import equals");
    };
    assert!(matches!(&legacy.module_reference, ModuleReference::External(m) if m == "legacy"));

    let Some(NodeData::ExportDeclaration(star)) = file.data(file.statements()[5]) else {
        panic!("expected export declaration");
    };
    assert!(star.specifiers.is_none());

    let Some(NodeData::ExportAssignment(default_export)) = file.data(file.statements()[7]) else {
        panic!("expected export assignment");
    };
    assert!(!default_export.is_export_equals);
    assert!(matches!(
        file.data(default_export.expression),
        Some(NodeData::EntityExpression(name)) if name == &["greet".to_string()]
    ));
}

#[test]
fn parse_skips_statements_and_bodies() {
    let file = parse_source(
        r#"
const re = /[}{]/g;
if (re.test("}")) {
    function hidden() {}
} else {
    console.log(`${"{"}`);
}
for (let i = 0; i < 10; i++) { }
export function visible() {
    const inner = { a: 1 };
}
"#,
    );
    assert_eq!(statement_names(&file), vec!["re", "visible"]);
}

#[test]
fn parse_recovers_from_garbage() {
    let file = parse_source("export interface A { x: }\n)))\nexport interface B {}");
    assert!(!file.diagnostics.is_empty());
    assert_eq!(statement_names(&file), vec!["A", "B"]);
}

#[test]
fn parse_reference_directives() {
    let file = parse_declaration_file(
        "/// <reference path=\"./globals.d.ts\" />\n/// <reference lib=\"es2015\" />\ninterface X {}\n",
    );
    assert_eq!(file.referenced_paths(), vec!["./globals.d.ts"]);
    assert_ne!(file.root, NodeIndex::NONE);
}

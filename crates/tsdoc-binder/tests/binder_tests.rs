//! Tests for symbol binding and declaration merging.

use tsdoc_binder::{AliasTarget, BinderState, Symbol, SymbolFlags, SymbolId};
use tsdoc_common::FileId;
use tsdoc_parser::{NodeData, SourceFile, parse_file};

fn bind(files: &[(&str, &str)]) -> (BinderState, Vec<SourceFile>) {
    let mut binder = BinderState::new();
    let sources: Vec<SourceFile> = files
        .iter()
        .map(|(name, text)| parse_file(*name, text.to_string()))
        .collect();
    for (i, source) in sources.iter().enumerate() {
        binder.bind_source_file(FileId(i as u32), source);
    }
    (binder, sources)
}

fn sym(binder: &BinderState, id: SymbolId) -> &Symbol {
    binder.symbol(id).expect("symbol id should be valid")
}

fn global(binder: &BinderState, name: &str) -> SymbolId {
    *binder
        .globals()
        .get(name)
        .unwrap_or_else(|| panic!("global {name} not bound"))
}

fn names(table: &tsdoc_binder::SymbolTable) -> Vec<&str> {
    table.keys().map(String::as_str).collect()
}

#[test]
fn test_script_files_merge_into_globals() {
    let (binder, _) = bind(&[
        (
            "lib.es5.d.ts",
            "interface Array<T> { length: number; }\n\
             interface ArrayConstructor { isArray(arg: any): arg is any[]; }\n\
             declare var Array: ArrayConstructor;",
        ),
        ("lib.es2015.core.d.ts", "interface Array<T> { find(p: any): T | undefined; }"),
    ]);

    let array = sym(&binder, global(&binder, "Array"));
    assert!(array.flags.contains(SymbolFlags::INTERFACE));
    assert!(array.flags.contains(SymbolFlags::FUNCTION_SCOPED_VARIABLE));
    assert_eq!(array.declarations.len(), 3);
    assert_eq!(names(&array.members), vec!["length", "find"]);

    let value = array.value_declaration.expect("var declaration is the value side");
    assert_eq!(value.file, FileId(0));

    assert!(binder.file_module(FileId(0)).is_none());
}

#[test]
fn test_module_file_exports_and_locals() {
    let (binder, _) = bind(&[(
        "greet.ts",
        "export function greet(name: string) { return name; }\n\
         interface Hidden {}\n\
         export interface Person { name: string }\n\
         export default greet;",
    )]);
    assert!(binder.globals().is_empty());

    let module = sym(&binder, binder.file_module(FileId(0)).expect("module symbol"));
    assert_eq!(names(&module.exports), vec!["greet", "Person", "default"]);
    assert_eq!(names(&module.locals), vec!["Hidden"]);

    let default = sym(&binder, module.exports["default"]);
    assert!(default.flags.contains(SymbolFlags::ALIAS));
    assert_eq!(
        default.alias_target,
        Some(AliasTarget::Local {
            path: vec!["greet".to_string()]
        })
    );
}

#[test]
fn test_declaration_module_exports_everything_without_export_list() {
    let (binder, _) = bind(&[(
        "index.d.ts",
        "import { Base } from \"./base\";\n\
         declare function make(): Base;\n\
         declare const version: string;",
    )]);
    let module = sym(&binder, binder.file_module(FileId(0)).expect("module symbol"));
    assert_eq!(names(&module.exports), vec!["make", "version"]);
    assert_eq!(names(&module.locals), vec!["Base"]);
    assert_eq!(
        sym(&binder, module.locals["Base"]).alias_target,
        Some(AliasTarget::Import {
            module: "./base".to_string(),
            name: "Base".to_string()
        })
    );
}

#[test]
fn test_ambient_modules_merge_by_name() {
    let (binder, _) = bind(&[
        (
            "express/index.d.ts",
            "declare module \"express\" {\n\
               function e(): void;\n\
               export = e;\n\
             }",
        ),
        (
            "express/request.d.ts",
            "declare module \"express\" { interface Request { path: string } }",
        ),
    ]);
    let express = sym(&binder, binder.ambient_module("express").expect("ambient module"));
    assert_eq!(express.declarations.len(), 2);
    assert_eq!(names(&express.locals), vec!["e"]);
    assert_eq!(names(&express.exports), vec!["export=", "Request"]);
    assert!(binder.globals().is_empty());
}

#[test]
fn test_class_members_split_instance_and_static() {
    let (binder, sources) = bind(&[(
        "shapes.ts",
        "export class Shape {\n\
           static count = 0;\n\
           readonly id: number;\n\
           #secret = 1;\n\
           constructor(public name: string, private readonly size?: number) {}\n\
           area(): number { return 0; }\n\
           get label(): string { return ''; }\n\
         }",
    )]);
    let module = sym(&binder, binder.file_module(FileId(0)).expect("module symbol"));
    let shape = sym(&binder, module.exports["Shape"]);
    assert!(shape.flags.contains(SymbolFlags::CLASS));
    assert_eq!(names(&shape.exports), vec!["count"]);
    assert_eq!(
        names(&shape.members),
        vec!["id", "name", "size", "__constructor", "area", "label"]
    );

    let id = sym(&binder, shape.members["id"]);
    assert!(id.flags.contains(SymbolFlags::PROPERTY | SymbolFlags::READONLY));
    let size = sym(&binder, shape.members["size"]);
    assert!(size.flags.contains(SymbolFlags::OPTIONAL | SymbolFlags::READONLY));
    let count = sym(&binder, shape.exports["count"]);
    assert!(count.flags.contains(SymbolFlags::STATIC));
    assert_eq!(count.parent, Some(module.exports["Shape"]));

    let area_decl = sym(&binder, shape.members["area"]).declarations[0];
    assert!(matches!(
        sources[0].data(area_decl.node),
        Some(NodeData::MethodDeclaration(_))
    ));
}

#[test]
fn test_namespace_merges_with_function_and_nests() {
    let (binder, _) = bind(&[(
        "globals.d.ts",
        "declare function $(selector: string): void;\n\
         declare namespace $ { const version: string; }\n\
         declare namespace Intl.Segmenter { interface Options { granularity: string } }",
    )]);
    let dollar = sym(&binder, global(&binder, "$"));
    assert!(dollar.flags.contains(SymbolFlags::FUNCTION | SymbolFlags::NAMESPACE_MODULE));
    assert_eq!(names(&dollar.exports), vec!["version"]);

    let intl = sym(&binder, global(&binder, "Intl"));
    let segmenter = sym(&binder, intl.exports["Segmenter"]);
    assert_eq!(names(&segmenter.exports), vec!["Options"]);
}

#[test]
fn test_const_enum_members_are_exports() {
    let (binder, _) = bind(&[("colors.d.ts", "declare const enum Color { Red, Green = 2 }")]);
    let color = sym(&binder, global(&binder, "Color"));
    assert!(color.flags.contains(SymbolFlags::CONST_ENUM));
    assert_eq!(names(&color.exports), vec!["Red", "Green"]);
    assert!(sym(&binder, color.exports["Red"]).flags.contains(SymbolFlags::ENUM_MEMBER));
}

#[test]
fn test_reexports() {
    let (binder, _) = bind(&[(
        "index.ts",
        "export * from \"./a\";\n\
         export * as b from \"./b\";\n\
         export { x as y } from \"./c\";",
    )]);
    let module = sym(&binder, binder.file_module(FileId(0)).expect("module symbol"));
    assert_eq!(module.export_stars, vec![(FileId(0), "./a".to_string())]);
    assert_eq!(names(&module.exports), vec!["b", "y"]);
    assert_eq!(
        sym(&binder, module.exports["b"]).alias_target,
        Some(AliasTarget::Namespace {
            module: "./b".to_string()
        })
    );
    assert_eq!(
        sym(&binder, module.exports["y"]).alias_target,
        Some(AliasTarget::Import {
            module: "./c".to_string(),
            name: "x".to_string()
        })
    );
}

#[test]
fn test_type_literal_gets_anonymous_symbol() {
    let (binder, sources) = bind(&[("t.d.ts", "type Options = { a: string; b?: number };")]);
    let source = &sources[0];
    let Some(NodeData::TypeAlias(alias)) = source.data(source.statements()[0]) else {
        panic!("expected a type alias");
    };
    let literal = binder
        .symbol_of_node(FileId(0), alias.type_node)
        .expect("type literal symbol");
    let literal = sym(&binder, literal);
    assert!(literal.flags.contains(SymbolFlags::TYPE_LITERAL));
    assert_eq!(names(&literal.members), vec!["a", "b"]);
    assert!(sym(&binder, literal.members["b"]).flags.contains(SymbolFlags::OPTIONAL));
}

#[test]
fn test_umd_global_points_at_module() {
    let (binder, _) = bind(&[(
        "react/index.d.ts",
        "export = React;\n\
         export as namespace React;\n\
         declare namespace React { const version: string; }",
    )]);
    let module = binder.file_module(FileId(0)).expect("module symbol");
    let react = sym(&binder, global(&binder, "React"));
    assert_eq!(react.alias_target, Some(AliasTarget::Symbol(module)));

    // `export =` turns off implicit exports, so the namespace stays local
    let module = sym(&binder, module);
    assert_eq!(names(&module.exports), vec!["export="]);
    assert_eq!(names(&module.locals), vec!["React"]);
}

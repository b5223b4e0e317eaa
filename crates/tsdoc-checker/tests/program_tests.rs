//! Tests for program construction and dependency discovery.

use std::path::{Path, PathBuf};
use tsdoc_binder::SymbolFlags;
use tsdoc_checker::{Checker, MemoryHost, PackageResolver, Program};

fn file_names(program: &Program) -> Vec<String> {
    program
        .files()
        .map(|(_, f)| f.file_name.replace('\\', "/"))
        .collect()
}

#[test]
fn test_universe_comes_first_then_discovered_files() {
    let host = MemoryHost::new()
        .with_file(
            "/pkg/index.d.ts",
            "/// <reference path=\"./globals.d.ts\" />\n\
             export { Widget } from \"./widget\";\n\
             export * from \"./util.js\";\n\
             import fs = require(\"fs\");",
        )
        .with_file("/pkg/globals.d.ts", "declare var VERSION: string;")
        .with_file("/pkg/widget.d.ts", "export declare class Widget {}")
        .with_file("/pkg/util.d.ts", "export declare function helper(): void;")
        .with_file("/lib/lib.es5.d.ts", "interface Array<T> { length: number; }");

    let universe = vec![PathBuf::from("/lib/lib.es5.d.ts"), PathBuf::from("/pkg/index.d.ts")];
    let program = Program::build_with_host(&universe, &host);

    assert_eq!(
        file_names(&program),
        vec![
            "/lib/lib.es5.d.ts",
            "/pkg/index.d.ts",
            "/pkg/globals.d.ts",
            "/pkg/widget.d.ts",
            "/pkg/util.d.ts",
        ]
    );
    assert_eq!(program.universe_files().count(), 2);
    assert_eq!(program.options().target, "ESNext");
    assert_eq!(program.options().module, "NodeNext");

    let index = program.file_id(Path::new("/pkg/index.d.ts")).expect("index loaded");
    let widget = program.file_id(Path::new("/pkg/./widget.d.ts")).expect("widget loaded");
    assert_eq!(program.resolve_relative_module(index, "./widget"), Some(widget));
    assert_eq!(program.resolve_relative_module(index, "fs"), None);
}

#[test]
fn test_files_are_loaded_once() {
    let host = MemoryHost::new()
        .with_file("/a.d.ts", "export * from \"./b\";\nexport * from \"./c\";")
        .with_file("/b.d.ts", "export * from \"./c\";\nexport declare const b: 1;")
        .with_file("/c.d.ts", "export * from \"./a\";\nexport declare const c: 2;");

    let program = Program::build_with_host(&[PathBuf::from("/a.d.ts")], &host);
    assert_eq!(file_names(&program), vec!["/a.d.ts", "/b.d.ts", "/c.d.ts"]);
}

#[test]
fn test_unreadable_files_are_skipped() {
    let host = MemoryHost::new()
        .with_file("/ok.d.ts", "import { x } from \"./missing\";\ndeclare const ok: true;");
    let universe = vec![PathBuf::from("/absent.d.ts"), PathBuf::from("/ok.d.ts")];
    let program = Program::build_with_host(&universe, &host);

    assert_eq!(file_names(&program), vec!["/ok.d.ts"]);
    assert_eq!(program.file_count(), 1);
    assert!(program.file_id(Path::new("/absent.d.ts")).is_none());
}

#[test]
fn test_build_from_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let types = dir.path().join("types");
    std::fs::create_dir_all(&types).expect("create types dir");
    std::fs::write(
        dir.path().join("main.ts"),
        "import { Shape } from \"./types\";\nexport const shape: Shape = { sides: 3 };",
    )
    .expect("write main.ts");
    std::fs::write(types.join("index.d.ts"), "export interface Shape { sides: number }")
        .expect("write index.d.ts");

    let program = Program::build(&[dir.path().join("main.ts")]);
    assert_eq!(program.file_count(), 2);
    assert!(program.file_id(&types.join("index.d.ts")).is_some());
}

/// Places every bare specifier at `/node_modules/<name>/index.d.ts`.
struct FlatNodeModules;

impl PackageResolver for FlatNodeModules {
    fn resolve_package(&self, specifier: &str, _from_dir: &Path) -> Option<PathBuf> {
        Some(PathBuf::from(format!("/node_modules/{specifier}/index.d.ts")))
    }
}

#[test]
fn test_bare_specifiers_follow_package_resolver() {
    let host = MemoryHost::new()
        .with_file(
            "/node_modules/glob/index.d.ts",
            "export { escape } from \"minimatch\";\nexport * from \"absent\";\nexport declare function glob(pattern: string): string[];",
        )
        .with_file(
            "/node_modules/minimatch/index.d.ts",
            "/** Escapes glob magic. */\nexport declare function escape(s: string): string;",
        );
    let universe = vec![PathBuf::from("/node_modules/glob/index.d.ts")];
    let program = Program::build_with(&universe, &host, &FlatNodeModules);

    assert_eq!(
        file_names(&program),
        vec!["/node_modules/glob/index.d.ts", "/node_modules/minimatch/index.d.ts"]
    );
    let minimatch = program
        .file_id(Path::new("/node_modules/minimatch/index.d.ts"))
        .expect("minimatch loaded");
    assert_eq!(program.resolve_package_module("minimatch"), Some(minimatch));
    assert_eq!(program.resolve_package_module("absent"), None);

    let checker = Checker::new(&program);
    let glob_file = program
        .file_id(Path::new("/node_modules/glob/index.d.ts"))
        .expect("glob loaded");
    let glob = checker.module_of_file(glob_file).expect("glob is a module");
    let escape = checker.export_of_module(glob, "escape").expect("escape exported");
    let target = checker.resolve_alias(escape);
    assert!(checker.symbol_flags(target).contains(SymbolFlags::FUNCTION));
    assert_eq!(checker.symbol_documentation(target).summary, "Escapes glob magic.");

    // Without a resolver the re-export stays unresolved
    let program = Program::build_with_host(&universe, &host);
    assert_eq!(program.file_count(), 1);
}

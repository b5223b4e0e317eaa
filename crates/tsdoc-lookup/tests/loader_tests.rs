//! Tests for declaration universe discovery on disk.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tsdoc_lookup::loader::{
    find_lib_dir, list_lib_files, load_universe, resolve_package_declaration_files,
};
use tsdoc_lookup::{LookupConfig, UniverseRoot};

fn write(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dirs");
    }
    std::fs::write(path, text).expect("write file");
}

fn file_names(files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|f| f.file_name().expect("file name").to_string_lossy().into_owned())
        .collect()
}

/// A project directory with a fake TypeScript lib dir beside it.
fn workspace() -> (TempDir, LookupConfig) {
    let dir = tempfile::tempdir().expect("temp dir");
    let lib = dir.path().join("typescript-lib");
    write(&lib.join("lib.es5.d.ts"), "interface Array<T> { length: number; }");
    write(&lib.join("lib.dom.d.ts"), "interface Node { nodeName: string; }");
    write(&lib.join("lib.d.ts"), "/// <reference lib=\"es5\" />");
    std::fs::create_dir_all(dir.path().join("project")).expect("project dir");
    let config = LookupConfig::default()
        .with_cwd(dir.path().join("project"))
        .with_lib_dir(lib);
    (dir, config)
}

#[test]
fn test_lib_files_are_filtered_and_sorted() {
    let dir = tempfile::tempdir().expect("temp dir");
    for name in [
        "lib.es5.d.ts",
        "typescript.d.ts",
        "lib.dom.d.ts",
        "lib.es5.js",
        "lib.d.ts",
        "tsserverlibrary.d.ts",
    ] {
        write(&dir.path().join(name), "");
    }
    write(&dir.path().join("nested/lib.extra.d.ts"), "");

    let files = list_lib_files(dir.path());
    assert_eq!(file_names(&files), vec!["lib.d.ts", "lib.dom.d.ts", "lib.es5.d.ts"]);
}

#[test]
fn test_lib_dir_found_in_ancestor_node_modules() {
    let dir = tempfile::tempdir().expect("temp dir");
    let lib = dir.path().join("node_modules/typescript/lib");
    write(&lib.join("lib.es5.d.ts"), "");
    let cwd = dir.path().join("packages/app");
    std::fs::create_dir_all(&cwd).expect("cwd");

    let config = LookupConfig::default().with_cwd(&cwd);
    assert_eq!(find_lib_dir(&config), Some(lib));
}

#[test]
fn test_configured_lib_dir_wins() {
    let (_dir, config) = workspace();
    assert_eq!(find_lib_dir(&config), config.lib_dir.clone());
}

#[test]
fn test_package_manifest_types() {
    let dir = tempfile::tempdir().expect("temp dir");
    let pkg = dir.path().join("node_modules/left-pad");
    write(&pkg.join("package.json"), r#"{ "name": "left-pad", "types": "dist/index.d.ts" }"#);
    write(&pkg.join("dist/index.d.ts"), "export declare function leftPad(s: string): string;");

    let files = resolve_package_declaration_files("left-pad", dir.path());
    assert_eq!(files, vec![pkg.join("dist/index.d.ts")]);
}

#[test]
fn test_package_exports_types_condition() {
    let dir = tempfile::tempdir().expect("temp dir");
    let pkg = dir.path().join("node_modules/modern");
    write(
        &pkg.join("package.json"),
        r#"{ "exports": { ".": { "types": "./types/main.d.ts", "default": "./main.js" } } }"#,
    );
    write(&pkg.join("types/main.d.ts"), "export {};");

    let files = resolve_package_declaration_files("modern", dir.path());
    assert_eq!(files, vec![pkg.join("types/main.d.ts")]);
}

#[test]
fn test_malformed_manifest_falls_back_to_index() {
    let dir = tempfile::tempdir().expect("temp dir");
    let pkg = dir.path().join("node_modules/broken");
    write(&pkg.join("package.json"), "{ not json");
    write(&pkg.join("index.d.ts"), "export {};");

    let files = resolve_package_declaration_files("broken", dir.path());
    assert_eq!(files, vec![pkg.join("index.d.ts")]);
}

#[test]
fn test_scoped_types_package() {
    let dir = tempfile::tempdir().expect("temp dir");
    let types = dir.path().join("node_modules/@types/babel__core");
    write(&types.join("index.d.ts"), "export {};");
    // The package itself ships no declarations
    write(
        &dir.path().join("node_modules/@babel/core/package.json"),
        r#"{ "main": "lib/index.js" }"#,
    );

    let files = resolve_package_declaration_files("@babel/core", dir.path());
    assert_eq!(files, vec![types.join("index.d.ts")]);
}

#[test]
fn test_nearest_node_modules_wins() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(&dir.path().join("node_modules/shared/index.d.ts"), "export {};");
    let app = dir.path().join("apps/web");
    write(&app.join("node_modules/shared/index.d.ts"), "export {};");

    let files = resolve_package_declaration_files("shared", &app);
    assert_eq!(files, vec![app.join("node_modules/shared/index.d.ts")]);
}

#[test]
fn test_missing_package_yields_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    assert!(resolve_package_declaration_files("nope", dir.path()).is_empty());
    assert!(resolve_package_declaration_files("", dir.path()).is_empty());
    assert!(resolve_package_declaration_files("./relative", dir.path()).is_empty());
}

#[test]
fn test_universe_orders_stdlib_before_entry() {
    let (_dir, config) = workspace();
    let pkg = config.cwd.join("node_modules/chalk");
    write(&pkg.join("index.d.ts"), "export declare const red: (s: string) => string;");

    let universe = load_universe(&config, Some("chalk"));
    assert_eq!(
        file_names(&universe.files),
        vec!["lib.d.ts", "lib.dom.d.ts", "lib.es5.d.ts", "index.d.ts"]
    );
    assert_eq!(
        universe.root,
        UniverseRoot::Package {
            name: "chalk".to_string(),
            entry: pkg.join("index.d.ts"),
        }
    );
}

#[test]
fn test_universe_local_module_and_stdlib_only() {
    let (_dir, config) = workspace();
    write(&config.cwd.join("src/helpers.ts"), "export const x = 1;");

    let local = load_universe(&config, Some("helpers"));
    assert_eq!(local.entry(), Some(&config.cwd.join("src").join("helpers.ts")));
    assert_eq!(local.files.len(), 4);

    let stdlib = load_universe(&config, Some("Array"));
    assert_eq!(stdlib.root, UniverseRoot::StandardLibrary);
    assert_eq!(stdlib.entry(), None);
    assert_eq!(stdlib.files.len(), 3);
}

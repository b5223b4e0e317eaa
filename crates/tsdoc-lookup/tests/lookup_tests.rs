//! End-to-end lookups against a fake TypeScript installation and project.

use std::path::Path;
use tempfile::TempDir;
use tsdoc_lookup::{
    EntityKind, ExportListing, LookupConfig, LookupError, LookupOutput, SymbolDescription, lookup,
};

const LIB_ES5: &str = r#"/// <reference no-default-lib="true"/>

interface Array<T> {
    /** Gets or sets the length of the array. */
    length: number;
    /**
     * Appends new elements to the end of an array, and returns the new length of the array.
     * @param items New elements to add to the array.
     */
    push(...items: T[]): number;
    /** Returns a string representation of an array. */
    toString(): string;
}

interface ArrayConstructor {
    new (arrayLength?: number): any[];
    (arrayLength?: number): any[];
    isArray(arg: any): arg is any[];
    readonly prototype: any[];
}

declare var Array: ArrayConstructor;

interface String {
    /**
     * Returns the character at the specified index.
     * @param pos The zero-based index of the desired character.
     */
    charAt(pos: number): string;
    /**
     * Gets a substring beginning at the specified location.
     * @deprecated A legacy feature for browser compatibility
     */
    substr(from: number, length?: number): string;
}

interface StringConstructor {
    new (value?: any): String;
    (value?: any): string;
    fromCharCode(...codes: number[]): string;
}

declare var String: StringConstructor;

/**
 * Make all properties in T readonly
 * @since 2.1
 * @remarks Shallow only.
 */
type Readonly<T> = {
    readonly [P in keyof T]: T[P];
};

interface Greeter {
    fromEs5: string;
}
"#;

const LIB_DOM: &str = r#"
interface Greeter {
    fromDom: string;
}
"#;

fn write(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dirs");
    }
    std::fs::write(path, text).expect("write file");
}

/// Fake TypeScript lib dir plus an empty project directory.
fn workspace() -> (TempDir, LookupConfig) {
    let dir = tempfile::tempdir().expect("temp dir");
    let lib = dir.path().join("typescript/lib");
    write(&lib.join("lib.es5.d.ts"), LIB_ES5);
    write(&lib.join("lib.dom.d.ts"), LIB_DOM);
    let project = dir.path().join("project");
    std::fs::create_dir_all(&project).expect("project dir");
    let config = LookupConfig::default().with_cwd(project).with_lib_dir(lib);
    (dir, config)
}

fn describe(query: &str, config: &LookupConfig) -> SymbolDescription {
    match lookup(query, config) {
        Ok(LookupOutput::Symbol(description)) => *description,
        other => panic!("expected a symbol description for {query}, got {other:?}"),
    }
}

fn listing(query: &str, config: &LookupConfig) -> ExportListing {
    match lookup(query, config) {
        Ok(LookupOutput::Exports(listing)) => listing,
        other => panic!("expected an export listing for {query}, got {other:?}"),
    }
}

#[test]
fn test_array_is_array() {
    let (_dir, config) = workspace();
    let description = describe("Array.isArray", &config);

    assert_eq!(description.name, "isArray");
    assert_eq!(description.kind, EntityKind::Function);
    assert!(description.construct_signatures.is_empty());
    assert_eq!(description.call_signatures.len(), 1);
    let signature = &description.call_signatures[0];
    assert_eq!(signature.parameters.len(), 1);
    assert_eq!(signature.parameters[0].name, "arg");
    assert_eq!(signature.return_type.as_deref(), Some("boolean"));
    assert_eq!(description.type_text, None);
    let location = description.location.expect("location");
    assert!(location.file.ends_with("lib.es5.d.ts"));
    assert_eq!(location.line, 18);
}

#[test]
fn test_missing_member_is_not_found() {
    let (_dir, config) = workspace();
    let err = lookup("Array.doesNotExist", &config).expect_err("no such member");
    assert!(matches!(err, LookupError::NotFound { .. }));
    assert_eq!(err.to_string(), "Symbol 'Array.doesNotExist' not found");

    let err = lookup("NoSuchThing", &config).expect_err("no such root");
    assert_eq!(err.to_string(), "Symbol 'NoSuchThing' not found");

    // A missing intermediate segment fails the whole path
    let err = lookup("Array.nope.length", &config).expect_err("no partial result");
    assert!(matches!(err, LookupError::NotFound { .. }));
}

#[test]
fn test_invalid_paths_are_rejected() {
    let (_dir, config) = workspace();
    assert!(matches!(lookup("", &config), Err(LookupError::InvalidPath(_))));
    assert!(matches!(lookup("Array..push", &config), Err(LookupError::InvalidPath(_))));
}

#[test]
fn test_interface_members_are_capped() {
    let (_dir, mut config) = workspace();
    config.max_members = 2;
    let description = describe("Array", &config);

    assert_eq!(description.kind, EntityKind::Interface);
    assert_eq!(description.type_text, None);
    let names: Vec<&str> = description.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["length", "push"]);
    assert_eq!(description.more_members, 1);

    let length = &description.members[0];
    assert_eq!(length.type_text, "number");
    assert_eq!(length.summary.as_deref(), Some("Gets or sets the length of the array."));
    assert_eq!(description.members[1].type_text, "(...items: T[]): number");

    // The value side contributes the constructor's signatures
    assert_eq!(description.construct_signatures.len(), 1);
    assert_eq!(
        description.construct_signatures[0].text,
        "new (arrayLength?: number): any[]"
    );
    assert_eq!(description.call_signatures.len(), 1);
}

#[test]
fn test_member_summaries_are_truncated() {
    let (_dir, mut config) = workspace();
    config.summary_width = 20;
    let description = describe("Array", &config);
    let push = description
        .members
        .iter()
        .find(|m| m.name == "push")
        .expect("push member");
    assert_eq!(push.summary.as_deref(), Some("Appends new elements..."));
}

#[test]
fn test_deprecated_tag_and_parameter_docs() {
    let (_dir, config) = workspace();

    let substr = describe("String.substr", &config);
    assert_eq!(substr.kind, EntityKind::Function);
    assert!(substr.deprecated);
    assert_eq!(
        substr.deprecation_note.as_deref(),
        Some("A legacy feature for browser compatibility")
    );
    let parameters = &substr.call_signatures[0].parameters;
    assert_eq!(parameters.len(), 2);
    assert!(!parameters[0].optional);
    assert!(parameters[1].optional);

    let char_at = describe("String.charAt", &config);
    assert!(!char_at.deprecated);
    assert_eq!(char_at.deprecation_note, None);
    assert_eq!(char_at.documentation, "Returns the character at the specified index.");
    assert_eq!(
        char_at.call_signatures[0].parameters[0].doc.as_deref(),
        Some("The zero-based index of the desired character.")
    );
}

#[test]
fn test_type_alias_shows_aliased_text_and_tags() {
    let (_dir, config) = workspace();
    let description = describe("Readonly", &config);

    assert_eq!(description.kind, EntityKind::TypeAlias);
    assert!(description.call_signatures.is_empty());
    let type_text = description.type_text.expect("aliased type text");
    assert!(type_text.starts_with("{ readonly [P in keyof T]: T[P];"), "{type_text}");
    assert_eq!(description.since.as_deref(), Some("2.1"));
    assert_eq!(description.other_tags, vec!["@remarks Shallow only.".to_string()]);
    assert_eq!(description.documentation, "Make all properties in T readonly");
}

#[test]
fn test_first_file_in_universe_order_locates_merged_interface() {
    let (_dir, config) = workspace();
    let description = describe("Greeter", &config);

    // lib.dom.d.ts sorts before lib.es5.d.ts
    let location = description.location.expect("location");
    assert!(location.file.ends_with("lib.dom.d.ts"), "{}", location.file);
    let names: Vec<&str> = description.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["fromDom", "fromEs5"]);
}

#[test]
fn test_lookup_is_idempotent() {
    let (_dir, config) = workspace();
    let first = lookup("Array.isArray", &config).expect("found");
    let second = lookup("Array.isArray", &config).expect("found");
    assert_eq!(first, second);
}

#[test]
fn test_local_module_lists_exports() {
    let (_dir, config) = workspace();
    write(
        &config.cwd.join("mymod.ts"),
        r#"
/** Greets someone by name. */
export function greet(name: string): string {
    return "Hello, " + name;
}

export interface Person {
    name: string;
    age?: number;
}

export const add = (a: number, b: number): number => a + b;

export type Config = { verbose: boolean };
"#,
    );

    let listing = listing("mymod", &config);
    assert_eq!(listing.name, "mymod");
    let exports: Vec<(&str, EntityKind)> = listing
        .exports
        .iter()
        .map(|e| (e.name.as_str(), e.kind))
        .collect();
    assert_eq!(
        exports,
        vec![
            ("greet", EntityKind::Function),
            ("Person", EntityKind::Interface),
            ("add", EntityKind::Variable),
            ("Config", EntityKind::TypeAlias),
        ]
    );
    assert_eq!(listing.exports[0].summary.as_deref(), Some("Greets someone by name."));
    assert_eq!(listing.more_exports, 0);

    let add = describe("mymod.add", &config);
    assert_eq!(add.kind, EntityKind::Variable);
    assert_eq!(add.call_signatures.len(), 1);
    assert_eq!(add.call_signatures[0].text, "(a: number, b: number): number");
}

#[test]
fn test_export_listing_is_capped() {
    let (_dir, mut config) = workspace();
    config.max_exports = 3;
    let source: String = (0..8)
        .map(|i| format!("export declare const value{i}: number;\n"))
        .collect();
    write(&config.cwd.join("many.d.ts"), &source);

    let listing = listing("many", &config);
    assert_eq!(listing.exports.len(), 3);
    assert_eq!(listing.exports[2].name, "value2");
    assert_eq!(listing.more_exports, 5);
}

#[test]
fn test_local_class_members_and_constructor() {
    let (_dir, config) = workspace();
    write(
        &config.cwd.join("shapes.ts"),
        r#"
export class Circle {
    constructor(public radius: number) {}

    /** Area of the circle. */
    area(): number {
        return Math.PI * this.radius * this.radius;
    }

    static unit(): Circle {
        return new Circle(1);
    }
}
"#,
    );

    let circle = describe("shapes.Circle", &config);
    assert_eq!(circle.kind, EntityKind::Class);
    assert_eq!(circle.construct_signatures.len(), 1);
    assert_eq!(circle.construct_signatures[0].text, "new (radius: number): Circle");
    assert_eq!(circle.construct_signatures[0].return_type, None);
    let members: Vec<(&str, bool)> = circle
        .members
        .iter()
        .map(|m| (m.name.as_str(), m.static_))
        .collect();
    assert_eq!(members, vec![("radius", false), ("area", false), ("unit", true)]);
    assert_eq!(circle.members[1].summary.as_deref(), Some("Area of the circle."));

    let area = describe("shapes.Circle.area", &config);
    assert_eq!(area.kind, EntityKind::Method);
    assert_eq!(area.call_signatures[0].return_type.as_deref(), Some("number"));
}

#[test]
fn test_package_with_export_equals() {
    let (_dir, config) = workspace();
    let pkg = config.cwd.join("node_modules/events");
    write(&pkg.join("package.json"), r#"{ "name": "events", "types": "index.d.ts" }"#);
    write(
        &pkg.join("index.d.ts"),
        r#"
declare class EventEmitter {
    /** Registers a listener. */
    on(event: string, listener: (...args: any[]) => void): this;
    static defaultMaxListeners: number;
}
export = EventEmitter;
"#,
    );

    let max = describe("events.defaultMaxListeners", &config);
    assert_eq!(max.kind, EntityKind::Property);
    assert_eq!(max.type_text.as_deref(), Some("number"));

    let on = describe("events.on", &config);
    assert_eq!(on.kind, EntityKind::Method);
    assert_eq!(on.documentation, "Registers a listener.");
    assert_eq!(on.call_signatures[0].parameters.len(), 2);

    assert!(matches!(
        lookup("events.off", &config),
        Err(LookupError::NotFound { .. })
    ));
}

#[test]
fn test_json_output_shape() {
    let (_dir, config) = workspace();
    let output = lookup("Array.isArray", &config).expect("found");
    let json = serde_json::to_value(&output).expect("serializable");
    assert_eq!(json["type"], "symbol");
    assert_eq!(json["kind"], "function");
    assert_eq!(json["call_signatures"][0]["return_type"], "boolean");
}

const API_D_TS: &str = r#"
/**
 * Parses text.
 * @throws {SyntaxError} When the text is malformed.
 * @exception RangeError on overflow
 * @example
 * ```ts
 * @Injectable()
 * class Service {}
 * parse("1");
 * ```
 * @see {@link format} for the reverse
 * @deprecated Use {@link parseStrict} instead
 * @beta
 */
export declare function parse<T extends object = object, U = string>(text: string): T;

/**
 * Formats a number.
 * @param value The number.
 * @returns The decimal text.
 */
export declare function format(value: number): string;
/**
 * Formats a string.
 * @returns The trimmed text.
 */
export declare function format(value: string, pattern?: string): string;
"#;

#[test]
fn test_doc_tags_are_partitioned_verbatim() {
    let (_dir, config) = workspace();
    write(&config.cwd.join("api.d.ts"), API_D_TS);
    let parse = describe("api.parse", &config);

    assert_eq!(parse.kind, EntityKind::Function);
    assert_eq!(parse.documentation, "Parses text.");
    assert_eq!(
        parse.throws,
        vec![
            "{SyntaxError} When the text is malformed.".to_string(),
            "RangeError on overflow".to_string(),
        ]
    );
    // The decorator inside the code fence stays part of the example
    assert_eq!(
        parse.examples,
        vec!["```ts\n@Injectable()\nclass Service {}\nparse(\"1\");\n```".to_string()]
    );
    assert_eq!(parse.see, vec!["{@link format} for the reverse".to_string()]);
    assert!(parse.deprecated);
    assert_eq!(parse.deprecation_note.as_deref(), Some("Use {@link parseStrict} instead"));
    assert_eq!(parse.other_tags, vec!["@beta".to_string()]);
}

#[test]
fn test_type_parameters_with_constraints_and_defaults() {
    let (_dir, config) = workspace();
    write(&config.cwd.join("api.d.ts"), API_D_TS);
    let parse = describe("api.parse", &config);

    let signature = &parse.call_signatures[0];
    let type_parameters: Vec<(&str, Option<&str>, Option<&str>)> = signature
        .type_parameters
        .iter()
        .map(|tp| (tp.name.as_str(), tp.constraint.as_deref(), tp.default.as_deref()))
        .collect();
    assert_eq!(
        type_parameters,
        vec![("T", Some("object"), Some("object")), ("U", None, Some("string"))]
    );
    assert!(
        signature.text.starts_with("<T extends object = object, U = string>(text: string)"),
        "{}",
        signature.text
    );
}

#[test]
fn test_each_overload_keeps_its_own_returns_doc() {
    let (_dir, config) = workspace();
    write(&config.cwd.join("api.d.ts"), API_D_TS);
    let format = describe("api.format", &config);

    assert_eq!(format.call_signatures.len(), 2);
    assert_eq!(format.documentation, "Formats a number.");
    assert_eq!(format.call_signatures[0].returns_doc.as_deref(), Some("The decimal text."));
    assert_eq!(format.call_signatures[1].returns_doc.as_deref(), Some("The trimmed text."));
    assert_eq!(
        format.call_signatures[0].parameters[0].doc.as_deref(),
        Some("The number.")
    );
    assert!(format.call_signatures[1].parameters[1].optional);
    assert!(format.other_tags.is_empty());
}

#[test]
fn test_parameter_default_values_and_unannotated_returns() {
    let (_dir, config) = workspace();
    write(
        &config.cwd.join("text.ts"),
        r#"
export function pad(text: string, width = 8, fill: string = " "): string {
    return fill.repeat(width) + text;
}

export function twice(x = 5) {
    return x * 2;
}
"#,
    );

    let pad = describe("text.pad", &config);
    let defaults: Vec<(&str, Option<&str>, bool)> = pad.call_signatures[0]
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), p.default_value.as_deref(), p.optional))
        .collect();
    assert_eq!(
        defaults,
        vec![("text", None, false), ("width", Some("8"), true), ("fill", Some("\" \""), true)]
    );

    // Bodies are not analyzed, so an unannotated return is `any`
    let twice = describe("text.twice", &config);
    let signature = &twice.call_signatures[0];
    assert_eq!(signature.return_type.as_deref(), Some("any"));
    assert_eq!(signature.parameters[0].default_value.as_deref(), Some("5"));
}

#[test]
fn test_class_members_are_capped_at_twenty() {
    let (_dir, config) = workspace();
    let members: String = (0..25).map(|i| format!("    m{i}: number;\n")).collect();
    write(
        &config.cwd.join("big.d.ts"),
        &format!("export declare class Big {{\n{members}}}\n"),
    );

    let big = describe("big.Big", &config);
    assert_eq!(big.kind, EntityKind::Class);
    assert_eq!(big.members.len(), 20);
    assert_eq!(big.more_members, 5);
    assert_eq!(big.members[0].name, "m0");
    assert_eq!(big.members[19].name, "m19");
}

#[test]
fn test_cross_package_reexports_keep_their_kind() {
    let (_dir, config) = workspace();
    let node_modules = config.cwd.join("node_modules");
    write(
        &node_modules.join("glob/package.json"),
        r#"{ "name": "glob", "types": "dist/index.d.ts" }"#,
    );
    write(
        &node_modules.join("glob/dist/index.d.ts"),
        r#"
export { escape } from "minimatch";
/** Matches files. */
export declare function glob(pattern: string): string[];
"#,
    );
    write(
        &node_modules.join("minimatch/index.d.ts"),
        "/** Escapes glob magic characters. */\nexport declare function escape(s: string): string;\n",
    );

    let listing = listing("glob", &config);
    let exports: Vec<(&str, EntityKind, Option<&str>)> = listing
        .exports
        .iter()
        .map(|e| (e.name.as_str(), e.kind, e.summary.as_deref()))
        .collect();
    assert_eq!(
        exports,
        vec![
            ("escape", EntityKind::Function, Some("Escapes glob magic characters.")),
            ("glob", EntityKind::Function, Some("Matches files.")),
        ]
    );

    let escape = describe("glob.escape", &config);
    assert_eq!(escape.kind, EntityKind::Function);
    let location = escape.location.expect("location");
    assert!(location.file.ends_with("index.d.ts"));
    assert!(location.file.contains("minimatch"), "{}", location.file);
}

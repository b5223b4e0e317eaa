//! Tests for argument handling, rendering and exit codes.

use clap::Parser;
use std::path::{Path, PathBuf};
use tsdoc_cli::{CliArgs, EXIT_FAILURE, EXIT_SUCCESS, OutputFormat, Renderer, report};
use tsdoc_lookup::{
    EntityKind, ExportEntry, ExportListing, Location, LookupConfig, LookupError, LookupOutput,
    MemberDescription, ParameterDescription, SignatureDescription, SymbolDescription,
};

fn member(name: &str, type_text: &str) -> MemberDescription {
    MemberDescription {
        name: name.to_string(),
        type_text: type_text.to_string(),
        optional: false,
        readonly: false,
        static_: false,
        summary: None,
    }
}

fn debounce() -> SymbolDescription {
    SymbolDescription {
        name: "debounce".to_string(),
        path: "lodash.debounce".to_string(),
        kind: EntityKind::Function,
        location: Some(Location {
            file: "node_modules/@types/lodash/index.d.ts".to_string(),
            line: 42,
        }),
        construct_signatures: Vec::new(),
        call_signatures: vec![SignatureDescription {
            text: "(func: Function, wait?: number): Function".to_string(),
            type_parameters: Vec::new(),
            parameters: vec![
                ParameterDescription {
                    name: "func".to_string(),
                    type_text: "Function".to_string(),
                    optional: false,
                    rest: false,
                    default_value: None,
                    doc: Some("The function to debounce.".to_string()),
                },
                ParameterDescription {
                    name: "wait".to_string(),
                    type_text: "number".to_string(),
                    optional: true,
                    rest: false,
                    default_value: None,
                    doc: None,
                },
            ],
            return_type: Some("Function".to_string()),
            returns_doc: Some("The debounced function.".to_string()),
        }],
        type_text: None,
        documentation: "Creates a debounced function.".to_string(),
        deprecated: false,
        deprecation_note: None,
        since: Some("0.1.0".to_string()),
        throws: Vec::new(),
        examples: vec!["const save = debounce(write, 100);\nsave();".to_string()],
        see: Vec::new(),
        other_tags: Vec::new(),
        members: vec![member("cancel", "(): void"), member("flush", "(): any")],
        more_members: 3,
    }
}

#[test]
fn test_parse_arguments() {
    let args = CliArgs::try_parse_from([
        "tsdoc",
        "Array.map",
        "--json",
        "--lib-dir",
        "/opt/ts/lib",
        "--cwd",
        "app",
        "--pretty",
        "false",
    ])
    .expect("valid arguments");
    assert_eq!(args.symbol.as_deref(), Some("Array.map"));
    assert!(args.json);
    assert_eq!(args.lib_dir, Some(PathBuf::from("/opt/ts/lib")));
    assert_eq!(args.cwd, Some(PathBuf::from("app")));
    assert_eq!(args.pretty, Some(false));

    let bare = CliArgs::try_parse_from(["tsdoc"]).expect("symbol is optional");
    assert_eq!(bare.symbol, None);
    assert!(!bare.json);
    assert_eq!(bare.pretty, None);

    assert!(CliArgs::try_parse_from(["tsdoc", "--bogus"]).is_err());
}

#[test]
fn test_lookup_config_joins_relative_dirs() {
    let args = CliArgs::try_parse_from(["tsdoc", "x", "--cwd", "src", "--lib-dir", "/abs/lib"])
        .expect("valid arguments");
    let config = args.lookup_config(Path::new("/work"));
    assert_eq!(config.cwd, PathBuf::from("/work/src"));
    assert_eq!(config.lib_dir, Some(PathBuf::from("/abs/lib")));

    let args = CliArgs::try_parse_from(["tsdoc", "x"]).expect("valid arguments");
    let config = args.lookup_config(Path::new("/work"));
    assert_eq!(config.cwd, PathBuf::from("/work"));
    assert_eq!(config.max_members, LookupConfig::default().max_members);
}

#[test]
fn test_not_found_report() {
    let outcome = report(
        Err(LookupError::not_found("Array.nope")),
        OutputFormat::Text { color: false },
    );
    assert_eq!(outcome.code, EXIT_FAILURE);
    assert_eq!(outcome.stdout, None);
    assert_eq!(outcome.stderr.as_deref(), Some("Symbol 'Array.nope' not found"));
}

#[test]
fn test_fault_reports() {
    let outcome = report(Err(LookupError::InvalidPath(String::new())), OutputFormat::Json);
    assert_eq!(outcome.code, EXIT_FAILURE);
    assert_eq!(outcome.stderr.as_deref(), Some("Error: invalid symbol path ''"));

    let internal = anyhow::anyhow!("disk on fire").context("failed to read /tmp/x");
    let outcome = report(Err(LookupError::Internal(internal)), OutputFormat::Json);
    assert_eq!(outcome.code, EXIT_FAILURE);
    assert_eq!(
        outcome.stderr.as_deref(),
        Some("Error: failed to read /tmp/x: disk on fire")
    );
}

#[test]
fn test_json_report() {
    let outcome = report(Ok(LookupOutput::Symbol(Box::new(debounce()))), OutputFormat::Json);
    assert_eq!(outcome.code, EXIT_SUCCESS);
    assert_eq!(outcome.stderr, None);

    let json: serde_json::Value =
        serde_json::from_str(outcome.stdout.as_deref().expect("stdout")).expect("valid json");
    assert_eq!(json["type"], "symbol");
    assert_eq!(json["name"], "debounce");
    assert_eq!(json["kind"], "function");
    assert_eq!(json["location"]["line"], 42);
    assert_eq!(json["call_signatures"][0]["parameters"][1]["optional"], true);
    assert_eq!(json["members"][0]["static"], false);
    assert_eq!(json["more_members"], 3);
}

#[test]
fn test_render_symbol_plain() {
    let text = Renderer::new(false).render_symbol(&debounce());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "debounce (function)");
    assert_eq!(lines[1], "node_modules/@types/lodash/index.d.ts:42");
    assert!(text.contains("\nCreates a debounced function.\n"));
    assert!(lines.contains(&"  debounce(func: Function, wait?: number): Function"));
    assert!(lines.contains(&"      func - The function to debounce."));
    assert!(lines.contains(&"      returns The debounced function."));
    assert!(lines.contains(&"  0.1.0"));
    assert!(lines.contains(&"  const save = debounce(write, 100);"));
    assert!(lines.contains(&"    save();"));
    assert!(lines.contains(&"  cancel(): void"));
    assert!(lines.contains(&"  ... and 3 more"));
    // Undocumented parameters add no line of their own
    assert!(!text.contains("    wait"));
    // No escape codes without color
    assert!(!text.contains('\u{1b}'));
}

#[test]
fn test_render_deprecated_and_members() {
    let mut description = debounce();
    description.deprecated = true;
    description.deprecation_note = Some("Use throttle instead.".to_string());
    description.members = vec![MemberDescription {
        readonly: true,
        static_: true,
        optional: true,
        summary: Some("Default wait.".to_string()),
        ..member("wait", "number")
    }];
    description.more_members = 0;

    let text = Renderer::new(false).render_symbol(&description);
    assert!(text.contains("\nDeprecated: Use throttle instead.\n"));
    assert!(text.contains("  static readonly wait?: number  // Default wait.\n"));
    assert!(!text.contains("more"));
}

#[test]
fn test_render_exports() {
    let listing = ExportListing {
        name: "utils".to_string(),
        location: None,
        exports: vec![
            ExportEntry {
                name: "formatDate".to_string(),
                kind: EntityKind::Function,
                summary: Some("Formats a date.".to_string()),
            },
            ExportEntry {
                name: "Id".to_string(),
                kind: EntityKind::TypeAlias,
                summary: None,
            },
        ],
        more_exports: 7,
    };
    let text = Renderer::new(false).render(&LookupOutput::Exports(listing));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "utils (module)");
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], "Exports");
    assert_eq!(lines[3], "  formatDate  function    Formats a date.");
    assert_eq!(lines[4], "  Id          type-alias");
    assert_eq!(lines[5], "  ... and 7 more");
}

#[test]
fn test_end_to_end_against_fake_lib() {
    let dir = tempfile::tempdir().expect("temp dir");
    let lib = dir.path().join("lib");
    std::fs::create_dir_all(&lib).expect("lib dir");
    std::fs::write(
        lib.join("lib.es5.d.ts"),
        "interface ArrayConstructor {\n    /** Checks for arrays. */\n    isArray(arg: any): arg is any[];\n}\ndeclare var Array: ArrayConstructor;\n",
    )
    .expect("write lib");

    let args = CliArgs::try_parse_from(["tsdoc", "Array.doesNotExist", "--lib-dir", "lib"])
        .expect("valid arguments");
    let config = args.lookup_config(dir.path());
    let symbol = args.symbol.as_deref().expect("symbol");

    let missing = report(tsdoc_lookup::lookup(symbol, &config), OutputFormat::Text { color: false });
    assert_eq!(missing.code, EXIT_FAILURE);
    assert_eq!(
        missing.stderr.as_deref(),
        Some("Symbol 'Array.doesNotExist' not found")
    );

    let found = report(
        tsdoc_lookup::lookup("Array.isArray", &config),
        OutputFormat::Text { color: false },
    );
    assert_eq!(found.code, EXIT_SUCCESS);
    let text = found.stdout.expect("stdout");
    assert!(text.starts_with("isArray (function)\n"));
    assert!(text.contains("isArray(arg: any): boolean"));
    assert!(text.contains("Checks for arrays."));
}

#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::io::IsTerminal;

use tsdoc_cli::tracing_config::init_tracing;
use tsdoc_cli::{CliArgs, EXIT_SUCCESS, OutputFormat, report};

fn main() -> Result<()> {
    // Initialize tracing if TSDOC_LOG or RUST_LOG is set (zero cost otherwise).
    init_tracing();

    let args = CliArgs::parse();
    let Some(symbol) = args.symbol.as_deref() else {
        CliArgs::command()
            .print_help()
            .context("failed to print help")?;
        return Ok(());
    };
    let current_dir = std::env::current_dir().context("failed to resolve current directory")?;
    let config = args.lookup_config(&current_dir);

    let format = if args.json {
        OutputFormat::Json
    } else {
        let color = args.pretty.unwrap_or_else(|| std::io::stdout().is_terminal());
        OutputFormat::Text { color }
    };

    tracing::debug!(symbol, ?format, cwd = %config.cwd.display(), "starting lookup");
    let outcome = report(tsdoc_lookup::lookup(symbol, &config), format);
    if let Some(stdout) = &outcome.stdout {
        if stdout.ends_with('\n') {
            print!("{stdout}");
        } else {
            println!("{stdout}");
        }
    }
    if let Some(stderr) = &outcome.stderr {
        eprintln!("{stderr}");
    }
    if outcome.code != EXIT_SUCCESS {
        std::process::exit(outcome.code);
    }
    Ok(())
}

use clap::Parser;
use std::path::{Path, PathBuf};
use tsdoc_lookup::LookupConfig;

/// CLI arguments for the tsdoc binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsdoc",
    version,
    about = "TypeScript documentation in the terminal",
    after_help = "Examples:\n  tsdoc Array.map\n  tsdoc express.Request\n  tsdoc utils.formatDate --cwd src"
)]
pub struct CliArgs {
    /// Dotted symbol path: a global (`Promise.all`), a package (`lodash.debounce`)
    /// or a local module (`utils.formatDate`).
    pub symbol: Option<String>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Directory holding the TypeScript `lib*.d.ts` files.
    #[arg(long = "lib-dir", value_name = "DIR")]
    pub lib_dir: Option<PathBuf>,

    /// Directory packages and local modules are searched from.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Color the output. Defaults to whether stdout is a terminal.
    #[arg(long)]
    pub pretty: Option<bool>,
}

impl CliArgs {
    /// Lookup configuration: environment defaults overridden by flags.
    /// A relative `--cwd` is taken relative to `current_dir`.
    pub fn lookup_config(&self, current_dir: &Path) -> LookupConfig {
        let cwd = match &self.cwd {
            Some(dir) => current_dir.join(dir),
            None => current_dir.to_path_buf(),
        };
        let config = LookupConfig::from_env().with_cwd(cwd);
        match &self.lib_dir {
            Some(dir) => config.with_lib_dir(current_dir.join(dir)),
            None => config,
        }
    }
}

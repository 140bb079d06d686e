//! sqlsync binary entry point.
//!
//! Parses the verb (defaulting to `sync`), loads settings from the
//! configured TOML file plus `SQLSYNC_*` environment overrides, installs
//! logging, and dispatches through the command registry. The process exits
//! non-zero on orchestration-level failures; per-migration failures inside
//! a run follow the failure-isolation contract and are reported by the
//! commands themselves.

use std::ffi::OsString;

use sqlsync_cli::{default_registry, CommandRegistry};
use sqlsync_core::logging::setup_logging;
use sqlsync_core::settings_loader;

#[tokio::main]
async fn main() {
    std::process::exit(run().await);
}

/// Inserts the default `sync` verb when the invocation names no verb, so
/// flag-only invocations like `sqlsync --config prod.toml` still run a
/// sync. Help and version requests are left alone.
fn ensure_default_verb(args: &mut Vec<OsString>, registry: &CommandRegistry) {
    let names_verb_or_help = args.iter().skip(1).any(|arg| {
        arg.to_str().is_some_and(|s| {
            registry.get(s).is_some()
                || matches!(s, "help" | "--help" | "-h" | "--version" | "-V")
        })
    });
    if !names_verb_or_help {
        args.insert(1, OsString::from("sync"));
    }
}

fn cli_with_global_args(registry: &CommandRegistry) -> clap::Command {
    registry.build_cli().arg(
        clap::Arg::new("config")
            .long("config")
            .value_name("PATH")
            .global(true)
            .default_value("sqlsync.toml")
            .help("Path to the settings file"),
    )
}

async fn run() -> i32 {
    let registry = default_registry();
    let mut args: Vec<OsString> = std::env::args_os().collect();
    ensure_default_verb(&mut args, &registry);

    let matches = match cli_with_global_args(&registry).try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) => {
            // Unknown verbs and bad flags print usage and run nothing;
            // --help and --version land here too, with a zero exit.
            let is_usage_error = e.use_stderr();
            let _ = e.print();
            return i32::from(is_usage_error);
        }
    };

    let config_path = matches
        .get_one::<String>("config")
        .map_or("sqlsync.toml", String::as_str);
    let settings = match settings_loader::load(config_path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };
    setup_logging(&settings);

    match registry.execute(&matches, &settings).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{e}");
            1
        }
    }
}

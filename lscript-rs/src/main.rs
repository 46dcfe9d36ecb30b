use std::process::ExitCode;

use lscript::cli::{self, ConfigFile, Source};
use lscript::config::{self, ProcessorConfig};
use lscript::Interpreter;

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("lscript: {e}");
            eprintln!("Usage: lscript [-dv] [-f[<file>]] <script>");
            eprintln!("       lscript [-dv] [-f[<file>]] -c<source>");
            return ExitCode::from(2);
        }
    };

    let default_filter = if args.debug { "trace" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    // ── Settings ──────────────────────────────────────────────────────────────
    let config = match &args.config {
        ConfigFile::Skip => ProcessorConfig::default(),
        ConfigFile::Explicit(path) => match load_rc(path) {
            Some(cfg) => cfg,
            None => return ExitCode::FAILURE,
        },
        ConfigFile::Search => cli::find_user_config()
            .and_then(|path| load_rc(&path))
            .unwrap_or_default(),
    };

    let mut interp = match Interpreter::with_config(config) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("lscript: {e}");
            return ExitCode::FAILURE;
        }
    };

    // ── Run ───────────────────────────────────────────────────────────────────
    let result = match &args.source {
        Source::File(path) => interp.run_file(path),
        Source::Inline(src) => interp.run_source(src),
        Source::None => Ok(()),
    };

    // Output echoed before a failure is still shown.
    for line in interp.take_output() {
        println!("{line}");
    }
    if args.dump_vars {
        for (name, value) in interp.vars().sorted() {
            println!("{name} = {value}");
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lscript: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Load an rc file, printing per-line problems as warnings.
fn load_rc(path: &std::path::Path) -> Option<ProcessorConfig> {
    match config::load_file(path) {
        Ok((cfg, errors)) => {
            for e in errors {
                eprintln!("lscript: warning: {}: {e}", path.display());
            }
            log::debug!("loaded settings from {}", path.display());
            Some(cfg)
        }
        Err(e) => {
            eprintln!("lscript: {}: {e}", path.display());
            None
        }
    }
}

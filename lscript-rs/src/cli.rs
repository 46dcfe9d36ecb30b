//! Command-line argument parsing.
//!
//! Usage:
//!   lscript [-dv] [-f[<file>]] <script>
//!   lscript [-dv] [-f[<file>]] -c<source>

use std::path::PathBuf;

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Where the rc file comes from.
    pub config: ConfigFile,
    /// What to run.
    pub source: Source,
    /// Print all variables after the run (`-v`).
    pub dump_vars: bool,
    /// Trace logging (`-d`).
    pub debug: bool,
}

/// How to choose the rc file.
#[derive(Debug, Default)]
pub enum ConfigFile {
    /// `$LSCRIPTRC`, the platform config dir, then `./.lscriptrc` (default).
    #[default]
    Search,
    /// `-f` with no file argument: use built-in defaults.
    Skip,
    /// `-f<file>`: load this specific file.
    Explicit(PathBuf),
}

/// The script to run.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum Source {
    #[default]
    None,
    /// A script file path (positional argument).
    File(String),
    /// Inline source text (`-c<source>`).
    Inline(String),
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(raw.get(1..).unwrap_or_default())
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        // `--` ends flag processing.
        if arg == "--" {
            i += 1;
            positional.extend(argv[i..].iter().cloned());
            break;
        }

        if !arg.starts_with('-') || arg == "-" {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        // Flag argument: iterate over characters after the leading `-`.
        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                'd' => args.debug = true,
                'v' => args.dump_vars = true,

                // -f[<file>]
                'f' => {
                    if j + 1 < chars.len() {
                        let file: String = chars[j + 1..].iter().collect();
                        args.config = ConfigFile::Explicit(PathBuf::from(file));
                        j = chars.len();
                    } else if i + 1 < argv.len() && !argv[i + 1].starts_with('-') && positional_follows(argv, i + 1) {
                        i += 1;
                        args.config = ConfigFile::Explicit(PathBuf::from(&argv[i]));
                    } else {
                        args.config = ConfigFile::Skip;
                    }
                }

                // -c<source>
                'c' => {
                    let src = if j + 1 < chars.len() {
                        let s: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        s
                    } else if i + 1 < argv.len() {
                        i += 1;
                        argv[i].clone()
                    } else {
                        return Err("-c requires a source argument".to_owned());
                    };
                    args.source = Source::Inline(src);
                }

                c => return Err(format!("unknown option: -{c}")),
            }
            j += 1;
        }
        i += 1;
    }

    match (positional.len(), &args.source) {
        (0, Source::None) => return Err("no script given".to_owned()),
        (0, _) => {}
        (1, Source::None) => args.source = Source::File(positional.remove(0)),
        (1, _) => return Err("give either a script file or -c, not both".to_owned()),
        (n, _) => return Err(format!("too many arguments ({n})")),
    }

    Ok(args)
}

/// `-f <file>` only takes the next word when something is left to be the
/// script; `lscript -f prog.ls` means "skip config, run prog.ls".
fn positional_follows(argv: &[String], file_at: usize) -> bool {
    argv[file_at + 1..]
        .iter()
        .any(|a| !a.starts_with('-') || a.starts_with("-c"))
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Search for the user rc file.  Returns the first path that exists.
pub fn find_user_config() -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(p) = std::env::var_os("LSCRIPTRC") {
        candidates.push(PathBuf::from(p));
    }
    if let Some(dirs) = directories::ProjectDirs::from("", "", "lscript") {
        candidates.push(dirs.config_dir().join("config"));
    }
    candidates.push(PathBuf::from("./.lscriptrc"));
    candidates.into_iter().find(|p| p.is_file())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn script_positional() {
        let a = parse_argv(&argv(&["prog.ls"])).unwrap();
        assert_eq!(a.source, Source::File("prog.ls".into()));
        assert!(matches!(a.config, ConfigFile::Search));
        assert!(!a.debug && !a.dump_vars);
    }

    #[test]
    fn no_script_is_error() {
        assert!(parse_argv(&argv(&[])).is_err());
        assert!(parse_argv(&argv(&["-d"])).is_err());
    }

    #[test]
    fn bool_flags() {
        let a = parse_argv(&argv(&["-d", "-v", "x.ls"])).unwrap();
        assert!(a.debug && a.dump_vars);
    }

    #[test]
    fn combined_bool_flags() {
        let a = parse_argv(&argv(&["-dv", "x.ls"])).unwrap();
        assert!(a.debug && a.dump_vars);
    }

    #[test]
    fn inline_embedded() {
        let a = parse_argv(&argv(&["-cset a, 1"])).unwrap();
        assert_eq!(a.source, Source::Inline("set a, 1".into()));
    }

    #[test]
    fn inline_separate() {
        let a = parse_argv(&argv(&["-c", "set a, 1"])).unwrap();
        assert_eq!(a.source, Source::Inline("set a, 1".into()));
    }

    #[test]
    fn inline_and_file_conflict() {
        assert!(parse_argv(&argv(&["-c", "set a, 1", "x.ls"])).is_err());
    }

    #[test]
    fn config_skip() {
        let a = parse_argv(&argv(&["-f", "prog.ls"])).unwrap();
        assert!(matches!(a.config, ConfigFile::Skip));
        assert_eq!(a.source, Source::File("prog.ls".into()));
    }

    #[test]
    fn config_explicit_embedded() {
        let a = parse_argv(&argv(&["-fmyrc", "prog.ls"])).unwrap();
        assert!(matches!(&a.config, ConfigFile::Explicit(p) if p == &PathBuf::from("myrc")));
    }

    #[test]
    fn config_explicit_separate() {
        let a = parse_argv(&argv(&["-f", "myrc", "prog.ls"])).unwrap();
        assert!(matches!(&a.config, ConfigFile::Explicit(p) if p == &PathBuf::from("myrc")));
        assert_eq!(a.source, Source::File("prog.ls".into()));
    }

    #[test]
    fn config_separate_before_inline() {
        let a = parse_argv(&argv(&["-f", "myrc", "-c", "set a,1"])).unwrap();
        assert!(matches!(&a.config, ConfigFile::Explicit(p) if p == &PathBuf::from("myrc")));
        assert_eq!(a.source, Source::Inline("set a,1".into()));
    }

    #[test]
    fn double_dash_ends_flags() {
        let a = parse_argv(&argv(&["--", "-odd-name.ls"])).unwrap();
        assert_eq!(a.source, Source::File("-odd-name.ls".into()));
    }

    #[test]
    fn too_many_positional() {
        assert!(parse_argv(&argv(&["a.ls", "b.ls"])).is_err());
    }

    #[test]
    fn unknown_flag() {
        assert!(parse_argv(&argv(&["-z", "a.ls"])).is_err());
    }
}

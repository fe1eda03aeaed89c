mod config;
mod edit;
mod fixer;
mod format;
mod index;
mod logging;
mod symbol;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing::{debug, info};

use config::{Config, DatabaseSpec};
use edit::{Replacement, apply_to_buffer, apply_to_disk};
use fixer::{FixerOptions, FixerResult, IncludeFixer};
use format::{ClangFormat, reformat_files};
use logging::{LogConfig, init_logging};
use symbol::{TranslationUnitSignals, UnresolvedSymbol, load_signals};

/// Symbol database backends
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum DatabaseFormat {
    /// Hard-coded mapping supplied with --input
    Fixed,
    /// YAML database produced by a symbol-indexing run
    #[default]
    Yaml,
}

/// CLI arguments for the include fixer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Symbol database format
    #[arg(long, value_enum, default_value_t = DatabaseFormat::Yaml)]
    db: DatabaseFormat,

    /// Mapping string (fixed) or database path (yaml); with yaml and no
    /// value, the database is discovered next to the first source file or
    /// in one of its ancestors
    #[arg(long, value_name = "STRING|PATH")]
    input: Option<String>,

    /// JSON file with unresolved-symbol signals from the analysis front-end
    #[arg(long, value_name = "FILE")]
    unresolved_symbols: PathBuf,

    /// Whether to minimize added include paths
    #[arg(long, value_name = "BOOL", default_value_t = true, action = clap::ArgAction::Set)]
    minimize_paths: bool,

    /// Include search path used for minimization (repeatable)
    #[arg(short = 'I', value_name = "DIR")]
    include_paths: Vec<PathBuf>,

    /// Reduce terminal output
    #[arg(short, long)]
    quiet: bool,

    /// Override the single source file's content with stdin and print the
    /// transformed buffer instead of writing to disk (editor integration)
    #[arg(long)]
    stdin: bool,

    /// Fallback style for reformatting after inserting new headers if there
    /// is no clang-format config file found
    #[arg(long, value_name = "NAME", default_value = "llvm")]
    style: String,

    /// Log level (overrides RUST_LOG env var)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log file path (overrides INCLUDE_FIXER_LOG_FILE env var)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Source files to fix
    #[arg(value_name = "FILE", required = true)]
    source_files: Vec<PathBuf>,
}

impl Args {
    fn to_config(&self) -> Result<Config, String> {
        let database = match self.db {
            DatabaseFormat::Fixed => DatabaseSpec::Fixed {
                mapping: self
                    .input
                    .clone()
                    .ok_or("--db fixed requires --input with a mapping string")?,
            },
            DatabaseFormat::Yaml => DatabaseSpec::Yaml {
                path: self.input.clone().map(PathBuf::from),
            },
        };

        Ok(Config {
            database,
            minimize_paths: self.minimize_paths,
            include_paths: self.include_paths.clone(),
            quiet: self.quiet,
            style: self.style.clone(),
            stdin_mode: self.stdin,
        })
    }
}

/// Signals of the unit whose main file is `file`
///
/// The front-end may spell paths differently than the command line did, so
/// absolute forms are compared when the exact spelling does not match.
fn signals_for<'a>(
    units: &'a [TranslationUnitSignals],
    file: &Path,
) -> &'a [UnresolvedSymbol] {
    let exact = units.iter().find(|u| u.file == file);
    let unit = exact.or_else(|| {
        let wanted = std::path::absolute(file).unwrap_or_else(|_| file.to_path_buf());
        units.iter().find(|u| {
            std::path::absolute(&u.file).unwrap_or_else(|_| u.file.clone()) == wanted
        })
    });
    unit.map(|u| u.symbols.as_slice()).unwrap_or(&[])
}

/// Report the chosen headers the way editors scrape them
fn report_headers(result: &FixerResult, quiet: bool) {
    if quiet {
        return;
    }
    for header in &result.headers {
        eprintln!("Added #include {header}");
    }
}

/// Surface occurrences that deliberately produced no edit
fn report_skipped(result: &FixerResult) {
    for skipped in &result.ambiguous {
        info!(
            "'{}' at offset {} is ambiguous between {:?}, no include added",
            skipped.name, skipped.offset, skipped.candidate_headers
        );
    }
    for skipped in &result.unmatched {
        debug!(
            "'{}' at offset {} has no known header",
            skipped.name, skipped.offset
        );
    }
}

/// Single-buffer editor mode: resolve against the substituted buffer and
/// print the transformed text
fn run_stdin_mode(
    fixer: &IncludeFixer,
    file: &Path,
    buffer: &str,
    units: &[TranslationUnitSignals],
    quiet: bool,
) -> i32 {
    let result = fixer.fix_translation_unit(file, buffer, signals_for(units, file));
    report_headers(&result, quiet);
    report_skipped(&result);

    match apply_to_buffer(buffer, &result.replacements) {
        Ok(transformed) => {
            print!("{transformed}");
            0
        }
        Err(e) => {
            eprintln!("Failed to apply edits to {}: {}", file.display(), e);
            1
        }
    }
}

/// Batch mode: resolve every listed file and persist the edits
fn run_disk_mode(
    fixer: &IncludeFixer,
    source_files: &[PathBuf],
    units: &[TranslationUnitSignals],
    quiet: bool,
    style: &str,
) -> i32 {
    let mut edits_by_file: BTreeMap<PathBuf, Vec<Replacement>> = BTreeMap::new();
    let mut read_failures = 0;

    for file in source_files {
        let code = match std::fs::read_to_string(file) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Failed to read {}: {}", file.display(), e);
                read_failures += 1;
                continue;
            }
        };

        let result = fixer.fix_translation_unit(file, &code, signals_for(units, file));
        report_headers(&result, quiet);
        report_skipped(&result);
        edits_by_file.insert(result.file, result.replacements);
    }

    let report = apply_to_disk(&edits_by_file);
    for (file, error) in &report.failed {
        eprintln!("Failed to rewrite {}: {}", file.display(), error);
    }

    reformat_files(&ClangFormat::new(style), &report.written);

    if read_failures == 0 && report.success() { 0 } else { 1 }
}

fn run(args: &Args) -> i32 {
    if args.stdin && args.source_files.len() != 1 {
        eprintln!("--stdin expects exactly one source file");
        return 1;
    }

    // Read the substituted buffer first: an empty buffer short-circuits the
    // whole run, including database construction.
    let mut buffer = String::new();
    if args.stdin {
        if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
            eprintln!("Failed to read stdin: {e}");
            return 1;
        }
        if buffer.is_empty() {
            return 0;
        }
    }

    let config = match args.to_config() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            return 1;
        }
    };

    let manager = match config.build_index_manager(&args.source_files[0]) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Couldn't build symbol database: {e}");
            return 1;
        }
    };

    let units = match load_signals(&args.unresolved_symbols) {
        Ok(units) => units,
        Err(e) => {
            eprintln!("Couldn't load unresolved symbols: {e}");
            return 1;
        }
    };

    info!(
        "Resolving {} translation unit(s) against {} index(es)",
        args.source_files.len(),
        manager.index_count()
    );

    let options = FixerOptions {
        minimize_paths: config.minimize_paths,
        include_paths: config.include_paths.clone(),
    };
    let fixer = IncludeFixer::new(&manager, options);

    if config.stdin_mode {
        run_stdin_mode(&fixer, &args.source_files[0], &buffer, &units, config.quiet)
    } else {
        run_disk_mode(
            &fixer,
            &args.source_files,
            &units,
            config.quiet,
            &config.style,
        )
    }
}

fn main() {
    let args = Args::parse();

    let log_config =
        LogConfig::from_env().with_overrides(args.log_level.clone(), args.log_file.clone());
    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    std::process::exit(run(&args));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signals_for_matches_exact_path() {
        let units = vec![TranslationUnitSignals {
            file: PathBuf::from("src/a.cpp"),
            symbols: vec![UnresolvedSymbol {
                name: "foo".to_string(),
                offset: 0,
                length: 3,
                template_args: None,
            }],
        }];

        assert_eq!(signals_for(&units, Path::new("src/a.cpp")).len(), 1);
        assert!(signals_for(&units, Path::new("src/b.cpp")).is_empty());
    }

    #[test]
    fn test_signals_for_matches_absolute_form() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.cpp");
        let units = vec![TranslationUnitSignals {
            file: file.clone(),
            symbols: vec![UnresolvedSymbol {
                name: "foo".to_string(),
                offset: 0,
                length: 3,
                template_args: None,
            }],
        }];

        // The CLI was given the same file via a redundant spelling.
        let spelled = dir.path().join(".").join("a.cpp");
        assert_eq!(signals_for(&units, &spelled).len(), 1);
    }

    #[test]
    fn test_args_to_config_fixed_requires_input() {
        let args = Args::parse_from([
            "cpp-include-fixer",
            "--db",
            "fixed",
            "--unresolved-symbols",
            "signals.json",
            "main.cpp",
        ]);
        assert!(args.to_config().is_err());
    }

    #[test]
    fn test_args_to_config_yaml_path_passthrough() {
        let args = Args::parse_from([
            "cpp-include-fixer",
            "--input",
            "db.yaml",
            "--unresolved-symbols",
            "signals.json",
            "main.cpp",
        ]);
        let config = args.to_config().unwrap();
        match config.database {
            DatabaseSpec::Yaml { path } => assert_eq!(path, Some(PathBuf::from("db.yaml"))),
            other => panic!("Expected yaml database, got {other:?}"),
        }
        assert!(config.minimize_paths);
        assert_eq!(config.style, "llvm");
    }

    #[test]
    fn test_args_minimize_paths_can_be_disabled() {
        let args = Args::parse_from([
            "cpp-include-fixer",
            "--minimize-paths",
            "false",
            "--unresolved-symbols",
            "signals.json",
            "main.cpp",
        ]);
        assert!(!args.to_config().unwrap().minimize_paths);
    }
}

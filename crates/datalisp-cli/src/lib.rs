//! Shared plumbing for the `datalisp2json` and `json2datalisp` binaries.

use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser};
use datalisp_model::Container;
use datalisp_native::NativeError;
use datalisp_read::{Diagnostics, Reader};
use datalisp_write::{WriteError, WriteOptions};
use thiserror::Error;

/// Process exit codes, one per failure class.
pub mod exit {
    pub const SUCCESS: i32 = 0;
    pub const USAGE: i32 = -1;
    pub const READ: i32 = -2;
    pub const PARSE: i32 = -3;
    pub const BUILD: i32 = -4;
    pub const WRITE: i32 = -5;
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {diagnostics}", .path.display())]
    Parse { path: PathBuf, diagnostics: Diagnostics },

    #[error("failed to decode {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: NativeError,
    },

    #[error("failed to build {}: {diagnostics}", .path.display())]
    Build { path: PathBuf, diagnostics: Diagnostics },

    #[error("failed to encode JSON")]
    Encode(#[source] NativeError),

    #[error("failed to generate DataLisp text")]
    Generate(#[source] WriteError),

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Read { .. } => exit::READ,
            CliError::Parse { .. } | CliError::Decode { .. } => exit::PARSE,
            CliError::Build { .. } | CliError::Encode(_) | CliError::Generate(_) => exit::BUILD,
            CliError::Write { .. } => exit::WRITE,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct Verbosity {
    /// More output: -v for debug, -vv for trace.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Verbosity {
    pub fn level(&self) -> tracing::Level {
        match (self.quiet, self.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::INFO,
            (false, 1) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        }
    }
}

/// Log to stderr at the requested level.
pub fn init_logging(verbosity: &Verbosity) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(verbosity.level())
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

#[derive(Debug, Parser)]
#[command(name = "datalisp2json", version, about = "Convert DataLisp text to JSON")]
pub struct ToJsonArgs {
    /// DataLisp source file.
    pub input: PathBuf,

    /// JSON file to write.
    #[arg(default_value = "output.json")]
    pub output: PathBuf,

    /// Write JSON on a single line.
    #[arg(long)]
    pub compact: bool,

    /// Print the parsed syntax tree to stdout before converting.
    #[arg(long)]
    pub dump: bool,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

#[derive(Debug, Parser)]
#[command(name = "json2datalisp", version, about = "Convert JSON to DataLisp text")]
pub struct ToDataLispArgs {
    /// JSON source file.
    pub input: PathBuf,

    /// DataLisp file to write.
    #[arg(default_value = "output.dl")]
    pub output: PathBuf,

    /// Spaces per nesting level.
    #[arg(long, default_value_t = 2)]
    pub indent: usize,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

/// DataLisp file to JSON file.
pub fn datalisp_to_json(args: &ToJsonArgs) -> Result<(), CliError> {
    let text = read_input(&args.input)?;

    let reader = Reader::new();
    let parsed = reader.parse(&text);
    parsed.diagnostics.emit();
    if parsed.diagnostics.has_errors() {
        return Err(CliError::Parse {
            path: args.input.clone(),
            diagnostics: parsed.diagnostics,
        });
    }
    if args.dump {
        print!("{}", parsed.tree.dump());
    }

    let mut container = Container::new();
    let diagnostics = reader.build(&parsed.tree, &mut container);
    diagnostics.emit();
    if diagnostics.has_errors() {
        return Err(CliError::Build {
            path: args.input.clone(),
            diagnostics,
        });
    }

    let mut json = datalisp_native::export_json(&container, !args.compact).map_err(CliError::Encode)?;
    json.push('\n');
    write_output(&args.output, &json)?;

    tracing::info!(
        input = %args.input.display(),
        output = %args.output.display(),
        groups = container.len(),
        "converted"
    );
    Ok(())
}

/// JSON file to DataLisp file.
pub fn json_to_datalisp(args: &ToDataLispArgs) -> Result<(), CliError> {
    let text = read_input(&args.input)?;

    let container = datalisp_native::import_json(&text).map_err(|source| CliError::Decode {
        path: args.input.clone(),
        source,
    })?;
    let options = WriteOptions { indent: args.indent };
    let output = datalisp_write::generate_with(&container, &options).map_err(CliError::Generate)?;
    write_output(&args.output, &output)?;

    tracing::info!(
        input = %args.input.display(),
        output = %args.output.display(),
        groups = container.len(),
        "converted"
    );
    Ok(())
}

/// Log the error with its source chain and return its exit code.
pub fn report(err: CliError) -> i32 {
    let code = err.exit_code();
    tracing::error!("{:#}", anyhow::Error::new(err));
    code
}

/// Exit after a command-line parse failure. Help and version requests
/// exit successfully.
pub fn exit_on_usage(err: clap::Error) -> ! {
    let code = if err.use_stderr() { exit::USAGE } else { exit::SUCCESS };
    let _ = err.print();
    std::process::exit(code)
}

fn read_input(path: &Path) -> Result<String, CliError> {
    tracing::debug!(path = %path.display(), "reading input");
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let missing = || io::Error::new(io::ErrorKind::NotFound, "missing");
        let path = PathBuf::from("x");
        let codes = [
            CliError::Read { path: path.clone(), source: missing() }.exit_code(),
            CliError::Parse { path: path.clone(), diagnostics: Diagnostics::new() }.exit_code(),
            CliError::Generate(WriteError::NonFiniteFloat(f64::NAN)).exit_code(),
            CliError::Write { path, source: missing() }.exit_code(),
        ];
        assert_eq!(codes, [exit::READ, exit::PARSE, exit::BUILD, exit::WRITE]);
        assert!(!codes.contains(&exit::USAGE));
    }

    #[test]
    fn test_verbosity_levels() {
        let level = |args: &[&str]| {
            let args = ToJsonArgs::try_parse_from(args).unwrap();
            args.verbosity.level()
        };
        assert_eq!(level(&["datalisp2json", "in.dl"]), tracing::Level::INFO);
        assert_eq!(level(&["datalisp2json", "in.dl", "-v"]), tracing::Level::DEBUG);
        assert_eq!(level(&["datalisp2json", "in.dl", "-vv"]), tracing::Level::TRACE);
        assert_eq!(level(&["datalisp2json", "in.dl", "-q"]), tracing::Level::ERROR);
        assert!(ToJsonArgs::try_parse_from(["datalisp2json", "in.dl", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_default_outputs() {
        let args = ToJsonArgs::try_parse_from(["datalisp2json", "in.dl"]).unwrap();
        assert_eq!(args.output, PathBuf::from("output.json"));

        let args = ToDataLispArgs::try_parse_from(["json2datalisp", "in.json"]).unwrap();
        assert_eq!(args.output, PathBuf::from("output.dl"));
        assert_eq!(args.indent, 2);
    }

    #[test]
    fn test_error_chain() {
        let err = CliError::Read {
            path: PathBuf::from("in.dl"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let text = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(text, "failed to read in.dl: no such file");
    }
}

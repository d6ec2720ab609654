use std::fmt;
use std::path::PathBuf;

use quiz_core::model::ModuleId;
use services::DEFAULT_PASS_MARK;
use storage::json_dir::DEFAULT_FILE_NAME;

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidModule { raw: String },
    InvalidPassMark { raw: String },
    EmptyPath { flag: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidModule { raw } => write!(f, "invalid --module value: {raw}"),
            ArgsError::InvalidPassMark { raw } => {
                write!(f, "invalid --pass-mark value: {raw} (expected 0-100)")
            }
            ArgsError::EmptyPath { flag } => write!(f, "{flag} cannot be empty"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_pass_mark(raw: String) -> Result<f64, ArgsError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if (0.0..=100.0).contains(&value) => Ok(value),
        _ => Err(ArgsError::InvalidPassMark { raw }),
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [play] [--data <dir>] [--module <n>] [--file <name>] [--pass-mark <percent>]");
    eprintln!("  quiz list   [--data <dir>] [--file <name>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --data data");
    eprintln!("  --module 1");
    eprintln!("  --file {DEFAULT_FILE_NAME}");
    eprintln!("  --pass-mark {DEFAULT_PASS_MARK}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DATA_DIR, QUIZ_MODULE, QUIZ_FILE, QUIZ_PASS_MARK, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    List,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub command: Command,
    pub data_dir: PathBuf,
    pub module: ModuleId,
    pub file_name: String,
    pub pass_mark: f64,
}

/// Where unset flags fall back to before the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct EnvDefaults {
    pub data_dir: Option<String>,
    pub module: Option<String>,
    pub file_name: Option<String>,
    pub pass_mark: Option<String>,
}

impl EnvDefaults {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("QUIZ_DATA_DIR").ok(),
            module: std::env::var("QUIZ_MODULE").ok(),
            file_name: std::env::var("QUIZ_FILE").ok(),
            pass_mark: std::env::var("QUIZ_PASS_MARK").ok(),
        }
    }
}

impl Args {
    /// Parse argv (without the program name). `Ok(None)` means help was shown.
    pub fn parse(
        argv: impl IntoIterator<Item = String>,
        env: EnvDefaults,
    ) -> Result<Option<Self>, ArgsError> {
        let mut args = argv.into_iter().peekable();

        let command = match args.peek().map(String::as_str) {
            Some(first) if !first.starts_with('-') => {
                let command = Command::from_arg(first)
                    .ok_or_else(|| ArgsError::UnknownArg(first.to_string()))?;
                args.next();
                command
            }
            _ => Command::Play,
        };

        let mut data_dir = PathBuf::from(env.data_dir.unwrap_or_else(|| "data".into()));
        let mut module = match env.module {
            Some(raw) => raw
                .parse::<ModuleId>()
                .map_err(|_| ArgsError::InvalidModule { raw })?,
            None => ModuleId::new(1),
        };
        let mut file_name = env.file_name.unwrap_or_else(|| DEFAULT_FILE_NAME.into());
        let mut pass_mark = match env.pass_mark {
            Some(raw) => parse_pass_mark(raw)?,
            None => DEFAULT_PASS_MARK,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data" => {
                    let value = require_value(&mut args, "--data")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::EmptyPath { flag: "--data" });
                    }
                    data_dir = PathBuf::from(value);
                }
                "--module" => {
                    let value = require_value(&mut args, "--module")?;
                    module = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidModule { raw: value.clone() })?;
                }
                "--file" => {
                    let value = require_value(&mut args, "--file")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::EmptyPath { flag: "--file" });
                    }
                    file_name = value;
                }
                "--pass-mark" => {
                    pass_mark = parse_pass_mark(require_value(&mut args, "--pass-mark")?)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    return Ok(None);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(Self {
            command,
            data_dir,
            module,
            file_name,
            pass_mark,
        }))
    }
}

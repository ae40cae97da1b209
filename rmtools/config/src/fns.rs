use chrono::{DateTime, Local};
use flate2::read::MultiGzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

use std::fmt::Debug;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::GZ_SUFFIX;

// os
#[cfg(not(windows))]
const TICK_SETTINGS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ";
#[cfg(windows)]
const TICK_SETTINGS: &str = r"+-x| ";

const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// return a pre-configured progress bar
pub fn get_progress_bar(length: u64, msg: &str) -> ProgressBar {
    let progressbar_style = ProgressStyle::default_spinner()
        .tick_chars(TICK_SETTINGS)
        .template(" {spinner} {msg:<30} {wide_bar} {pos}/{len} ")
        .expect("no template error");

    let progress_bar = ProgressBar::new(length);

    progress_bar.set_style(progressbar_style);
    progress_bar.set_message(msg.to_owned());

    progress_bar
}

/// true when the file name announces a gzip stream
pub fn is_gzipped<P: AsRef<Path>>(file: P) -> bool {
    file.as_ref()
        .file_name()
        .and_then(|f| f.to_str())
        .is_some_and(|f| f.ends_with(GZ_SUFFIX))
}

/// read a whole table into memory, decompressing .gz inputs on the fly
pub fn reader<P: AsRef<Path> + Debug>(file: P) -> std::io::Result<String> {
    let mut handle = File::open(&file)?;
    let mut contents = String::new();

    if is_gzipped(&file) {
        MultiGzDecoder::new(handle).read_to_string(&mut contents)?;
    } else {
        handle.read_to_string(&mut contents)?;
    }

    Ok(contents)
}

/// drop trailing separators from a directory path, keeping the root intact
pub fn strip_trailing_separators(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let stripped = raw.trim_end_matches(['/', MAIN_SEPARATOR]);

    if stripped.is_empty() && !raw.is_empty() {
        PathBuf::from(MAIN_SEPARATOR.to_string())
    } else {
        PathBuf::from(stripped)
    }
}

/// render a counter with thousands separators [1234567 -> 1,234,567]
pub fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

/// program name and start time, computed once per run
#[derive(Debug, Clone)]
pub struct Session {
    prog: String,
    started: DateTime<Local>,
}

impl Session {
    pub fn new<S: Into<String>>(prog: S) -> Self {
        Self {
            prog: prog.into(),
            started: Local::now(),
        }
    }

    /// name the session after argv[0], falling back to `default` when absent
    pub fn from_env(default: &str) -> Self {
        let prog = std::env::args()
            .next()
            .and_then(|arg| {
                Path::new(&arg)
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| default.to_string());

        Self::new(prog)
    }

    pub fn prog(&self) -> &str {
        &self.prog
    }

    pub fn started_on(&self) -> String {
        self.started.format(TIMESTAMP).to_string()
    }

    pub fn now(&self) -> String {
        Local::now().format(TIMESTAMP).to_string()
    }
}

/// argument checker for all tools
pub trait ArgCheck {
    fn check(&self) -> Result<(), CliError> {
        self.validate_args()
    }

    fn validate_args(&self) -> Result<(), CliError> {
        self.check_outdir()?;
        self.check_inputs()?;

        Ok(())
    }

    fn check_outdir(&self) -> Result<(), CliError> {
        validate_dir(&self.get_outdir())
    }

    fn check_inputs(&self) -> Result<(), CliError> {
        for input in self.get_inputs() {
            validate(input)?;
        }
        Ok(())
    }

    fn get_outdir(&self) -> PathBuf;
    fn get_inputs(&self) -> Vec<&PathBuf>;
}

/// error handling for CLI
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// input file validation
pub fn validate(arg: &PathBuf) -> Result<(), CliError> {
    if !arg.exists() {
        return Err(CliError::InvalidInput(format!(
            "ERROR: {:?} not found",
            arg
        )));
    }

    if !arg.is_file() {
        return Err(CliError::InvalidInput(format!(
            "ERROR: {:?} is not a file",
            arg
        )));
    }

    std::fs::metadata(arg)?;
    Ok(())
}

/// output directory validation
pub fn validate_dir(arg: &PathBuf) -> Result<(), CliError> {
    if !arg.exists() {
        return Err(CliError::InvalidInput(format!(
            "ERROR: {:?} not found",
            arg
        )));
    }

    if !arg.is_dir() {
        return Err(CliError::InvalidInput(format!(
            "ERROR: {:?} is not a directory",
            arg
        )));
    }

    Ok(())
}

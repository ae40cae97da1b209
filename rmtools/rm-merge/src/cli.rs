use clap::Parser;
use config::{strip_trailing_separators, ArgCheck, DEFAULT_MIN_LENGTH, MERGED_OUTPUT};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "rm-merge")]
#[command(about = "Parse and merge the output from RepeatMasker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[arg(
        short = 'c',
        long = "cross-match",
        required = true,
        value_name = "PATH",
        help = "Path to the cross match (*.out) table from RepeatMasker [.gz accepted]"
    )]
    pub cross_match: PathBuf,

    #[arg(
        short = 'd',
        long = "divsum",
        required = true,
        value_name = "PATH",
        help = "Path to the divergence summary (*.divsum) table from RepeatMasker [.gz accepted]"
    )]
    pub divsum: PathBuf,

    #[arg(
        short = 'o',
        long = "outdir",
        required = false,
        value_name = "PATH",
        help = "Output directory path",
        default_value(".")
    )]
    pub outdir: PathBuf,

    #[arg(
        short = 'm',
        long = "min-length",
        required = false,
        value_name = "LEN",
        help = "Minimum length of well characterized bases (wellCharLen) needed to keep a repeat",
        default_value_t = DEFAULT_MIN_LENGTH
    )]
    pub min_length: u64,
}

impl ArgCheck for Args {
    fn get_outdir(&self) -> PathBuf {
        self.outdir()
    }

    fn get_inputs(&self) -> Vec<&PathBuf> {
        vec![&self.cross_match, &self.divsum]
    }
}

impl Args {
    pub fn from(args: Vec<String>) -> Self {
        let mut full_args = vec![env!("CARGO_PKG_NAME").to_string()];
        full_args.extend(args);

        Args::parse_from(full_args)
    }

    /// Output directory without trailing separators
    pub fn outdir(&self) -> PathBuf {
        strip_trailing_separators(&self.outdir)
    }

    /// Full path of the merged table
    pub fn output(&self) -> PathBuf {
        self.outdir().join(MERGED_OUTPUT)
    }
}

pub mod fns;
pub use fns::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// numeric values
pub const DEFAULT_MIN_LENGTH: u64 = 10;
pub const DIVSUM_FIELDS: usize = 5;
pub const CROSSMATCH_MIN_FIELDS: usize = 14;
pub const CROSSMATCH_MAX_FIELDS: usize = 15;
pub const SIGNIFICANT_DIGITS: usize = 6;

// file names
pub const MERGED_OUTPUT: &str = "repeat_masked_merged.tsv";
pub const GZ_SUFFIX: &str = ".gz";

// table layout
pub const COMMENT: char = '#';
pub const CLASS_SEPARATOR: char = '/';
pub const MERGED_HEADER: [&str; 9] = [
    "#Name",
    "Class",
    "Family",
    "Chromosome",
    "StartBP",
    "EndBP",
    "WellCharLen",
    "Kimura",
    "SwScore",
];

// leading labels of .divsum rows that are not repeat families
pub const DIVSUM_SENTINELS: [&str; 4] = ["Class", "ARTEFACT", "Simple_repeat", "-----"];

// non-TE classes dropped from the .out table
pub const EXCLUDED_CLASSES: [&str; 3] = ["Simple_repeat", "Low_complexity", "Satellite"];

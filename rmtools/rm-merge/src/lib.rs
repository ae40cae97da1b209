//! Core module for merging RepeatMasker annotation tables
//! Alejandro Gonzales-Irribarren, 2025
//!
//! This module contains the main function for joining the two tabular
//! outputs of RepeatMasker: the per-hit cross_match table (.out) and the
//! per-family divergence summary (.divsum).
//!
//! In short, the divergence summary is read into a map keyed by repeat id,
//! dropping families with too few well characterized bases. The cross_match
//! table is read into a map of hits keyed by repeat name, dropping simple
//! repeats, low complexity regions and satellites. Every hit whose name,
//! class and family agree exactly with a divergence record is written to
//! 'repeat_masked_merged.tsv' in the output directory. Both inputs may be
//! gzip-compressed.

use config::{ArgCheck, Session};

pub mod cli;
pub mod core;
pub mod record;
pub mod utils;

pub use crate::core::{
    crossmatch::{AnnotationMap, CrossMatchParser, CrossMatchStats},
    divsum::{DivergenceMap, DivsumParser, DivsumStats},
    merge::{merge, write_merged},
    merge_repeats, MergeSummary,
};
pub use record::{AnnotationRecord, DivergenceRecord, MergedRow};

pub fn lib_rm_merge(args: Vec<String>) -> anyhow::Result<usize> {
    let args = cli::Args::from(args);
    args.check()?;

    let session = Session::new(env!("CARGO_PKG_NAME"));
    let summary = merge_repeats(args, &session)?;

    Ok(summary.matches)
}

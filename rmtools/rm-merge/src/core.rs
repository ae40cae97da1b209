pub mod crossmatch;
pub mod divsum;
pub mod merge;

use anyhow::Result;
use config::Session;
use log::info;

use std::path::PathBuf;

use crate::cli::Args;
use crossmatch::{CrossMatchParser, CrossMatchStats};
use divsum::{DivsumParser, DivsumStats};
use merge::write_merged;

/// Counters gathered along a single run
#[derive(Debug, PartialEq, Clone)]
pub struct MergeSummary {
    pub cross_match: CrossMatchStats,
    pub divsum: DivsumStats,
    pub matches: usize,
    pub output: PathBuf,
}

/// Parse both RepeatMasker tables and write their join to the output directory.
///
/// The output file is only created once both tables parsed cleanly.
pub fn merge_repeats(args: Args, session: &Session) -> Result<MergeSummary> {
    info!("{} started on {}", session.prog(), session.started_on());

    let (annotations, cross_match) = CrossMatchParser::default().parse(&args.cross_match)?;
    let (divergence, divsum) = DivsumParser::new(args.min_length).parse(&args.divsum)?;

    let output = args.output();
    let matches = write_merged(&annotations, &divergence, &output)?;

    info!("{} finished on {}", session.prog(), session.now());

    Ok(MergeSummary {
        cross_match,
        divsum,
        matches,
        output,
    })
}

use anyhow::{Context, Result};
use config::{
    get_progress_bar, group_thousands, reader, COMMENT, DEFAULT_MIN_LENGTH, DIVSUM_FIELDS,
    DIVSUM_SENTINELS,
};
use hashbrown::{HashMap, HashSet};
use log::info;

use std::fmt::Debug;
use std::path::Path;

use crate::record::DivergenceRecord;

/// Divergence summaries keyed by repeat id; a repeated id keeps the last row seen
pub type DivergenceMap = HashMap<String, DivergenceRecord>;

#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct DivsumStats {
    /// data rows read, kept or not
    pub records: usize,
    /// rows dropped for a short wellCharLen
    pub discarded: usize,
}

/// Reader for the RepeatMasker divergence summary (.divsum) table
#[derive(Debug, Clone)]
pub struct DivsumParser {
    min_length: u64,
    sentinels: HashSet<String>,
}

impl Default for DivsumParser {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LENGTH)
    }
}

impl DivsumParser {
    pub fn new(min_length: u64) -> Self {
        Self::with_sentinels(min_length, DIVSUM_SENTINELS)
    }

    pub fn with_sentinels<I, S>(min_length: u64, sentinels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            min_length,
            sentinels: sentinels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn min_length(&self) -> u64 {
        self.min_length
    }

    pub fn parse<P: AsRef<Path> + Debug>(&self, path: P) -> Result<(DivergenceMap, DivsumStats)> {
        info!("Parsing divergence summary table...");

        let contents = reader(&path)
            .with_context(|| format!("ERROR: cannot read divsum table {:?}", path))?;
        let (divsum, stats) = self
            .parse_str(&contents)
            .with_context(|| format!("ERROR: failed to parse divsum table {:?}", path))?;

        info!(
            "Extracted {} records from divergence summary table file.",
            group_thousands(stats.records)
        );
        info!("Discarded {} records.", group_thousands(stats.discarded));

        Ok((divsum, stats))
    }

    pub fn parse_str(&self, contents: &str) -> Result<(DivergenceMap, DivsumStats)> {
        let pb = get_progress_bar(contents.lines().count() as u64, "Parsing divsum table");
        let mut divsum = DivergenceMap::new();
        let mut stats = DivsumStats::default();

        for (idx, line) in contents.lines().enumerate() {
            pb.inc(1);

            if line.is_empty() || line.starts_with(COMMENT) {
                continue;
            }

            // ragged headers and the coverage matrix never split into 5 columns
            let fields = line.split('\t').collect::<Vec<&str>>();
            if fields.len() != DIVSUM_FIELDS || self.sentinels.contains(fields[0]) {
                continue;
            }

            stats.records += 1;
            let record = DivergenceRecord::read(&fields)
                .with_context(|| format!("ERROR: malformed divsum record at line {}", idx + 1))?;

            if record.well_char_len < self.min_length {
                stats.discarded += 1;
                continue;
            }

            divsum.insert(record.id.clone(), record);
        }

        pb.finish_and_clear();
        Ok((divsum, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIVSUM: &str = "\
Jukes/Cantor and Kimura subsitution levels adjusted for CpG sites

Weighted average Kimura divergence for each repeat family
Class\tRepeat\tabsLen\twellCharLen\tKimura%
-----\t------\t------\t-----------\t-------
LINE\tRep1\t100\t50\t12.5
LINE/L1\tL1MA\t4000\t3500\t8.25
DNA/hAT\tCharlie1\t300\t9\t20.0
ARTEFACT\tARTEFACT\t10\t10\t1.0
Simple_repeat\t(CA)n\t500\t500\t3.0
# LINE\tHidden\t100\t100\t1.0

Coverage for each repeat class and divergence (Kimura)
Div\tLINE/L1\tDNA/hAT\tLTR/ERVL
0\t10\t20\t30
";

    #[test]
    fn test_parse_divsum_records() {
        let parser = DivsumParser::new(10);
        let (divsum, stats) = parser.parse_str(DIVSUM).unwrap();

        assert_eq!(stats.records, 3);
        assert_eq!(stats.discarded, 1);
        assert_eq!(divsum.len(), 2);

        let rep = divsum.get("Rep1").unwrap();
        assert_eq!(
            rep,
            &DivergenceRecord {
                class: "LINE".to_string(),
                family: "LINE".to_string(),
                id: "Rep1".to_string(),
                abs_len: 100,
                well_char_len: 50,
                kimura: 0.125,
            }
        );

        let l1 = divsum.get("L1MA").unwrap();
        assert_eq!(l1.class, "LINE");
        assert_eq!(l1.family, "LINE/L1");
        assert_eq!(l1.kimura, 8.25 / 100.0);

        assert!(!divsum.contains_key("Charlie1"));
        assert!(!divsum.contains_key("Hidden"));
        assert!(!divsum.contains_key("(CA)n"));
    }

    #[test]
    fn test_min_length_is_inclusive() {
        let contents = "LINE\tRep1\t100\t10\t1.0\nLINE\tRep2\t100\t9\t1.0\n";
        let (divsum, stats) = DivsumParser::new(10).parse_str(contents).unwrap();

        assert!(divsum.contains_key("Rep1"));
        assert!(!divsum.contains_key("Rep2"));
        assert_eq!(stats.records, 2);
        assert_eq!(stats.discarded, 1);
    }

    #[test]
    fn test_duplicate_id_last_wins() {
        let contents = "LINE\tRep1\t100\t50\t1.0\nLTR\tRep1\t200\t60\t2.0\n";
        let (divsum, stats) = DivsumParser::default().parse_str(contents).unwrap();

        assert_eq!(stats.records, 2);
        assert_eq!(divsum.len(), 1);
        assert_eq!(divsum["Rep1"].class, "LTR");
        assert_eq!(divsum["Rep1"].abs_len, 200);
    }

    #[test]
    fn test_custom_sentinels() {
        let contents = "LINE\tRep1\t100\t50\t1.0\nARTEFACT\tRep2\t100\t50\t1.0\n";
        let parser = DivsumParser::with_sentinels(10, ["LINE"]);
        let (divsum, stats) = parser.parse_str(contents).unwrap();

        assert_eq!(stats.records, 1);
        assert!(divsum.contains_key("Rep2"));
        assert!(!divsum.contains_key("Rep1"));
    }

    #[test]
    fn test_bad_number_aborts() {
        let contents = "LINE\tRep1\t100\t50\t1.0\nLINE\tRep2\tabc\t50\t1.0\n";
        let err = DivsumParser::default().parse_str(contents).unwrap_err();

        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_parse_divsum_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genome.divsum");
        std::fs::write(&path, DIVSUM).unwrap();

        let (divsum, stats) = DivsumParser::new(10).parse(&path).unwrap();
        assert_eq!(divsum.len(), 2);
        assert_eq!(stats.discarded, 1);
    }
}

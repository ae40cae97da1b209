use anyhow::{Context, Result};
use config::{
    get_progress_bar, group_thousands, reader, COMMENT, CROSSMATCH_MAX_FIELDS,
    CROSSMATCH_MIN_FIELDS, EXCLUDED_CLASSES,
};
use hashbrown::{HashMap, HashSet};
use log::info;

use std::fmt::Debug;
use std::path::Path;

use crate::record::AnnotationRecord;

/// Repeat hits grouped by repeat name.
///
/// Names are yielded in the order they were first seen and hits keep
/// their input order under each name.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct AnnotationMap {
    order: Vec<String>,
    records: HashMap<String, Vec<AnnotationRecord>>,
}

impl AnnotationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: AnnotationRecord) {
        match self.records.get_mut(&record.name) {
            Some(hits) => hits.push(record),
            None => {
                self.order.push(record.name.clone());
                self.records.insert(record.name.clone(), vec![record]);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&[AnnotationRecord]> {
        self.records.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AnnotationRecord])> + '_ {
        self.order
            .iter()
            .filter_map(|name| self.get(name).map(|hits| (name.as_str(), hits)))
    }

    /// number of distinct repeat names
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// number of stored hits across all names
    pub fn num_records(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct CrossMatchStats {
    /// rows with a numeric SW score and 14-15 columns
    pub records: usize,
    /// rows left after dropping excluded classes
    pub retained: usize,
}

/// Reader for the RepeatMasker cross_match (.out) table
#[derive(Debug, Clone)]
pub struct CrossMatchParser {
    excluded: HashSet<String>,
}

impl Default for CrossMatchParser {
    fn default() -> Self {
        Self::with_excluded(EXCLUDED_CLASSES)
    }
}

impl CrossMatchParser {
    pub fn with_excluded<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse<P: AsRef<Path> + Debug>(
        &self,
        path: P,
    ) -> Result<(AnnotationMap, CrossMatchStats)> {
        info!("Parsing cross match table...");

        let contents = reader(&path)
            .with_context(|| format!("ERROR: cannot read cross_match table {:?}", path))?;
        let (annotations, stats) = self
            .parse_str(&contents)
            .with_context(|| format!("ERROR: failed to parse cross_match table {:?}", path))?;

        info!(
            "Read {} records from the cross_match table file.",
            group_thousands(stats.records)
        );
        info!("Retained {} records.", group_thousands(stats.retained));

        Ok((annotations, stats))
    }

    pub fn parse_str(&self, contents: &str) -> Result<(AnnotationMap, CrossMatchStats)> {
        let pb = get_progress_bar(contents.lines().count() as u64, "Parsing cross_match table");
        let mut annotations = AnnotationMap::new();
        let mut stats = CrossMatchStats::default();

        for (idx, line) in contents.lines().enumerate() {
            pb.inc(1);

            if line.is_empty() || line.starts_with(COMMENT) {
                continue;
            }

            // columns are padded with a variable amount of spaces
            let fields = line.split_whitespace().collect::<Vec<&str>>();
            if !fields.first().is_some_and(|f| is_score(f))
                || !(CROSSMATCH_MIN_FIELDS..=CROSSMATCH_MAX_FIELDS).contains(&fields.len())
            {
                continue;
            }

            stats.records += 1;
            let annotation = AnnotationRecord::read(&fields).with_context(|| {
                format!("ERROR: malformed cross_match record at line {}", idx + 1)
            })?;

            if self.excluded.contains(annotation.class.as_str()) {
                continue;
            }

            stats.retained += 1;
            annotations.push(annotation);
        }

        pb.finish_and_clear();
        Ok((annotations, stats))
    }
}

/// SW scores are plain non-negative integers; headers start with text
fn is_score(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

use anyhow::{Context, Result};
use config::{CLASS_SEPARATOR, SIGNIFICANT_DIGITS};

use std::fmt;
use std::str::FromStr;

use crate::utils::format_sig;

/// Coarse repeat class: everything before the first '/', or the whole label
pub fn repeat_class(family: &str) -> &str {
    family
        .split_once(CLASS_SEPARATOR)
        .map_or(family, |(class, _)| class)
}

/// Parse a numeric column, naming the column when it does not fit
pub fn parse_field<T>(value: &str, field: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .with_context(|| format!("ERROR: cannot parse {} from {:?}", field, value))
}

/// Divergence summary for a repeat family, one per kept .divsum row
#[derive(Debug, PartialEq, Clone)]
pub struct DivergenceRecord {
    pub class: String,
    pub family: String,
    pub id: String,
    pub abs_len: u64,
    pub well_char_len: u64,
    /// Kimura divergence as a fraction [raw percentage / 100]
    pub kimura: f64,
}

impl DivergenceRecord {
    pub fn new(family: &str, id: &str, abs_len: u64, well_char_len: u64, kimura: f64) -> Self {
        Self {
            class: repeat_class(family).to_string(),
            family: family.to_string(),
            id: id.to_string(),
            abs_len,
            well_char_len,
            kimura: kimura / 100.0,
        }
    }

    /// Build a record from the five columns of a .divsum data row:
    /// class/family, id, absLen, wellCharLen, Kimura%
    pub fn read(fields: &[&str]) -> Result<Self> {
        match fields {
            [family, id, abs_len, well_char_len, kimura] => Ok(Self::new(
                family,
                id,
                parse_field(abs_len, "absLen")?,
                parse_field(well_char_len, "wellCharLen")?,
                parse_field(kimura, "Kimura")?,
            )),
            _ => anyhow::bail!(
                "ERROR: expected 5 divsum fields, found {}",
                fields.len()
            ),
        }
    }
}

impl fmt::Display for DivergenceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.class,
            self.family,
            self.id,
            self.abs_len,
            self.well_char_len,
            format_sig(self.kimura, SIGNIFICANT_DIGITS)
        )
    }
}

/// A single repeat hit from the cross_match (.out) table
#[derive(Debug, PartialEq, Clone)]
pub struct AnnotationRecord {
    pub name: String,
    pub class: String,
    pub family: String,
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub score: u64,
}

impl AnnotationRecord {
    pub fn new(name: &str, family: &str, chrom: &str, start: u64, end: u64, score: u64) -> Self {
        Self {
            name: name.to_string(),
            class: repeat_class(family).to_string(),
            family: family.to_string(),
            chrom: chrom.to_string(),
            start,
            end,
            score,
        }
    }

    /// Build a record from the whitespace-split columns of a .out data row.
    ///
    /// Only SW score (0), query sequence (4), query begin/end (5, 6),
    /// matching repeat (9) and repeat class/family (10) are kept.
    pub fn read(fields: &[&str]) -> Result<Self> {
        if fields.len() < 11 {
            anyhow::bail!(
                "ERROR: expected at least 11 cross_match fields, found {}",
                fields.len()
            );
        }

        Ok(Self::new(
            fields[9],
            fields[10],
            fields[4],
            parse_field(fields[5], "query begin")?,
            parse_field(fields[6], "query end")?,
            parse_field(fields[0], "SW score")?,
        ))
    }
}

impl fmt::Display for AnnotationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.name, self.class, self.family, self.chrom, self.start, self.end, self.score
        )
    }
}

/// A hit joined with the divergence summary of its family
#[derive(Debug, PartialEq, Clone)]
pub struct MergedRow<'a> {
    pub annotation: &'a AnnotationRecord,
    pub divergence: &'a DivergenceRecord,
}

impl<'a> MergedRow<'a> {
    /// Pair both records when id, class and family agree exactly
    pub fn join(
        annotation: &'a AnnotationRecord,
        divergence: &'a DivergenceRecord,
    ) -> Option<Self> {
        let matched = annotation.name == divergence.id
            && annotation.class == divergence.class
            && annotation.family == divergence.family;

        matched.then_some(Self {
            annotation,
            divergence,
        })
    }
}

impl fmt::Display for MergedRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, d) = (self.annotation, self.divergence);
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            a.name,
            a.class,
            a.family,
            a.chrom,
            a.start,
            a.end,
            d.well_char_len,
            format_sig(d.kimura, SIGNIFICANT_DIGITS),
            format_sig(a.score as f64, SIGNIFICANT_DIGITS)
        )
    }
}

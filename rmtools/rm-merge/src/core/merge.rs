use anyhow::{Context, Result};
use config::{group_thousands, MERGED_HEADER};
use log::info;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::crossmatch::AnnotationMap;
use crate::core::divsum::DivergenceMap;
use crate::record::MergedRow;

/// Join repeat hits with their family divergence and write one row per match.
///
/// Hits are visited in cross_match order; a hit is kept only when a
/// divergence record shares its name as id and both class and family
/// agree exactly. The header is written even when nothing matches.
pub fn merge<W: Write>(
    annotations: &AnnotationMap,
    divergence: &DivergenceMap,
    writer: &mut W,
) -> Result<usize> {
    writeln!(writer, "{}", MERGED_HEADER.join("\t"))?;

    let mut matches = 0;
    for (name, hits) in annotations.iter() {
        let Some(summary) = divergence.get(name) else {
            continue;
        };

        for row in hits
            .iter()
            .filter_map(|annotation| MergedRow::join(annotation, summary))
        {
            writeln!(writer, "{}", row)?;
            matches += 1;
        }
    }

    Ok(matches)
}

/// Merge both tables into `output`, returning the number of exported rows
pub fn write_merged(
    annotations: &AnnotationMap,
    divergence: &DivergenceMap,
    output: &Path,
) -> Result<usize> {
    info!("Matching cross_match and divsum records...");

    let file = File::create(output)
        .with_context(|| format!("ERROR: cannot create output file {:?}", output))?;
    let mut writer = BufWriter::new(file);

    let matches = merge(annotations, divergence, &mut writer)?;
    writer
        .flush()
        .with_context(|| format!("ERROR: cannot write output file {:?}", output))?;

    info!(
        "Exported a total of {} matching records.",
        group_thousands(matches)
    );

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AnnotationRecord, DivergenceRecord};

    fn divergence(records: Vec<DivergenceRecord>) -> DivergenceMap {
        records.into_iter().map(|r| (r.id.clone(), r)).collect()
    }

    fn render(annotations: &AnnotationMap, divsum: &DivergenceMap) -> (usize, String) {
        let mut buffer = Vec::new();
        let matches = merge(annotations, divsum, &mut buffer).unwrap();
        (matches, String::from_utf8(buffer).unwrap())
    }

    #[test]
    fn test_merge_exact_match() {
        let divsum = divergence(vec![DivergenceRecord::new("LINE", "Rep1", 100, 50, 12.5)]);
        let mut annotations = AnnotationMap::new();
        annotations.push(AnnotationRecord::new("Rep1", "LINE", "chr1", 1000, 1100, 500));

        let (matches, output) = render(&annotations, &divsum);

        assert_eq!(matches, 1);
        assert_eq!(
            output,
            "#Name\tClass\tFamily\tChromosome\tStartBP\tEndBP\tWellCharLen\tKimura\tSwScore\n\
             Rep1\tLINE\tLINE\tchr1\t1000\t1100\t50\t0.125\t500\n"
        );
    }

    #[test]
    fn test_merge_family_mismatch() {
        let divsum = divergence(vec![DivergenceRecord::new("LINE", "Rep1", 100, 50, 12.5)]);
        let mut annotations = AnnotationMap::new();
        annotations.push(AnnotationRecord::new("Rep1", "LINE/L1", "chr1", 1000, 1100, 500));

        let (matches, output) = render(&annotations, &divsum);

        assert_eq!(matches, 0);
        assert_eq!(output.lines().count(), 1);
        assert!(output.starts_with("#Name\t"));
    }

    #[test]
    fn test_merge_one_to_many_keeps_order() {
        let divsum = divergence(vec![
            DivergenceRecord::new("LINE/L1", "L1MA", 4000, 3500, 8.0),
            DivergenceRecord::new("LTR/ERVL", "MLT1", 500, 400, 30.0),
        ]);

        let mut annotations = AnnotationMap::new();
        annotations.push(AnnotationRecord::new("MLT1", "LTR/ERVL", "chr2", 50, 90, 250));
        annotations.push(AnnotationRecord::new("L1MA", "LINE/L1", "chr1", 10, 20, 300));
        annotations.push(AnnotationRecord::new("Orphan", "LINE/L2", "chr1", 30, 40, 100));
        annotations.push(AnnotationRecord::new("MLT1", "LTR/ERVL", "chr1", 5, 9, 1234567));

        let (matches, output) = render(&annotations, &divsum);
        let rows = output.lines().skip(1).collect::<Vec<_>>();

        assert_eq!(matches, 3);
        assert_eq!(
            rows,
            vec![
                "MLT1\tLTR\tLTR/ERVL\tchr2\t50\t90\t400\t0.3\t250",
                "MLT1\tLTR\tLTR/ERVL\tchr1\t5\t9\t400\t0.3\t1.23457e+06",
                "L1MA\tLINE\tLINE/L1\tchr1\t10\t20\t3500\t0.08\t300",
            ]
        );
    }

    #[test]
    fn test_write_merged_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join(config::MERGED_OUTPUT);

        let matches = write_merged(&AnnotationMap::new(), &DivergenceMap::new(), &output).unwrap();

        assert_eq!(matches, 0);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            format!("{}\n", MERGED_HEADER.join("\t"))
        );
    }
}

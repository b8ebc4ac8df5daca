//! Reading and writing GenBank files with `gb-io`, converting to and from the
//! normalized `FlatRecord` model.
//!
//! Coordinates are 0-based and end exclusive on both sides.  A location like
//! "5^6" (between two bases) is read as a zero width interval at the second
//! base, and written back the same way.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use gb_io::seq::{Date, Feature, FeatureKind, Location, Reference, Seq, Source, Topology};
use itertools::Itertools;
use regex::Regex;
use tracing::{info, warn};

use crate::error::{ConversionError, Result};
use crate::flat::{AnnotationKey, AnnotationValue, FlatFeature, FlatRecord, FlatReference};
use crate::location::{FlatInterval, FlatLocation, Strand};

lazy_static! {
    static ref VERSION_RE: Regex = Regex::new(r"^(\S+?)(?:\.(\d+))?(?:\s+GI:(\S+))?\s*$").unwrap();
    static ref BASES_RE: Regex = Regex::new(r"(\d+)\s+to\s+(\d+)").unwrap();
}

const GENBANK_DATE_FORMAT: &str = "%d-%b-%Y";

fn unsupported_location(path: &Path, record_name: &str, location: &Location) -> ConversionError {
    ConversionError::GenBank {
        path: path.to_path_buf(),
        message: format!("unsupported location in record {}: {:?}", record_name, location),
    }
}

// Flatten a location into strand tagged parts.  The parts of a complemented
// join are listed in reverse, following the transcription order.
fn flatten_location(location: &Location, strand: Strand, parts: &mut Vec<FlatInterval>)
    -> std::result::Result<(), ()>
{
    match location {
        Location::Range((start, _), (end, _)) => {
            parts.push(FlatInterval::new(*start, *end, strand));
        },
        Location::Between(_, after) => {
            parts.push(FlatInterval::point(*after, strand));
        },
        Location::Complement(inner) => {
            let inner_strand =
                match strand {
                    Strand::Forward => Strand::Reverse,
                    Strand::Reverse => Strand::Forward,
                };
            let mut inner_parts = vec![];
            flatten_location(inner, inner_strand, &mut inner_parts)?;
            inner_parts.reverse();
            parts.extend(inner_parts);
        },
        Location::Join(locations) | Location::Order(locations) => {
            for location in locations {
                flatten_location(location, strand, parts)?;
            }
        },
        _ => return Err(()),
    }

    Ok(())
}

// order() is read and written as join()
fn contains_order(location: &Location) -> bool {
    match location {
        Location::Order(_) => true,
        Location::Complement(inner) => contains_order(inner),
        Location::Join(locations) => locations.iter().any(contains_order),
        _ => false,
    }
}

fn interval_location(interval: &FlatInterval) -> Location {
    let location =
        if interval.is_point() {
            if interval.start > 0 {
                Location::Between(interval.start - 1, interval.start)
            } else {
                // there is no site before the first base
                warn!("writing a point at {} as the site between the first two bases",
                      interval.start);
                Location::Between(0, 1)
            }
        } else {
            Location::simple_range(interval.start, interval.end)
        };

    match interval.strand {
        Strand::Forward => location,
        Strand::Reverse => Location::Complement(Box::new(location)),
    }
}

fn gb_location(location: &FlatLocation) -> Location {
    match location {
        FlatLocation::Simple(interval) => interval_location(interval),
        FlatLocation::Join(parts) => {
            if location.strand() == Strand::Reverse {
                let forward_parts = parts.iter().rev()
                    .map(|part| interval_location(&FlatInterval::new(part.start, part.end,
                                                                     Strand::Forward)))
                    .collect();
                Location::Complement(Box::new(Location::Join(forward_parts)))
            } else {
                Location::Join(parts.iter().map(interval_location).collect())
            }
        },
    }
}

fn format_date(date: &Date) -> Option<String> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), date.day())
        .map(|date| date.format(GENBANK_DATE_FORMAT).to_string().to_uppercase())
}

fn parse_date(text: &str) -> Option<Date> {
    let date = NaiveDate::parse_from_str(text, GENBANK_DATE_FORMAT).ok()?;
    Date::from_ymd(date.year(), date.month(), date.day()).ok()
}

fn text_list(text: &str, separator: &str) -> Vec<String> {
    text.trim().trim_end_matches('.')
        .split(separator)
        .map(|part| part.trim().to_owned())
        .collect()
}

fn reference_location(description: &str) -> Vec<FlatInterval> {
    if !description.contains("bases") {
        return vec![];
    }

    BASES_RE.captures_iter(description)
        .filter_map(|captures| {
            let start = captures[1].parse::<i64>().ok()?;
            let end = captures[2].parse::<i64>().ok()?;
            Some(FlatInterval::new(start - 1, end, Strand::Forward))
        })
        .collect()
}

fn flat_reference(reference: &Reference) -> FlatReference {
    FlatReference {
        authors: reference.authors.clone().unwrap_or_default(),
        title: reference.title.clone(),
        journal: reference.journal.clone().unwrap_or_default(),
        comment: reference.remark.clone().unwrap_or_default(),
        consortium: reference.consortium.clone().unwrap_or_default(),
        medline_id: String::new(),
        pubmed_id: reference.pubmed.clone().unwrap_or_default(),
        location: reference_location(&reference.description),
    }
}

fn gb_reference(index: usize, reference: &FlatReference) -> Reference {
    let description =
        if reference.location.is_empty() {
            format!("{}", index + 1)
        } else {
            let bases = reference.location.iter()
                .map(|interval| format!("{} to {}", interval.start + 1, interval.end))
                .join("; ");
            format!("{}  (bases {})", index + 1, bases)
        };

    let optional = |text: &str| {
        if text.is_empty() {
            None
        } else {
            Some(text.to_owned())
        }
    };

    Reference {
        description,
        authors: optional(&reference.authors),
        consortium: optional(&reference.consortium),
        title: reference.title.clone(),
        journal: optional(&reference.journal),
        pubmed: optional(&reference.pubmed_id),
        remark: optional(&reference.comment),
    }
}

/// Convert one parsed GenBank entry to a FlatRecord.  `path` is only used in
/// error messages.
pub fn flat_record(seq: &Seq, path: &Path) -> Result<FlatRecord> {
    let name = seq.name.clone()
        .or_else(|| seq.accession.clone())
        .unwrap_or_else(|| "unnamed".to_owned());

    let mut id = seq.accession.as_deref()
        .and_then(|accession| accession.split_whitespace().next())
        .unwrap_or(name.as_str())
        .to_owned();

    let description = seq.definition.as_deref().unwrap_or_default()
        .trim_end_matches('.').to_owned();
    let sequence = String::from_utf8_lossy(&seq.seq).into_owned();

    let mut record = FlatRecord::new(&id, &name, &description, &sequence);

    if let Some(ref molecule_type) = seq.molecule_type {
        record.set_annotation(AnnotationKey::MoleculeType,
                              AnnotationValue::Text(molecule_type.clone()));
    }

    let topology =
        match seq.topology {
            Topology::Linear => "linear",
            Topology::Circular => "circular",
        };
    record.set_annotation(AnnotationKey::Topology, AnnotationValue::Text(topology.to_owned()));

    if !seq.division.is_empty() {
        record.set_annotation(AnnotationKey::DataFileDivision,
                              AnnotationValue::Text(seq.division.clone()));
    }

    if let Some(date) = seq.date.as_ref().and_then(format_date) {
        record.set_annotation(AnnotationKey::Date, AnnotationValue::Text(date));
    }

    if let Some(ref accession) = seq.accession {
        let accessions = accession.split_whitespace().map(str::to_owned).collect();
        record.set_annotation(AnnotationKey::Accessions, AnnotationValue::List(accessions));
    }

    if let Some(captures) = seq.version.as_deref().and_then(|version| VERSION_RE.captures(version)) {
        if let Some(version_number) = captures.get(2) {
            id = format!("{}.{}", &captures[1], version_number.as_str());
            if let Ok(version_number) = version_number.as_str().parse::<i64>() {
                record.set_annotation(AnnotationKey::SequenceVersion,
                                      AnnotationValue::Integer(version_number));
            }
        } else {
            id = captures[1].to_owned();
        }
        if let Some(gi) = captures.get(3) {
            record.set_annotation(AnnotationKey::Gi, AnnotationValue::Text(gi.as_str().to_owned()));
        }
        record.id = id;
    }

    if let Some(ref keywords) = seq.keywords {
        record.set_annotation(AnnotationKey::Keywords,
                              AnnotationValue::List(text_list(keywords, ";")));
    }

    if let Some(ref source) = seq.source {
        record.set_annotation(AnnotationKey::Source, AnnotationValue::Text(source.source.clone()));

        if let Some(ref organism) = source.organism {
            let mut lines = organism.lines();
            if let Some(organism_name) = lines.next() {
                record.set_annotation(AnnotationKey::Organism,
                                      AnnotationValue::Text(organism_name.trim().to_owned()));
            }
            let lineage = lines.collect::<Vec<_>>().join(" ");
            if !lineage.trim().is_empty() {
                record.set_annotation(AnnotationKey::Taxonomy,
                                      AnnotationValue::List(text_list(&lineage, ";")));
            }
        }
    }

    if !seq.references.is_empty() {
        let references = seq.references.iter().map(flat_reference).collect();
        record.set_annotation(AnnotationKey::References, AnnotationValue::References(references));
    }

    // not a field the converters know, so a record with comments is refused
    // rather than silently losing them
    if !seq.comments.is_empty() {
        record.annotations.insert("comment".to_owned(),
                                  AnnotationValue::Text(seq.comments.join("\n")));
    }

    for feature in &seq.features {
        let mut parts = vec![];
        flatten_location(&feature.location, Strand::Forward, &mut parts)
            .map_err(|_| unsupported_location(path, &name, &feature.location))?;

        if contains_order(&feature.location) {
            warn!("record {}: the order() location of a {} feature will be written as join()",
                  name, feature.kind);
        }

        let qualifiers = feature.qualifiers.iter()
            .map(|(key, value)| (key.to_string(), value.clone().unwrap_or_default()))
            .collect();

        record.features.push(FlatFeature {
            kind: feature.kind.to_string().into(),
            location: FlatLocation::from_parts(parts),
            qualifiers,
        });
    }

    Ok(record)
}

/// Convert a FlatRecord to a gb-io entry ready for writing.
pub fn gb_seq(record: &FlatRecord) -> Seq {
    let mut seq = Seq::empty();

    seq.name = Some(record.name.clone());
    seq.seq = record.sequence.to_lowercase().into_bytes();
    seq.len = Some(seq.seq.len());

    if !record.description.is_empty() {
        seq.definition = Some(format!("{}.", record.description));
    }

    if let Some(molecule_type) = record.text_annotation(AnnotationKey::MoleculeType) {
        seq.molecule_type = Some(molecule_type.to_owned());
    }

    if record.text_annotation(AnnotationKey::Topology) == Some("circular") {
        seq.topology = Topology::Circular;
    }

    seq.division = record.text_annotation(AnnotationKey::DataFileDivision)
        .unwrap_or("UNK").to_owned();

    if let Some(date_text) = record.text_annotation(AnnotationKey::Date) {
        seq.date = parse_date(date_text);
        if seq.date.is_none() {
            warn!("record {}: can't parse date `{}`, leaving it out", record.id, date_text);
        }
    }

    let accessions =
        match record.annotation(AnnotationKey::Accessions) {
            Some(AnnotationValue::List(accessions)) if !accessions.is_empty() => accessions.join(" "),
            _ => record.id.split('.').next().unwrap_or_default().to_owned(),
        };
    seq.accession = Some(accessions);

    let mut version =
        if record.id.contains('.') {
            record.id.clone()
        } else {
            let sequence_version =
                match record.annotation(AnnotationKey::SequenceVersion) {
                    Some(AnnotationValue::Integer(sequence_version)) => *sequence_version,
                    _ => 1,
                };
            format!("{}.{}", record.id, sequence_version)
        };
    if let Some(gi) = record.text_annotation(AnnotationKey::Gi) {
        version = format!("{}  GI:{}", version, gi);
    }
    seq.version = Some(version);

    if let Some(AnnotationValue::List(keywords)) = record.annotation(AnnotationKey::Keywords) {
        seq.keywords = Some(format!("{}.", keywords.join("; ")));
    }

    let organism = record.text_annotation(AnnotationKey::Organism).map(|organism| {
        match record.annotation(AnnotationKey::Taxonomy) {
            Some(AnnotationValue::List(taxonomy)) if !taxonomy.is_empty() =>
                format!("{}\n{}.", organism, taxonomy.join("; ")),
            _ => organism.to_owned(),
        }
    });
    let source = record.text_annotation(AnnotationKey::Source);
    if source.is_some() || organism.is_some() {
        seq.source = Some(Source {
            source: source.unwrap_or(".").to_owned(),
            organism,
        });
    }

    seq.references = record.references().iter().enumerate()
        .map(|(index, reference)| gb_reference(index, reference))
        .collect();

    seq.features = record.features.iter()
        .filter(|feature| {
            let has_parts = !feature.location.parts().is_empty();
            if !has_parts {
                warn!("record {}: {} feature has no location, leaving it out",
                      record.id, feature.kind);
            }
            has_parts
        })
        .map(|feature| {
            let qualifiers = feature.qualifiers.iter()
                .map(|(key, value)| {
                    let value = if value.is_empty() { None } else { Some(value.clone()) };
                    (key.as_str().into(), value)
                })
                .collect();
            Feature {
                kind: FeatureKind::from(feature.kind.as_str()),
                location: gb_location(&feature.location),
                qualifiers,
            }
        })
        .collect();

    seq
}

pub fn read_genbank(path: &Path) -> Result<Vec<FlatRecord>> {
    info!("Parsing Genbank records from {}", path.display());

    let seqs = gb_io::reader::parse_file(path).map_err(|err| {
        ConversionError::GenBank {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    })?;

    seqs.iter().map(|seq| flat_record(seq, path)).collect()
}

pub fn write_genbank(path: &Path, records: &[FlatRecord]) -> Result<()> {
    info!("Writing {} GenBank records to {}", records.len(), path.display());

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    for record in records {
        gb_io::writer::write(&mut writer, &gb_seq(record))?;
    }

    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_complement_join() {
        let location = Location::Complement(Box::new(Location::Join(vec![
            Location::simple_range(10, 20),
            Location::simple_range(30, 40),
        ])));
        let mut parts = vec![];
        flatten_location(&location, Strand::Forward, &mut parts).unwrap();
        assert_eq!(parts, vec![FlatInterval::new(30, 40, Strand::Reverse),
                               FlatInterval::new(10, 20, Strand::Reverse)]);

        let flat = FlatLocation::from_parts(parts);
        assert_eq!(gb_location(&flat), location);
    }

    #[test]
    fn test_between_is_point() {
        let mut parts = vec![];
        flatten_location(&Location::Between(4, 5), Strand::Forward, &mut parts).unwrap();
        assert_eq!(parts, vec![FlatInterval::point(5, Strand::Forward)]);
        assert_eq!(interval_location(&parts[0]), Location::Between(4, 5));
    }

    #[test]
    fn test_point_at_start() {
        let location = interval_location(&FlatInterval::point(0, Strand::Forward));
        assert_eq!(location, Location::Between(0, 1));
        assert_eq!(interval_location(&FlatInterval::point(1, Strand::Reverse)),
                   Location::Complement(Box::new(Location::Between(0, 1))));
    }

    #[test]
    fn test_order_is_flattened_like_join() {
        let order = Location::Order(vec![Location::simple_range(0, 5),
                                         Location::simple_range(8, 10)]);
        assert!(contains_order(&order));
        assert!(contains_order(&Location::Complement(Box::new(order.clone()))));
        assert!(!contains_order(&Location::Join(vec![Location::simple_range(0, 5)])));

        let mut parts = vec![];
        flatten_location(&order, Strand::Forward, &mut parts).unwrap();
        assert_eq!(parts, vec![FlatInterval::new(0, 5, Strand::Forward),
                               FlatInterval::new(8, 10, Strand::Forward)]);
    }

    #[test]
    fn test_feature_without_location_left_out() {
        let mut record = FlatRecord::new("X.1", "X", "", "acgtacgt");
        record.features = vec![
            FlatFeature {
                kind: "misc_feature".into(),
                location: FlatLocation::Join(vec![]),
                qualifiers: vec![],
            },
            FlatFeature {
                kind: "CDS".into(),
                location: FlatLocation::Simple(FlatInterval::new(0, 6, Strand::Forward)),
                qualifiers: vec![("label".to_owned(), "c".to_owned())],
            },
        ];

        let seq = gb_seq(&record);
        assert_eq!(seq.features.len(), 1);
        assert_eq!(seq.features[0].location, Location::simple_range(0, 6));
    }

    #[test]
    fn test_dates() {
        let date = parse_date("01-JAN-1980").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (1980, 1, 1));
        assert_eq!(format_date(&date).as_deref(), Some("01-JAN-1980"));
        assert!(parse_date("yesterday").is_none());
    }

    #[test]
    fn test_reference_location() {
        assert_eq!(reference_location("1  (bases 1 to 35; 50 to 60)"),
                   vec![FlatInterval::new(0, 35, Strand::Forward),
                        FlatInterval::new(49, 60, Strand::Forward)]);
        assert!(reference_location("2  (sites)").is_empty());

        let reference = FlatReference {
            title: "Direct Submission".to_owned(),
            location: vec![FlatInterval::new(0, 35, Strand::Forward)],
            ..FlatReference::default()
        };
        let gb = gb_reference(0, &reference);
        assert_eq!(gb.description, "1  (bases 1 to 35)");
        assert_eq!(flat_reference(&gb), reference);
    }

    #[test]
    fn test_version_line() {
        let captures = VERSION_RE.captures("BBa_J23101.1  GI:12345").unwrap();
        assert_eq!(&captures[1], "BBa_J23101");
        assert_eq!(&captures[2], "1");
        assert_eq!(&captures[3], "12345");

        let captures = VERSION_RE.captures("NC_000913").unwrap();
        assert_eq!(&captures[1], "NC_000913");
        assert!(captures.get(2).is_none());
    }
}

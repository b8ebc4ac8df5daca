use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use gbsbol::config::ConverterConfig;
use gbsbol::converter::Converter;
use gbsbol::flat::{AnnotationKey, AnnotationValue, FlatFeature, FlatRecord, FlatReference};
use gbsbol::location::{FlatInterval, FlatLocation, Strand};
use gbsbol::sbol::Document;
use gbsbol::sbol::objects::{Component, Location, LocationKind, Sequence, SequenceFeature,
                            TopLevel};
use gbsbol::constants::{SBO_DNA, SO_FORWARD, SO_LINEAR, SO_NS};

#[allow(dead_code)]
pub fn test_converter() -> Converter {
    Converter::new(&ConverterConfig::default()).unwrap()
}

// collects what the fmt subscriber writes
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// run `f` with a subscriber that records log lines, returning its result
// and the log text
#[allow(dead_code)]
pub fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();

    (result, logs)
}

#[allow(dead_code)]
pub fn qualifier(key: &str, value: &str) -> (String, String) {
    (key.to_owned(), value.to_owned())
}

#[allow(dead_code)]
fn text(value: &str) -> AnnotationValue {
    AnnotationValue::Text(value.to_owned())
}

#[allow(dead_code)]
fn list(values: &[&str]) -> AnnotationValue {
    AnnotationValue::List(values.iter().map(|value| value.to_string()).collect())
}

#[allow(dead_code)]
pub fn make_feature(kind: &str, parts: &[(i64, i64)], strand: Strand,
                    qualifiers: &[(&str, &str)]) -> FlatFeature {
    let parts = parts.iter()
        .map(|&(start, end)| FlatInterval::new(start, end, strand))
        .collect();
    FlatFeature {
        kind: kind.into(),
        location: FlatLocation::from_parts(parts),
        qualifiers: qualifiers.iter().map(|&(key, value)| qualifier(key, value)).collect(),
    }
}

// a record with only the annotations the converters know how to store,
// features in the order the reverse conversion emits them
#[allow(dead_code)]
pub fn make_test_record() -> FlatRecord {
    let mut record =
        FlatRecord::new("BBa_J23101.1", "BBa_J23101", "constitutive promoter family member",
                        "TTTACAGCTAGCTCAGTCCTAGGTATTATGCTAGCATGAGCTTTACAGCTAGCTCAGTCC");

    record.set_annotation(AnnotationKey::MoleculeType, text("DNA"));
    record.set_annotation(AnnotationKey::Topology, text("linear"));
    record.set_annotation(AnnotationKey::DataFileDivision, text("SYN"));
    record.set_annotation(AnnotationKey::Date, text("16-OCT-2026"));
    record.set_annotation(AnnotationKey::Accessions, list(&["BBa_J23101"]));
    record.set_annotation(AnnotationKey::SequenceVersion, AnnotationValue::Integer(1));
    record.set_annotation(AnnotationKey::Gi, text("12345"));
    record.set_annotation(AnnotationKey::Keywords, list(&["iGEM", "promoter"]));
    record.set_annotation(AnnotationKey::Source, text("synthetic DNA construct"));
    record.set_annotation(AnnotationKey::Organism, text("synthetic DNA construct"));
    record.set_annotation(AnnotationKey::Taxonomy, list(&["other sequences", "artificial sequences"]));
    record.set_annotation(AnnotationKey::References, AnnotationValue::References(vec![
        FlatReference {
            authors: "Anderson,J.C.".to_owned(),
            title: "Direct Submission".to_owned(),
            journal: "Registry of Standard Biological Parts".to_owned(),
            location: vec![FlatInterval::new(0, 35, Strand::Forward)],
            ..FlatReference::default()
        },
    ]));

    record.features = vec![
        make_feature("promoter", &[(0, 35)], Strand::Forward,
                     &[("label", "J23101"), ("note", "constitutive")]),
        make_feature("misc_feature", &[(36, 36)], Strand::Forward, &[("label", "cut site")]),
        make_feature("CDS", &[(50, 60), (40, 45)], Strand::Reverse,
                     &[("label", "rev"), ("note", "b"), ("note", "a")]),
    ];

    record
}

#[allow(dead_code)]
pub fn range(sequence: &str, start: i64, end: i64, orientation: &str) -> Location {
    Location {
        identity: String::new(),
        sequence: sequence.to_owned(),
        orientation: Some(orientation.to_owned()),
        kind: LocationKind::Range { start, end },
    }
}

// a document with one Component named "comp", its Sequence and features that
// have no stored qualifiers
#[allow(dead_code)]
pub fn make_test_document(features: Vec<SequenceFeature>) -> Document {
    let mut doc = Document::new("https://example.org/");

    let sequence_identity = doc.make_identity("comp_sequence");
    let mut component = Component::new(doc.make_identity("comp"), "comp".to_owned(),
                                       vec![SBO_DNA.to_owned(), SO_LINEAR.to_owned()]);
    component.sequences = vec![sequence_identity.clone()];

    for feature in features {
        component.add_sequence_feature(feature);
    }

    doc.add(TopLevel::Component(component)).unwrap();
    doc.add(TopLevel::Sequence(Sequence {
        identity: sequence_identity,
        display_id: "comp_sequence".to_owned(),
        elements: Some("acgtacgtacgtacgtacgt".to_owned()),
        encoding: None,
    })).unwrap();

    doc
}

#[allow(dead_code)]
pub fn make_sequence_feature(name: &str, so_term: &str, coords: &[(i64, i64)]) -> SequenceFeature {
    let sequence = "https://example.org/comp_sequence";
    let locations = coords.iter()
        .map(|&(start, end)| range(sequence, start, end, SO_FORWARD))
        .collect();
    SequenceFeature::new(Some(name.to_owned()), vec![format!("{}{}", SO_NS, so_term)],
                         Some(SO_FORWARD.to_owned()), locations)
}

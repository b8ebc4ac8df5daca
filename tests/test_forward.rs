extern crate gbsbol;

mod util;

use gbsbol::constants::*;
use gbsbol::error::ConversionError;
use gbsbol::extension::Extension;
use gbsbol::flat::{AnnotationKey, AnnotationValue};
use gbsbol::location::Strand;
use gbsbol::sbol::objects::{Feature, LocationKind, TopLevel};

use util::{make_feature, make_test_record, qualifier, test_converter, with_captured_logs};

#[test]
fn test_component_and_sequence() {
    let converter = test_converter();
    let doc = converter.flat_to_graph(&[make_test_record()], TEST_NAMESPACE).unwrap();

    let component = match doc.find("https://test.sbol3.genbank/BBa_J23101") {
        Some(TopLevel::Component(component)) => component,
        other => panic!("expected a Component, got {:?}", other),
    };

    assert_eq!(component.display_id, "BBa_J23101");
    assert_eq!(component.types, vec![SBO_DNA, SO_LINEAR]);
    assert_eq!(component.roles, vec![SO_ENGINEERED_REGION]);
    assert_eq!(component.description.as_deref(), Some("constitutive promoter family member"));
    assert_eq!(component.sequences, vec!["https://test.sbol3.genbank/BBa_J23101_sequence"]);

    let sequence = match doc.find("BBa_J23101_sequence") {
        Some(TopLevel::Sequence(sequence)) => sequence,
        other => panic!("expected a Sequence, got {:?}", other),
    };
    assert!(sequence.elements.as_deref().unwrap().starts_with("tttacagctagc"));
    assert_eq!(sequence.encoding.as_deref(), Some(IUPAC_DNA_ENCODING));
}

#[test]
fn test_record_fields_in_extension() {
    let converter = test_converter();
    let doc = converter.flat_to_graph(&[make_test_record()], TEST_NAMESPACE).unwrap();

    let extension = match doc.extension("https://test.sbol3.genbank/BBa_J23101") {
        Some(Extension::Component(extension)) => extension,
        other => panic!("expected component fields, got {:?}", other),
    };

    assert_eq!(extension.record_id.as_deref(), Some("BBa_J23101.1"));
    assert_eq!(extension.locus.as_deref(), Some("BBa_J23101"));
    assert_eq!(extension.division.as_deref(), Some("SYN"));
    assert_eq!(extension.topology.as_deref(), Some("linear"));
    assert_eq!(extension.taxonomy.as_deref(), Some("other sequences,artificial sequences"));
    assert_eq!(extension.seq_version, Some(1));
    assert_eq!(extension.gi.as_deref(), Some("12345"));
    assert_eq!(extension.keywords, Some(vec!["iGEM".to_owned(), "promoter".to_owned()]));
}

#[test]
fn test_circular_division() {
    let mut record = make_test_record();
    record.annotations.shift_remove(AnnotationKey::Topology.as_str());
    record.set_annotation(AnnotationKey::DataFileDivision,
                          AnnotationValue::Text("circular".to_owned()));
    record.set_annotation(AnnotationKey::Accessions,
                          AnnotationValue::List(vec!["b".to_owned(), "a".to_owned()]));

    let doc = test_converter().flat_to_graph(&[record], TEST_NAMESPACE).unwrap();
    let component = doc.components().next().unwrap();
    assert_eq!(component.types, vec![SBO_DNA, SO_CIRCULAR]);

    let Some(Extension::Component(extension)) = doc.extension(&component.identity) else {
        panic!("no component fields");
    };
    assert_eq!(extension.topology.as_deref(), Some("circular"));
    assert_eq!(extension.division, None);
    assert_eq!(extension.accessions, Some(vec!["a".to_owned(), "b".to_owned()]));
}

#[test]
fn test_unknown_annotation_is_fatal() {
    let mut record = make_test_record();
    record.annotations.insert("structured_comment".to_owned(),
                              AnnotationValue::Text("x".to_owned()));

    match test_converter().flat_to_graph(&[record], TEST_NAMESPACE) {
        Err(ConversionError::UnknownAnnotation { record, field }) => {
            assert_eq!(record, "BBa_J23101.1");
            assert_eq!(field, "structured_comment");
        },
        other => panic!("expected an unknown annotation error, got {:?}", other),
    }
}

#[test]
fn test_annotation_with_wrong_shape() {
    let mut record = make_test_record();
    record.set_annotation(AnnotationKey::Keywords, AnnotationValue::Text("x".to_owned()));

    let result = test_converter().flat_to_graph(&[record], TEST_NAMESPACE);
    assert!(matches!(result, Err(ConversionError::AnnotationType { ref field, .. })
                     if field == "keywords"));
}

#[test]
fn test_features() {
    let doc = test_converter().flat_to_graph(&[make_test_record()], TEST_NAMESPACE).unwrap();
    let component = doc.components().next().unwrap();
    let features = component.sequence_features().collect::<Vec<_>>();

    assert_eq!(features.len(), 3);

    let promoter = features[0];
    assert_eq!(promoter.identity, "https://test.sbol3.genbank/BBa_J23101/SequenceFeature1");
    assert_eq!(promoter.name.as_deref(), Some("J23101"));
    assert_eq!(promoter.roles, vec!["https://identifiers.org/SO:0000167"]);
    assert_eq!(promoter.orientation.as_deref(), Some(SO_FORWARD));
    assert_eq!(promoter.locations[0].kind, LocationKind::Range { start: 0, end: 35 });
    assert_eq!(promoter.locations[0].sequence,
               "https://test.sbol3.genbank/BBa_J23101_sequence");

    // zero width becomes a cut
    let cut_site = features[1];
    assert_eq!(cut_site.locations[0].kind, LocationKind::Cut { at: 36 });
    assert_eq!(cut_site.locations[0].identity,
               "https://test.sbol3.genbank/BBa_J23101/SequenceFeature2/Cut1");

    let cds = features[2];
    assert_eq!(cds.orientation.as_deref(), Some(SO_REVERSE));
    assert_eq!(cds.locations.len(), 2);
    assert!(cds.locations.iter().all(|loc| loc.orientation.as_deref() == Some(SO_REVERSE)));

    match doc.extension(&cds.identity) {
        Some(Extension::Feature(extension)) => {
            assert_eq!(extension.qualifiers,
                       vec![qualifier("label", "rev"), qualifier("note", "b"),
                            qualifier("note", "a")]);
        },
        other => panic!("expected stored qualifiers, got {:?}", other),
    }

    assert!(component.features.iter().all(|feature| matches!(feature, Feature::SequenceFeature(_))));
}

#[test]
fn test_unmapped_feature_type() {
    let mut record = make_test_record();
    record.features = vec![make_feature("xyz123", &[(0, 10)], Strand::Forward, &[("label", "odd")])];

    let converter = test_converter();
    let (doc, logs) =
        with_captured_logs(|| converter.flat_to_graph(&[record], TEST_NAMESPACE).unwrap());
    let feature = doc.components().next().unwrap().sequence_features().next().unwrap();

    assert_eq!(feature.roles, vec![format!("{}{}", SO_NS, DEFAULT_SO_TERM)]);

    let warning = logs.lines()
        .find(|line| line.contains("`xyz123` has no corresponding GenBank to SO term"))
        .unwrap();
    assert!(warning.contains("WARN"));
    assert!(warning.contains("feature `odd` of record `BBa_J23101`"));
}

#[test]
fn test_references() {
    let doc = test_converter().flat_to_graph(&[make_test_record()], TEST_NAMESPACE).unwrap();

    let reference_identity = "https://test.sbol3.genbank/BBa_J23101/Reference_0";
    match doc.find(reference_identity) {
        Some(TopLevel::CustomTopLevel(custom)) => {
            assert!(custom.is_genbank_reference());
            assert_eq!(custom.display_id, "Reference_0");
        },
        other => panic!("expected a reference object, got {:?}", other),
    }

    match doc.extension(reference_identity) {
        Some(Extension::Reference(reference)) => {
            assert_eq!(reference.component.as_deref(), Some("BBa_J23101"));
            assert_eq!(reference.title.as_deref(), Some("Direct Submission"));
            assert_eq!(reference.comment, None);
            assert_eq!(reference.locations.len(), 1);
            assert_eq!(reference.locations[0].identity,
                       "https://test.sbol3.genbank/BBa_J23101/Reference_0/Range1");
        },
        other => panic!("expected reference fields, got {:?}", other),
    }
}

#[test]
fn test_qualifiers_stored_with_index() {
    let doc = test_converter().flat_to_graph(&[make_test_record()], TEST_NAMESPACE).unwrap();
    let json = doc.to_json().unwrap();

    assert!(json.contains("\"0:label\""));
    assert!(json.contains("\"2:note\""));
    assert!(json.contains("\"2:a\""));
}

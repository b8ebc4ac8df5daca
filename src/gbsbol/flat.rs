//! The normalized flat-file record model shared by the GenBank reader/writer
//! and the two converters.

use std::fmt::{self, Display};
use std::str::FromStr;

use indexmap::IndexMap;

use crate::location::{FlatInterval, FlatLocation, Strand};
use crate::types::{GenBankTerm, Qualifier, RecordId};

/// The record level metadata fields the converters know how to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKey {
    Date,
    DataFileDivision,
    Keywords,
    MoleculeType,
    Organism,
    Source,
    Taxonomy,
    Topology,
    Gi,
    Accessions,
    SequenceVersion,
    References,
}

impl AnnotationKey {
    pub fn as_str(&self) -> &'static str {
        match *self {
            AnnotationKey::Date => "date",
            AnnotationKey::DataFileDivision => "data_file_division",
            AnnotationKey::Keywords => "keywords",
            AnnotationKey::MoleculeType => "molecule_type",
            AnnotationKey::Organism => "organism",
            AnnotationKey::Source => "source",
            AnnotationKey::Taxonomy => "taxonomy",
            AnnotationKey::Topology => "topology",
            AnnotationKey::Gi => "gi",
            AnnotationKey::Accessions => "accessions",
            AnnotationKey::SequenceVersion => "sequence_version",
            AnnotationKey::References => "references",
        }
    }
}

impl Display for AnnotationKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnotationKey {
    type Err = ();

    fn from_str(key: &str) -> Result<AnnotationKey, ()> {
        Ok(match key {
            "date" => AnnotationKey::Date,
            "data_file_division" => AnnotationKey::DataFileDivision,
            "keywords" => AnnotationKey::Keywords,
            "molecule_type" => AnnotationKey::MoleculeType,
            "organism" => AnnotationKey::Organism,
            "source" => AnnotationKey::Source,
            "taxonomy" => AnnotationKey::Taxonomy,
            "topology" => AnnotationKey::Topology,
            "gi" => AnnotationKey::Gi,
            "accessions" => AnnotationKey::Accessions,
            "sequence_version" => AnnotationKey::SequenceVersion,
            "references" => AnnotationKey::References,
            _ => return Err(()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationValue {
    Text(String),
    Integer(i64),
    List(Vec<String>),
    References(Vec<FlatReference>),
}

impl AnnotationValue {
    pub fn shape(&self) -> &'static str {
        match self {
            AnnotationValue::Text(_) => "text",
            AnnotationValue::Integer(_) => "an integer",
            AnnotationValue::List(_) => "a list",
            AnnotationValue::References(_) => "a list of references",
        }
    }
}

/// A literature citation of a record.  Empty strings stand for absent fields,
/// as in the flat-file format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatReference {
    pub authors: String,
    pub title: String,
    pub journal: String,
    pub comment: String,
    pub consortium: String,
    pub medline_id: String,
    pub pubmed_id: String,
    pub location: Vec<FlatInterval>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatFeature {
    // GenBank feature key, eg. "CDS"
    pub kind: GenBankTerm,
    pub location: FlatLocation,
    pub qualifiers: Vec<Qualifier>,
}

impl FlatFeature {
    pub fn strand(&self) -> Strand {
        self.location.strand()
    }

    // the first "label" qualifier, if any
    pub fn label(&self) -> Option<&str> {
        self.qualifiers.iter()
            .find(|(key, _)| key == "label")
            .map(|(_, value)| value.as_str())
    }

    pub fn qualifier_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.qualifiers.iter()
            .filter(move |(qualifier_key, _)| qualifier_key == key)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRecord {
    // accession with version, eg. "BBa_J23101.1"
    pub id: RecordId,
    // the LOCUS name
    pub name: String,
    pub description: String,
    pub sequence: String,
    pub annotations: IndexMap<String, AnnotationValue>,
    pub features: Vec<FlatFeature>,
}

impl FlatRecord {
    pub fn new(id: &str, name: &str, description: &str, sequence: &str) -> FlatRecord {
        FlatRecord {
            id: id.to_owned(),
            name: name.to_owned(),
            description: description.to_owned(),
            sequence: sequence.to_owned(),
            annotations: IndexMap::new(),
            features: vec![],
        }
    }

    pub fn annotation(&self, key: AnnotationKey) -> Option<&AnnotationValue> {
        self.annotations.get(key.as_str())
    }

    pub fn set_annotation(&mut self, key: AnnotationKey, value: AnnotationValue) {
        self.annotations.insert(key.as_str().to_owned(), value);
    }

    pub fn text_annotation(&self, key: AnnotationKey) -> Option<&str> {
        match self.annotation(key) {
            Some(AnnotationValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn references(&self) -> &[FlatReference] {
        match self.annotation(AnnotationKey::References) {
            Some(AnnotationValue::References(references)) => references,
            _ => &[],
        }
    }
}

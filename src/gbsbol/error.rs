use std::path::PathBuf;

use thiserror::Error;

use crate::ontology::Direction;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("failed to read ontology table {path}: {message}")]
    OntologyTable {
        path: PathBuf,
        message: String,
    },
    #[error("no {direction} ontology table was loaded")]
    OntologyNotLoaded {
        direction: Direction,
    },
    #[error("the annotation `{field}` in the GenBank record `{record}` is not recognized as a standard annotation")]
    UnknownAnnotation {
        record: String,
        field: String,
    },
    #[error("the annotation `{field}` in the GenBank record `{record}` should be {expected}")]
    AnnotationType {
        record: String,
        field: String,
        expected: &'static str,
    },
    #[error("component `{component}` has {count} sequences, a component may only have 1 or 0 sequences")]
    MultipleSequences {
        component: String,
        count: usize,
    },
    #[error("location orientation `{orientation}` of feature `{feature}` in component `{component}` is not a valid orientation")]
    InvalidOrientation {
        component: String,
        feature: String,
        orientation: String,
    },
    #[error("invalid SBOL document: {0}")]
    DocumentFormat(String),
    #[error("GenBank error in {path}: {message}")]
    GenBank {
        path: PathBuf,
        message: String,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;

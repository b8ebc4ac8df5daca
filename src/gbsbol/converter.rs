use std::path::Path;

use tracing::info;

use crate::config::ConverterConfig;
use crate::error::Result;
use crate::extension::ExtensionRegistry;
use crate::flat::FlatRecord;
use crate::forward::ForwardConverter;
use crate::genbank::{read_genbank, write_genbank};
use crate::ontology::{Direction, OntologyMap};
use crate::reverse::{ConversionResult, ReverseConverter};
use crate::sbol::Document;

/// Converts between GenBank files and SBOL3 documents.
///
/// The ontology tables are loaded once, when the converter is created, and
/// are only read after that, so a `Converter` can be shared between threads.
/// Only the tables of the requested directions are loaded.
pub struct Converter {
    ontology: OntologyMap,
    registry: ExtensionRegistry,
    namespace: String,
}

impl Converter {
    // a converter for both directions
    pub fn new(config: &ConverterConfig) -> Result<Converter> {
        Converter::with_directions(config, &Direction::ALL)
    }

    pub fn with_directions(config: &ConverterConfig, directions: &[Direction])
        -> Result<Converter>
    {
        info!("Creating GenBank and SO ontologies mappings for sequence feature roles");

        let gb2so_path = directions.contains(&Direction::GenBankToSo)
            .then_some(config.gb2so_table.as_path());
        let so2gb_path = directions.contains(&Direction::SoToGenBank)
            .then_some(config.so2gb_table.as_path());

        let ontology = OntologyMap::load(gb2so_path, so2gb_path)?;

        Ok(Converter::from_parts(ontology, &config.namespace))
    }

    pub fn from_parts(ontology: OntologyMap, namespace: &str) -> Converter {
        Converter {
            ontology,
            registry: ExtensionRegistry::genbank(),
            namespace: namespace.to_owned(),
        }
    }

    pub fn ontology(&self) -> &OntologyMap {
        &self.ontology
    }

    // the registry used when reading documents
    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn flat_to_graph(&self, records: &[FlatRecord], namespace: &str) -> Result<Document> {
        let genbank_to_so = self.ontology.table(Direction::GenBankToSo)?;
        ForwardConverter::new(genbank_to_so).convert(records, namespace)
    }

    pub fn graph_to_flat(&self, doc: &Document) -> Result<ConversionResult> {
        let so_to_genbank = self.ontology.table(Direction::SoToGenBank)?;
        ReverseConverter::new(so_to_genbank).convert(doc)
    }

    pub fn read_document(&self, path: &Path) -> Result<Document> {
        Document::read(path, &self.registry)
    }

    /// Read `gb_file` and convert its records.  `namespace` overrides the
    /// configured namespace.  When `write` is set the document is also
    /// written to `sbol3_file`.
    pub fn genbank_to_sbol3(&self, gb_file: &Path, sbol3_file: &Path,
                            namespace: Option<&str>, write: bool)
        -> Result<Document>
    {
        let records = read_genbank(gb_file)?;
        let namespace = namespace.unwrap_or(self.namespace.as_str());

        let doc = self.flat_to_graph(&records, namespace)?;

        if write {
            doc.write(sbol3_file)?;
        }

        Ok(doc)
    }

    /// Convert a document, read from `sbol3_file` unless `doc` is given.  When
    /// `write` is set the records are also written to `gb_file`.
    pub fn sbol3_to_genbank(&self, sbol3_file: &Path, doc: Option<&Document>, gb_file: &Path,
                            write: bool)
        -> Result<ConversionResult>
    {
        let result =
            if let Some(doc) = doc {
                self.graph_to_flat(doc)?
            } else {
                let doc = self.read_document(sbol3_file)?;
                self.graph_to_flat(&doc)?
            };

        if write {
            write_genbank(gb_file, &result.records)?;
        }

        Ok(result)
    }
}

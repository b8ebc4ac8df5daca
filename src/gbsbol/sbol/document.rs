use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;
use tracing::info;

use crate::error::{ConversionError, Result};
use crate::extension::{Extension, ExtensionRegistry, StoredExtension};
use crate::sbol::make_identity;
use crate::sbol::objects::{Component, TopLevel};
use crate::types::Identity;

/// A set of top level objects in one namespace, plus the extension records
/// attached to them (or to their children) by identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    namespace: String,
    objects: Vec<TopLevel>,
    extensions: IndexMap<Identity, Extension>,
}

// the on-disk form of a Document
#[derive(Serialize, Deserialize, Debug)]
struct StoredDocument {
    namespace: String,
    objects: Vec<TopLevel>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    extensions: Vec<StoredExtension>,
}

impl Document {
    pub fn new(namespace: &str) -> Document {
        Document {
            namespace: namespace.to_owned(),
            objects: vec![],
            extensions: IndexMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn make_identity(&self, display_id: &str) -> Identity {
        make_identity(&self.namespace, display_id)
    }

    pub fn add(&mut self, object: TopLevel) -> Result<()> {
        if self.find(object.identity()).is_some() {
            return Err(ConversionError::DocumentFormat(
                format!("duplicate identity: {}", object.identity())));
        }
        self.objects.push(object);
        Ok(())
    }

    // look up by full identity, or by display id relative to the namespace
    pub fn find(&self, identity: &str) -> Option<&TopLevel> {
        self.objects.iter()
            .find(|object| object.identity() == identity)
            .or_else(|| {
                let identity = self.make_identity(identity);
                self.objects.iter().find(|object| *object.identity() == identity)
            })
    }

    pub fn objects(&self) -> impl Iterator<Item = &TopLevel> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.objects.iter()
            .filter_map(|object| {
                if let TopLevel::Component(component) = object {
                    Some(component)
                } else {
                    None
                }
            })
    }

    pub fn attach_extension(&mut self, identity: &Identity, extension: Extension) {
        self.extensions.insert(identity.clone(), extension);
    }

    pub fn extension(&self, identity: &str) -> Option<&Extension> {
        self.extensions.get(identity)
    }

    pub fn extensions(&self) -> impl Iterator<Item = (&Identity, &Extension)> {
        self.extensions.iter()
    }

    pub fn to_json(&self) -> Result<String> {
        let stored = self.to_stored()?;
        Ok(serde_json::to_string_pretty(&stored)?)
    }

    pub fn from_json(json: &str, registry: &ExtensionRegistry) -> Result<Document> {
        let stored: StoredDocument = serde_json::from_str(json)?;
        Document::from_stored(stored, registry)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        info!("writing SBOL3 document to {}", path.display());

        let stored = self.to_stored()?;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &stored)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(())
    }

    pub fn read(path: &Path, registry: &ExtensionRegistry) -> Result<Document> {
        info!("reading SBOL3 document from {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let stored: StoredDocument = serde_json::from_reader(reader)?;

        Document::from_stored(stored, registry)
    }

    fn to_stored(&self) -> Result<StoredDocument> {
        let extensions = self.extensions.iter()
            .map(|(identity, extension)| extension.to_stored(identity))
            .collect::<Result<Vec<_>>>()?;

        Ok(StoredDocument {
            namespace: self.namespace.clone(),
            objects: self.objects.clone(),
            extensions,
        })
    }

    fn from_stored(stored: StoredDocument, registry: &ExtensionRegistry) -> Result<Document> {
        let mut document = Document::new(&stored.namespace);

        for object in stored.objects {
            document.add(object)?;
        }

        for stored_extension in stored.extensions {
            let identity = stored_extension.identity.clone();
            let extension = registry.build(stored_extension)?;
            document.attach_extension(&identity, extension);
        }

        Ok(document)
    }
}

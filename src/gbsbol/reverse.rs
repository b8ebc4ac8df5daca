use indexmap::IndexMap;
use tracing::{info, warn};

use crate::constants::{DEFAULT_GB_SEQ_VERSION, SO_NS, SO_REVERSE, TAXONOMY_SEPARATOR};
use crate::error::{ConversionError, Result};
use crate::extension::{ComponentExtension, Extension, ReferenceExtension};
use crate::flat::{AnnotationKey, AnnotationValue, FlatFeature, FlatRecord, FlatReference};
use crate::location::{to_flat, FlatInterval, Strand};
use crate::ontology::OntologyTable;
use crate::sbol::{display_id_of, Document};
use crate::sbol::objects::{Component, SequenceFeature, TopLevel};
use crate::types::{FeatureSortKey, Identity, Qualifier};

/// The records built from a document, and for every top level object in the
/// document whether it was consumed by the conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionResult {
    pub status: IndexMap<Identity, bool>,
    pub records: Vec<FlatRecord>,
}

// Reference extensions grouped by the identity of the Component they name,
// in document order
pub type ReferenceMap<'d> = IndexMap<Identity, Vec<&'d ReferenceExtension>>;

pub fn collect_references(doc: &Document) -> ReferenceMap<'_> {
    let mut references: ReferenceMap = IndexMap::new();

    for object in doc.objects() {
        let TopLevel::CustomTopLevel(custom) = object else {
            continue;
        };
        if !custom.is_genbank_reference() {
            continue;
        }
        let Some(Extension::Reference(reference)) = doc.extension(&custom.identity) else {
            warn!("reference `{}` has no stored fields, skipping", custom.identity);
            continue;
        };

        let component =
            reference.component.as_deref().and_then(|display_id| doc.find(display_id));

        if let Some(TopLevel::Component(component)) = component {
            references.entry(component.identity.clone()).or_default().push(reference);
        } else {
            warn!("reference `{}` names component {:?} which isn't in the document",
                  custom.identity, reference.component);
        }
    }

    references
}

// "https://identifiers.org/SO:0000167" -> "SO:0000167"
fn short_role(role: &str) -> &str {
    role.strip_prefix(SO_NS).unwrap_or_else(|| display_id_of(role))
}

fn split_taxonomy(taxonomy: &str) -> Vec<String> {
    if taxonomy.is_empty() {
        vec![]
    } else {
        taxonomy.split(TAXONOMY_SEPARATOR).map(str::to_owned).collect()
    }
}

/// Builds flat-file records from the Components of a document.  The SO to
/// GenBank table is borrowed and never modified.
pub struct ReverseConverter<'a> {
    so_to_genbank: &'a OntologyTable,
}

impl<'a> ReverseConverter<'a> {
    pub fn new(so_to_genbank: &'a OntologyTable) -> ReverseConverter<'a> {
        ReverseConverter {
            so_to_genbank,
        }
    }

    pub fn convert(&self, doc: &Document) -> Result<ConversionResult> {
        let references = collect_references(doc);

        let mut result = ConversionResult::default();

        for object in doc.objects() {
            result.status.insert(object.identity().clone(), false);
        }

        for component in doc.components() {
            let record = self.convert_component(doc, component, &references, &mut result.status)?;
            result.status.insert(component.identity.clone(), true);
            result.records.push(record);
        }

        Ok(result)
    }

    fn convert_component(&self, doc: &Document, component: &Component,
                         references: &ReferenceMap, status: &mut IndexMap<Identity, bool>)
        -> Result<FlatRecord>
    {
        info!("Parsing component - `{}` in sbol3 document.", component.display_id);

        if component.sequences.len() > 1 {
            return Err(ConversionError::MultipleSequences {
                component: component.display_id.clone(),
                count: component.sequences.len(),
            });
        }

        let mut elements = String::new();

        if let Some(sequence_identity) = component.sequences.first() {
            match doc.find(sequence_identity) {
                Some(TopLevel::Sequence(sequence)) => {
                    elements = sequence.elements.as_deref().unwrap_or_default().to_uppercase();
                    status.insert(sequence.identity.clone(), true);
                },
                _ => {
                    warn!("sequence `{}` of component `{}` isn't in the document",
                          sequence_identity, component.display_id);
                },
            }
        }

        let component_extension =
            match doc.extension(&component.identity) {
                Some(Extension::Component(extension)) => Some(extension),
                _ => None,
            };

        let id = component_extension
            .and_then(|extension| extension.record_id.as_deref())
            .unwrap_or(component.display_id.as_str());
        let name = component_extension
            .and_then(|extension| extension.locus.as_deref())
            .unwrap_or(component.display_id.as_str());
        let description = component.description.as_deref().unwrap_or_default();

        let mut record = FlatRecord::new(id, name, description, &elements);

        if let Some(extension) = component_extension {
            restore_annotations(extension, &mut record);
        }

        if let Some(component_references) = references.get(&component.identity) {
            let flat_references = component_references.iter()
                .map(|reference| restore_reference(reference))
                .collect::<Vec<_>>();
            record.set_annotation(AnnotationKey::References,
                                  AnnotationValue::References(flat_references));
        }

        let mut features = vec![];
        for feature in component.sequence_features() {
            if feature.locations.is_empty() {
                warn!("feature `{}` of component `{}` has no locations, skipping",
                      feature.display_id, component.display_id);
                continue;
            }
            features.push(self.convert_feature(doc, component, feature)?);
        }

        // stable, so features with equal coordinates keep their document order
        features.sort_by(|(a_key, _), (b_key, _)| a_key.cmp(b_key));

        record.features = features.into_iter().map(|(_, feature)| feature).collect();

        Ok(record)
    }

    fn convert_feature(&self, doc: &Document, component: &Component, feature: &SequenceFeature)
        -> Result<(FeatureSortKey, FlatFeature)>
    {
        let feature_name = feature.name.as_deref().unwrap_or(feature.display_id.as_str());

        info!("Parsing feature `{}` for component `{}`", feature_name, component.display_id);

        let invalid_orientation = |orientation: String| {
            ConversionError::InvalidOrientation {
                component: component.display_id.clone(),
                feature: feature_name.to_owned(),
                orientation,
            }
        };

        let feature_strand = Strand::from_orientation(feature.orientation.as_deref())
            .map_err(|err| invalid_orientation(err.0))?;

        let (location, sort_key) = to_flat(&feature.locations, feature_strand)
            .map_err(|err| invalid_orientation(err.0))?;

        let context = format!("feature `{}` of component `{}`", feature_name,
                              component.display_id);
        let kind =
            match feature.roles.first() {
                Some(role) => self.so_to_genbank.get_or_default(short_role(role), &context),
                None => {
                    warn!("{} has no role, using the default GenBank term {}",
                          context, self.so_to_genbank.default_term());
                    self.so_to_genbank.default_term().clone()
                },
            };

        let qualifiers: Vec<Qualifier> =
            match doc.extension(&feature.identity) {
                Some(Extension::Feature(extension)) => extension.qualifiers.clone(),
                _ => {
                    if let Some(ref name) = feature.name {
                        vec![("label".to_owned(), name.clone())]
                    } else {
                        vec![]
                    }
                },
            };

        Ok((sort_key, FlatFeature {
            kind,
            location,
            qualifiers,
        }))
    }
}

// only the fields that were captured are restored
fn restore_annotations(extension: &ComponentExtension, record: &mut FlatRecord) {
    let mut set_text = |key, value: &Option<String>| {
        if let Some(value) = value {
            record.set_annotation(key, AnnotationValue::Text(value.clone()));
        }
    };

    set_text(AnnotationKey::Date, &extension.date);
    set_text(AnnotationKey::DataFileDivision, &extension.division);
    set_text(AnnotationKey::MoleculeType, &extension.molecule_type);
    set_text(AnnotationKey::Organism, &extension.organism);
    set_text(AnnotationKey::Topology, &extension.topology);
    set_text(AnnotationKey::Gi, &extension.gi);

    // an empty source means the flat file had the implicit default
    if let Some(ref source) = extension.source {
        if !source.is_empty() {
            record.set_annotation(AnnotationKey::Source, AnnotationValue::Text(source.clone()));
        }
    }

    if let Some(ref keywords) = extension.keywords {
        let mut keywords = keywords.clone();
        keywords.sort();
        record.set_annotation(AnnotationKey::Keywords, AnnotationValue::List(keywords));
    }

    if let Some(ref taxonomy) = extension.taxonomy {
        record.set_annotation(AnnotationKey::Taxonomy,
                              AnnotationValue::List(split_taxonomy(taxonomy)));
    }

    if let Some(ref accessions) = extension.accessions {
        let mut accessions = accessions.clone();
        accessions.sort();
        record.set_annotation(AnnotationKey::Accessions, AnnotationValue::List(accessions));
    }

    let sequence_version = extension.seq_version.unwrap_or(DEFAULT_GB_SEQ_VERSION);
    record.set_annotation(AnnotationKey::SequenceVersion,
                          AnnotationValue::Integer(sequence_version));
}

fn restore_reference(reference: &ReferenceExtension) -> FlatReference {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    let location = reference.locations.iter()
        .map(|location| {
            let strand =
                if location.orientation.as_deref() == Some(SO_REVERSE) {
                    Strand::Reverse
                } else {
                    Strand::Forward
                };
            FlatInterval::new(location.start(), location.end(), strand)
        })
        .collect();

    FlatReference {
        authors: text(&reference.authors),
        title: text(&reference.title),
        journal: text(&reference.journal),
        comment: text(&reference.comment),
        consortium: text(&reference.consrtm),
        medline_id: text(&reference.medline_id),
        pubmed_id: text(&reference.pubmed_id),
        location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_role() {
        assert_eq!(short_role("https://identifiers.org/SO:0000167"), "SO:0000167");
        assert_eq!(short_role("http://purl.obolibrary.org/obo/SO_0000167"), "SO_0000167");
    }

    #[test]
    fn test_restore_only_captured_fields() {
        let extension = ComponentExtension {
            source: Some(String::new()),
            taxonomy: Some("Bacteria,Proteobacteria".to_owned()),
            seq_version: Some(3),
            ..ComponentExtension::default()
        };
        let mut record = FlatRecord::new("x", "x", "", "");
        restore_annotations(&extension, &mut record);

        assert!(record.annotation(AnnotationKey::Source).is_none());
        assert!(record.annotation(AnnotationKey::Date).is_none());
        assert_eq!(record.annotation(AnnotationKey::Taxonomy),
                   Some(&AnnotationValue::List(vec!["Bacteria".to_owned(),
                                                    "Proteobacteria".to_owned()])));
        assert_eq!(record.annotation(AnnotationKey::SequenceVersion),
                   Some(&AnnotationValue::Integer(3)));

        let mut record = FlatRecord::new("x", "x", "", "");
        restore_annotations(&ComponentExtension::default(), &mut record);
        assert_eq!(record.annotation(AnnotationKey::SequenceVersion),
                   Some(&AnnotationValue::Integer(DEFAULT_GB_SEQ_VERSION)));
    }
}

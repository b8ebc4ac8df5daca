use tracing::{info, warn};

use crate::constants::{GENBANK_REFERENCE_NS, IUPAC_DNA_ENCODING, SBO_DNA, SO_CIRCULAR,
                       SO_ENGINEERED_REGION, SO_LINEAR, SO_NS, TAXONOMY_SEPARATOR};
use crate::error::{ConversionError, Result};
use crate::extension::{ComponentExtension, Extension, FeatureExtension, ReferenceExtension};
use crate::flat::{AnnotationKey, AnnotationValue, FlatFeature, FlatRecord, FlatReference};
use crate::location::{to_graph, FlatInterval};
use crate::ontology::OntologyTable;
use crate::sbol::{child_identity, Document};
use crate::sbol::objects::{assign_location_identities, Component, CustomTopLevel, Location,
                           Sequence, SequenceFeature, TopLevel};
use crate::types::Identity;

/// Builds SBOL objects from flat-file records.  The GenBank to SO table is
/// borrowed for the lifetime of the converter and never modified.
pub struct ForwardConverter<'a> {
    genbank_to_so: &'a OntologyTable,
}

fn none_if_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}

fn sorted(list: &[String]) -> Vec<String> {
    let mut list = list.to_vec();
    list.sort();
    list
}

// an explicit topology wins, then a division holding "circular" or "linear"
pub fn record_topology(record: &FlatRecord) -> &str {
    if let Some(topology) = record.text_annotation(AnnotationKey::Topology) {
        return topology;
    }
    match record.text_annotation(AnnotationKey::DataFileDivision) {
        Some(division @ ("circular" | "linear")) => division,
        _ => "linear",
    }
}

fn graph_locations(parts: &[FlatInterval], sequence: &Identity) -> Vec<Location> {
    parts.iter().map(|part| to_graph(part, sequence)).collect()
}

impl<'a> ForwardConverter<'a> {
    pub fn new(genbank_to_so: &'a OntologyTable) -> ForwardConverter<'a> {
        ForwardConverter {
            genbank_to_so,
        }
    }

    /// Convert every record into a new document in `namespace`.
    pub fn convert(&self, records: &[FlatRecord], namespace: &str) -> Result<Document> {
        let mut doc = Document::new(namespace);

        for record in records {
            self.convert_record(record, &mut doc)?;
        }

        Ok(doc)
    }

    /// Add the Component, Sequence and References for one record to `doc`,
    /// returning the identity of the Component.
    pub fn convert_record(&self, record: &FlatRecord, doc: &mut Document) -> Result<Identity> {
        info!("Parsing record - `{}` in genbank.", record.id);

        let topology_type =
            if record_topology(record) == "circular" {
                SO_CIRCULAR
            } else {
                SO_LINEAR
            };

        let mut component =
            Component::new(doc.make_identity(&record.name), record.name.clone(),
                           vec![SBO_DNA.to_owned(), topology_type.to_owned()]);
        component.roles = vec![SO_ENGINEERED_REGION.to_owned()];
        component.description = none_if_empty(&record.description);

        let sequence_display_id = format!("{}_sequence", record.name);
        let sequence = Sequence {
            identity: doc.make_identity(&sequence_display_id),
            display_id: sequence_display_id,
            elements: Some(record.sequence.to_lowercase()),
            encoding: Some(IUPAC_DNA_ENCODING.to_owned()),
        };
        component.sequences = vec![sequence.identity.clone()];

        let component_extension =
            self.store_annotations(record, &component, &sequence.identity, doc)?;

        let mut feature_extensions = vec![];

        for feature in &record.features {
            let (sequence_feature, qualifiers) =
                self.make_feature(record, feature, &sequence.identity);
            let feature_identity = component.add_sequence_feature(sequence_feature);
            feature_extensions.push((feature_identity, qualifiers));
        }

        let component_identity = component.identity.clone();

        doc.add(TopLevel::Component(component))?;
        doc.add(TopLevel::Sequence(sequence))?;

        doc.attach_extension(&component_identity, Extension::Component(component_extension));
        for (feature_identity, qualifiers) in feature_extensions {
            doc.attach_extension(&feature_identity, Extension::Feature(qualifiers));
        }

        Ok(component_identity)
    }

    // Move the record level annotations into a ComponentExtension.  References
    // become top level objects in `doc`.  Any annotation that isn't one of the
    // known keys is an error.
    fn store_annotations(&self, record: &FlatRecord, component: &Component,
                         sequence: &Identity, doc: &mut Document)
        -> Result<ComponentExtension>
    {
        let mut extension = ComponentExtension {
            record_id: Some(record.id.clone()),
            ..ComponentExtension::default()
        };

        let type_error = |field: &str, expected: &'static str| {
            ConversionError::AnnotationType {
                record: record.id.clone(),
                field: field.to_owned(),
                expected,
            }
        };

        for (field, value) in &record.annotations {
            let key: AnnotationKey = field.parse().map_err(|_| {
                ConversionError::UnknownAnnotation {
                    record: record.id.clone(),
                    field: field.clone(),
                }
            })?;

            warn!("Extraneous information not directly storeable in SBOL3 - {}: {:?}",
                  field, value);

            match (key, value) {
                (AnnotationKey::Date, AnnotationValue::Text(date)) => {
                    extension.date = Some(date.clone());
                },
                (AnnotationKey::DataFileDivision, AnnotationValue::Text(division)) => {
                    // some files put the topology in the division slot
                    if division == "circular" || division == "linear" {
                        extension.topology = Some(division.clone());
                    } else {
                        extension.division = Some(division.clone());
                    }
                },
                (AnnotationKey::Keywords, AnnotationValue::List(keywords)) => {
                    extension.keywords = Some(sorted(keywords));
                },
                (AnnotationKey::MoleculeType, AnnotationValue::Text(molecule_type)) => {
                    extension.molecule_type = Some(molecule_type.clone());
                },
                (AnnotationKey::Organism, AnnotationValue::Text(organism)) => {
                    extension.organism = Some(organism.clone());
                },
                (AnnotationKey::Source, AnnotationValue::Text(source)) => {
                    extension.source = Some(source.clone());
                },
                (AnnotationKey::Taxonomy, AnnotationValue::List(taxonomy)) => {
                    extension.taxonomy = Some(taxonomy.join(TAXONOMY_SEPARATOR));
                },
                (AnnotationKey::Topology, AnnotationValue::Text(topology)) => {
                    extension.topology = Some(topology.clone());
                },
                (AnnotationKey::Gi, AnnotationValue::Text(gi)) => {
                    extension.gi = Some(gi.clone());
                },
                (AnnotationKey::Accessions, AnnotationValue::List(accessions)) => {
                    extension.accessions = Some(sorted(accessions));
                },
                (AnnotationKey::SequenceVersion, AnnotationValue::Integer(version)) => {
                    extension.seq_version = Some(*version);
                },
                (AnnotationKey::References, AnnotationValue::References(references)) => {
                    for (index, reference) in references.iter().enumerate() {
                        self.store_reference(index, reference, component, sequence, doc)?;
                    }
                },
                (AnnotationKey::Keywords | AnnotationKey::Taxonomy |
                 AnnotationKey::Accessions, _) => {
                    return Err(type_error(field, AnnotationValue::List(vec![]).shape()));
                },
                (AnnotationKey::SequenceVersion, _) => {
                    return Err(type_error(field, AnnotationValue::Integer(0).shape()));
                },
                (AnnotationKey::References, _) => {
                    return Err(type_error(field, AnnotationValue::References(vec![]).shape()));
                },
                _ => {
                    return Err(type_error(field, AnnotationValue::Text(String::new()).shape()));
                },
            }
        }

        extension.locus = Some(record.name.clone());

        Ok(extension)
    }

    fn store_reference(&self, index: usize, reference: &FlatReference, component: &Component,
                       sequence: &Identity, doc: &mut Document)
        -> Result<()>
    {
        let display_id = format!("Reference_{}", index);
        let identity = child_identity(&component.identity, &display_id);

        let mut locations = graph_locations(&reference.location, sequence);
        assign_location_identities(&identity, &mut locations);

        let extension = ReferenceExtension {
            authors: none_if_empty(&reference.authors),
            comment: none_if_empty(&reference.comment),
            journal: none_if_empty(&reference.journal),
            consrtm: none_if_empty(&reference.consortium),
            title: none_if_empty(&reference.title),
            medline_id: none_if_empty(&reference.medline_id),
            pubmed_id: none_if_empty(&reference.pubmed_id),
            component: Some(component.display_id.clone()),
            locations,
        };

        doc.add(TopLevel::CustomTopLevel(CustomTopLevel {
            identity: identity.clone(),
            display_id,
            type_uri: GENBANK_REFERENCE_NS.to_owned(),
        }))?;
        doc.attach_extension(&identity, Extension::Reference(extension));

        Ok(())
    }

    fn make_feature(&self, record: &FlatRecord, feature: &FlatFeature, sequence: &Identity)
        -> (SequenceFeature, FeatureExtension)
    {
        let name = feature.label().map(str::to_owned);
        let description = name.as_deref().unwrap_or(feature.kind.as_str());

        info!("Parsing feature `{}` for record `{}`", description, record.id);

        let context = format!("feature `{}` of record `{}`", description, record.name);
        let so_term = self.genbank_to_so.get_or_default(feature.kind.as_str(), &context);
        let role = format!("{}{}", SO_NS, so_term);

        let locations = graph_locations(feature.location.parts(), sequence);
        let orientation = feature.strand().orientation_uri().to_owned();

        let sequence_feature =
            SequenceFeature::new(name, vec![role], Some(orientation), locations);

        (sequence_feature, FeatureExtension {
            qualifiers: feature.qualifiers.clone(),
        })
    }
}

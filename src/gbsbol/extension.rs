//! Named fields attached to SBOL objects, by identity, to carry GenBank data
//! that has no native SBOL slot.
//!
//! Each record is stored in a document under a type URI.  Reading a document
//! goes through an `ExtensionRegistry`, which maps each type URI to the
//! function that builds the typed record.  Entries with an unregistered type
//! URI are kept as `Extension::Opaque` so that they survive a read/write.

use std::collections::HashMap;

use serde_json::Value;

use crate::constants::{GENBANK_EXTRA_PROPERTY_NS, GENBANK_FEATURE_QUALIFIER_NS,
                       GENBANK_REFERENCE_NS, QUALIFIER_INDEX_SEPARATOR};
use crate::error::{ConversionError, Result};
use crate::sbol::objects::Location;
use crate::types::{Identity, Qualifier, TypeUri};

/// Record level GenBank metadata for a Component.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ComponentExtension {
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub seq_version: Option<i64>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub date: Option<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub division: Option<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub locus: Option<String>,
    #[serde(rename = "molecule", skip_serializing_if="Option::is_none", default)]
    pub molecule_type: Option<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub organism: Option<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub source: Option<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub topology: Option<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub gi: Option<String>,
    #[serde(rename = "id", skip_serializing_if="Option::is_none", default)]
    pub record_id: Option<String>,
    // joined with TAXONOMY_SEPARATOR
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub taxonomy: Option<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub accessions: Option<Vec<String>>,
}

/// The qualifiers of a GenBank feature, in their original order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureExtension {
    pub qualifiers: Vec<Qualifier>,
}

// The stored form of FeatureExtension.  Each key and value carries its
// position as an "<index>:" prefix, so the order can be recovered from
// storage that doesn't keep it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StoredQualifiers {
    #[serde(default)]
    pub key: Vec<String>,
    #[serde(default)]
    pub value: Vec<String>,
}

/// A GenBank REFERENCE, stored as its own top level object and linked to its
/// Component by display id.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ReferenceExtension {
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub authors: Option<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub comment: Option<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub journal: Option<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub consrtm: Option<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub title: Option<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub medline_id: Option<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub pubmed_id: Option<String>,
    // display id of the owning Component
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub component: Option<String>,
    #[serde(rename = "location", skip_serializing_if="Vec::is_empty", default)]
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Extension {
    Component(ComponentExtension),
    Feature(FeatureExtension),
    Reference(ReferenceExtension),
    Opaque {
        type_uri: TypeUri,
        fields: Value,
    },
}

impl Extension {
    pub fn type_uri(&self) -> &str {
        match self {
            Extension::Component(_) => GENBANK_EXTRA_PROPERTY_NS,
            Extension::Feature(_) => GENBANK_FEATURE_QUALIFIER_NS,
            Extension::Reference(_) => GENBANK_REFERENCE_NS,
            Extension::Opaque { type_uri, .. } => type_uri,
        }
    }

    pub fn to_stored(&self, identity: &Identity) -> Result<StoredExtension> {
        let fields =
            match self {
                Extension::Component(component) => serde_json::to_value(component)?,
                Extension::Feature(feature) =>
                    serde_json::to_value(encode_qualifiers(&feature.qualifiers))?,
                Extension::Reference(reference) => serde_json::to_value(reference)?,
                Extension::Opaque { fields, .. } => fields.clone(),
            };

        Ok(StoredExtension {
            identity: identity.clone(),
            type_uri: self.type_uri().to_owned(),
            fields,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredExtension {
    pub identity: Identity,
    pub type_uri: TypeUri,
    pub fields: Value,
}

pub type ExtensionBuilder = fn(Value) -> Result<Extension>;

fn build_component_extension(fields: Value) -> Result<Extension> {
    Ok(Extension::Component(serde_json::from_value(fields)?))
}

fn build_feature_extension(fields: Value) -> Result<Extension> {
    let stored: StoredQualifiers = serde_json::from_value(fields)?;
    Ok(Extension::Feature(FeatureExtension {
        qualifiers: decode_qualifiers(&stored)?,
    }))
}

fn build_reference_extension(fields: Value) -> Result<Extension> {
    Ok(Extension::Reference(serde_json::from_value(fields)?))
}

#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    builders: HashMap<TypeUri, ExtensionBuilder>,
}

impl ExtensionRegistry {
    pub fn new() -> ExtensionRegistry {
        ExtensionRegistry::default()
    }

    // a registry that knows the three GenBank extension types
    pub fn genbank() -> ExtensionRegistry {
        let mut registry = ExtensionRegistry::new();
        registry.register(GENBANK_EXTRA_PROPERTY_NS, build_component_extension);
        registry.register(GENBANK_FEATURE_QUALIFIER_NS, build_feature_extension);
        registry.register(GENBANK_REFERENCE_NS, build_reference_extension);
        registry
    }

    pub fn register(&mut self, type_uri: &str, builder: ExtensionBuilder) {
        self.builders.insert(type_uri.to_owned(), builder);
    }

    pub fn is_registered(&self, type_uri: &str) -> bool {
        self.builders.contains_key(type_uri)
    }

    pub fn build(&self, stored: StoredExtension) -> Result<Extension> {
        if let Some(builder) = self.builders.get(&stored.type_uri) {
            builder(stored.fields).map_err(|err| {
                ConversionError::DocumentFormat(format!("extension of {}: {}", stored.identity, err))
            })
        } else {
            Ok(Extension::Opaque {
                type_uri: stored.type_uri,
                fields: stored.fields,
            })
        }
    }
}

pub fn encode_indexed(index: usize, text: &str) -> String {
    format!("{}{}{}", index, QUALIFIER_INDEX_SEPARATOR, text)
}

pub fn decode_indexed(text: &str) -> Result<(usize, &str)> {
    let bad_prefix = || {
        ConversionError::DocumentFormat(format!("qualifier `{}` has no index prefix", text))
    };

    let (index, rest) = text.split_once(QUALIFIER_INDEX_SEPARATOR).ok_or_else(bad_prefix)?;
    let index = index.parse::<usize>().map_err(|_| bad_prefix())?;

    Ok((index, rest))
}

pub fn encode_qualifiers(qualifiers: &[Qualifier]) -> StoredQualifiers {
    let mut stored = StoredQualifiers::default();
    for (index, (key, value)) in qualifiers.iter().enumerate() {
        stored.key.push(encode_indexed(index, key));
        stored.value.push(encode_indexed(index, value));
    }
    stored
}

// sort keys and values by their index prefix, then pair them up
pub fn decode_qualifiers(stored: &StoredQualifiers) -> Result<Vec<Qualifier>> {
    if stored.key.len() != stored.value.len() {
        return Err(ConversionError::DocumentFormat(
            format!("{} qualifier keys but {} qualifier values",
                    stored.key.len(), stored.value.len())));
    }

    let mut keys = stored.key.iter()
        .map(|key| decode_indexed(key))
        .collect::<Result<Vec<_>>>()?;
    let mut values = stored.value.iter()
        .map(|value| decode_indexed(value))
        .collect::<Result<Vec<_>>>()?;

    keys.sort_by_key(|(index, _)| *index);
    values.sort_by_key(|(index, _)| *index);

    keys.into_iter().zip(values)
        .map(|((key_index, key), (value_index, value))| {
            if key_index == value_index {
                Ok((key.to_owned(), value.to_owned()))
            } else {
                Err(ConversionError::DocumentFormat(
                    format!("qualifier key `{}` has index {} but its value has index {}",
                            key, key_index, value_index)))
            }
        })
        .collect()
}

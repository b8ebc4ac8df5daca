use crate::constants::GENBANK_REFERENCE_NS;
use crate::sbol::{child_identity, next_child_display_id};
use crate::types::{DisplayId, Identity, TypeUri};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum LocationKind {
    Range {
        start: i64,
        end: i64,
    },
    Cut {
        at: i64,
    },
}

impl LocationKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            LocationKind::Range { .. } => "Range",
            LocationKind::Cut { .. } => "Cut",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub identity: Identity,
    pub sequence: Identity,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub orientation: Option<String>,
    pub kind: LocationKind,
}

impl Location {
    pub fn start(&self) -> i64 {
        match self.kind {
            LocationKind::Range { start, .. } => start,
            LocationKind::Cut { at } => at,
        }
    }

    pub fn end(&self) -> i64 {
        match self.kind {
            LocationKind::Range { end, .. } => end,
            LocationKind::Cut { at } => at,
        }
    }

    pub fn is_point(&self) -> bool {
        self.start() == self.end()
    }
}

// give each location an identity under `parent`, numbered per location type
pub fn assign_location_identities(parent: &Identity, locations: &mut [Location]) {
    let mut used: Vec<DisplayId> = vec![];
    for location in locations.iter_mut() {
        let display_id = next_child_display_id(location.kind.type_name(), &used);
        location.identity = child_identity(parent, &display_id);
        used.push(display_id);
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SequenceFeature {
    pub identity: Identity,
    pub display_id: DisplayId,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    pub roles: Vec<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub orientation: Option<String>,
    pub locations: Vec<Location>,
}

impl SequenceFeature {
    pub fn new(name: Option<String>, roles: Vec<String>, orientation: Option<String>,
               locations: Vec<Location>) -> SequenceFeature {
        SequenceFeature {
            identity: Identity::new(),
            display_id: DisplayId::new(),
            name,
            roles,
            orientation,
            locations,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubComponent {
    pub identity: Identity,
    pub display_id: DisplayId,
    pub instance_of: Identity,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    pub locations: Vec<Location>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Feature {
    SequenceFeature(SequenceFeature),
    SubComponent(SubComponent),
}

impl Feature {
    pub fn identity(&self) -> &Identity {
        match self {
            Feature::SequenceFeature(feature) => &feature.identity,
            Feature::SubComponent(sub_component) => &sub_component.identity,
        }
    }

    pub fn display_id(&self) -> &DisplayId {
        match self {
            Feature::SequenceFeature(feature) => &feature.display_id,
            Feature::SubComponent(sub_component) => &sub_component.display_id,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Feature::SequenceFeature(_) => "SequenceFeature",
            Feature::SubComponent(_) => "SubComponent",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Component {
    pub identity: Identity,
    pub display_id: DisplayId,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub description: Option<String>,
    pub types: Vec<String>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    pub roles: Vec<String>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    pub sequences: Vec<Identity>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    pub features: Vec<Feature>,
}

impl Component {
    pub fn new(identity: Identity, display_id: DisplayId, types: Vec<String>) -> Component {
        Component {
            identity,
            display_id,
            name: None,
            description: None,
            types,
            roles: vec![],
            sequences: vec![],
            features: vec![],
        }
    }

    fn next_feature_display_id(&self, type_name: &str) -> DisplayId {
        let used = self.features.iter()
            .filter(|feature| feature.type_name() == type_name)
            .map(|feature| feature.display_id().clone())
            .collect::<Vec<_>>();
        next_child_display_id(type_name, &used)
    }

    // adds the feature as a child of this component, assigning identities to
    // the feature and its locations
    pub fn add_sequence_feature(&mut self, mut feature: SequenceFeature) -> Identity {
        let display_id = self.next_feature_display_id("SequenceFeature");
        feature.identity = child_identity(&self.identity, &display_id);
        feature.display_id = display_id;
        assign_location_identities(&feature.identity, &mut feature.locations);
        let identity = feature.identity.clone();
        self.features.push(Feature::SequenceFeature(feature));
        identity
    }

    pub fn add_sub_component(&mut self, instance_of: Identity) -> Identity {
        let display_id = self.next_feature_display_id("SubComponent");
        let identity = child_identity(&self.identity, &display_id);
        self.features.push(Feature::SubComponent(SubComponent {
            identity: identity.clone(),
            display_id,
            instance_of,
            locations: vec![],
        }));
        identity
    }

    pub fn sequence_features(&self) -> impl Iterator<Item = &SequenceFeature> {
        self.features.iter()
            .filter_map(|feature| {
                if let Feature::SequenceFeature(sequence_feature) = feature {
                    Some(sequence_feature)
                } else {
                    None
                }
            })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Sequence {
    pub identity: Identity,
    pub display_id: DisplayId,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub elements: Option<String>,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub encoding: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Attachment {
    pub identity: Identity,
    pub display_id: DisplayId,
    pub source: String,
    #[serde(skip_serializing_if="Option::is_none", default)]
    pub format: Option<String>,
}

// a top level object whose content lives in an extension record
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CustomTopLevel {
    pub identity: Identity,
    pub display_id: DisplayId,
    pub type_uri: TypeUri,
}

impl CustomTopLevel {
    pub fn is_genbank_reference(&self) -> bool {
        self.type_uri == GENBANK_REFERENCE_NS
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum TopLevel {
    Component(Component),
    Sequence(Sequence),
    Attachment(Attachment),
    CustomTopLevel(CustomTopLevel),
}

impl TopLevel {
    pub fn identity(&self) -> &Identity {
        match self {
            TopLevel::Component(component) => &component.identity,
            TopLevel::Sequence(sequence) => &sequence.identity,
            TopLevel::Attachment(attachment) => &attachment.identity,
            TopLevel::CustomTopLevel(custom) => &custom.identity,
        }
    }

    pub fn display_id(&self) -> &DisplayId {
        match self {
            TopLevel::Component(component) => &component.display_id,
            TopLevel::Sequence(sequence) => &sequence.display_id,
            TopLevel::Attachment(attachment) => &attachment.display_id,
            TopLevel::CustomTopLevel(custom) => &custom.display_id,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            TopLevel::Component(_) => "Component",
            TopLevel::Sequence(_) => "Sequence",
            TopLevel::Attachment(_) => "Attachment",
            TopLevel::CustomTopLevel(_) => "CustomTopLevel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SO_FORWARD;

    fn range(start: i64, end: i64) -> Location {
        Location {
            identity: Identity::new(),
            sequence: "https://example.org/seq".to_owned(),
            orientation: Some(SO_FORWARD.to_owned()),
            kind: LocationKind::Range { start, end },
        }
    }

    #[test]
    fn test_child_identities() {
        let mut component = Component::new("https://example.org/comp".to_owned(),
                                           "comp".to_owned(), vec![]);
        let cut = Location {
            kind: LocationKind::Cut { at: 4 },
            ..range(0, 0)
        };
        let first = SequenceFeature::new(None, vec![], None, vec![range(0, 5), cut, range(8, 9)]);
        let second = SequenceFeature::new(Some("f2".to_owned()), vec![], None, vec![range(1, 2)]);

        assert_eq!(component.add_sequence_feature(first),
                   "https://example.org/comp/SequenceFeature1");
        assert_eq!(component.add_sequence_feature(second),
                   "https://example.org/comp/SequenceFeature2");
        assert_eq!(component.add_sub_component("https://example.org/other".to_owned()),
                   "https://example.org/comp/SubComponent1");

        let features = component.sequence_features().collect::<Vec<_>>();
        assert_eq!(features.len(), 2);
        let location_ids = features[0].locations.iter()
            .map(|loc| loc.identity.as_str())
            .collect::<Vec<_>>();
        assert_eq!(location_ids,
                   vec!["https://example.org/comp/SequenceFeature1/Range1",
                        "https://example.org/comp/SequenceFeature1/Cut1",
                        "https://example.org/comp/SequenceFeature1/Range2"]);
    }
}

use flexstr::SharedStr as FlexStr;

// full URI of an SBOL object, eg. "https://test.sbol3.genbank/BBa_J23101"
pub type Identity = String;
pub type DisplayId = String;
pub type TypeUri = String;

// a GenBank feature key like "CDS" or "misc_feature"
pub type GenBankTerm = FlexStr;
// a short Sequence Ontology id like "SO:0000316"
pub type SoTerm = FlexStr;

pub type RecordId = String;
pub type Qualifier = (String, String);

// start/end pairs of a feature's locations, in emission order
pub type FeatureSortKey = Vec<i64>;

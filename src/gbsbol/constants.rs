pub const SO_NS: &str = "https://identifiers.org/";
pub const SBO_DNA: &str = "https://identifiers.org/SBO:0000251";
pub const SO_ENGINEERED_REGION: &str = "https://identifiers.org/SO:0000804";
pub const SO_LINEAR: &str = "https://identifiers.org/SO:0000987";
pub const SO_CIRCULAR: &str = "https://identifiers.org/SO:0000988";
pub const SO_FORWARD: &str = "https://identifiers.org/SO:0001030";
pub const SO_REVERSE: &str = "https://identifiers.org/SO:0001031";
pub const IUPAC_DNA_ENCODING: &str = "https://identifiers.org/edam:format_1207";

pub const TEST_NAMESPACE: &str = "https://test.sbol3.genbank/";

// used when an ontology lookup misses
pub const DEFAULT_SO_TERM: &str = "SO:0000110";
pub const DEFAULT_GB_TERM: &str = "misc_feature";

// the reverse path falls back to this when no version was captured
pub const DEFAULT_GB_SEQ_VERSION: i64 = 1;

pub const BIO_STRAND_FORWARD: i8 = 1;
pub const BIO_STRAND_REVERSE: i8 = -1;

pub const GENBANK_EXTRA_PROPERTY_NS: &str = "http://www.ncbi.nlm.nih.gov/genbank";
pub const GENBANK_REFERENCE_NS: &str = "http://www.ncbi.nlm.nih.gov/genbank#reference";
pub const GENBANK_FEATURE_QUALIFIER_NS: &str = "http://www.ncbi.nlm.nih.gov/genbank#featureQualifier";

pub const GB2SO_TABLE_FILE_NAME: &str = "data/gb2so.csv";
pub const SO2GB_TABLE_FILE_NAME: &str = "data/so2gb.csv";

pub const TAXONOMY_SEPARATOR: &str = ",";
// separates the position index from a stored qualifier key or value
pub const QUALIFIER_INDEX_SEPARATOR: char = ':';

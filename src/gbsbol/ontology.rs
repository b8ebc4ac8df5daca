use std::collections::HashMap;
use std::fmt::{self, Display};
use std::io::Read;
use std::path::Path;

use flexstr::SharedStr as FlexStr;
use tracing::{info, warn};

use crate::constants::{DEFAULT_GB_TERM, DEFAULT_SO_TERM};
use crate::error::{ConversionError, Result};

// column names come from the mapping CSV files in data/
#[derive(Debug, Deserialize)]
struct OntologyTableRecord {
    #[serde(rename = "GenBank_Ontology")]
    genbank_term: String,
    #[serde(rename = "SO_Ontology")]
    so_term: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    GenBankToSo,
    SoToGenBank,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::GenBankToSo, Direction::SoToGenBank];

    pub fn default_term(&self) -> &'static str {
        match *self {
            Direction::GenBankToSo => DEFAULT_SO_TERM,
            Direction::SoToGenBank => DEFAULT_GB_TERM,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Direction::GenBankToSo => f.write_str("GenBank to SO"),
            Direction::SoToGenBank => f.write_str("SO to GenBank"),
        }
    }
}

/// One direction of the GenBank feature key <-> Sequence Ontology mapping.
/// Read-only once loaded.
#[derive(Debug, Clone)]
pub struct OntologyTable {
    direction: Direction,
    terms: HashMap<String, FlexStr>,
    default_term: FlexStr,
}

impl OntologyTable {
    pub fn from_reader<R: Read>(reader: R, direction: Direction)
        -> std::result::Result<OntologyTable, csv::Error>
    {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let mut terms = HashMap::new();

        for result in csv_reader.deserialize() {
            let record: OntologyTableRecord = result?;

            let (key, value) =
                match direction {
                    Direction::GenBankToSo => (record.genbank_term, record.so_term),
                    Direction::SoToGenBank => (record.so_term, record.genbank_term),
                };

            terms.insert(key, value.into());
        }

        Ok(OntologyTable {
            direction,
            terms,
            default_term: direction.default_term().into(),
        })
    }

    pub fn load(path: &Path, direction: Direction) -> Result<OntologyTable> {
        info!("Parsing {} for {} ontology mappings", path.display(), direction);

        let table_error = |err: &dyn Display| {
            ConversionError::OntologyTable {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        };

        let file = std::fs::File::open(path).map_err(|err| table_error(&err))?;

        OntologyTable::from_reader(file, direction).map_err(|err| table_error(&err))
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn default_term(&self) -> &FlexStr {
        &self.default_term
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    // exact, case-sensitive match
    pub fn get(&self, term: &str) -> Option<&FlexStr> {
        self.terms.get(term)
    }

    // a miss is never an error: the default term is returned and a warning
    // naming `context` is logged
    pub fn get_or_default(&self, term: &str, context: &str) -> FlexStr {
        if let Some(mapped) = self.get(term) {
            mapped.clone()
        } else {
            warn!("{}: `{}` has no corresponding {} term, using the default term {}",
                  context, term, self.direction, self.default_term);
            self.default_term.clone()
        }
    }
}

/// The directions requested by a converter, built once and passed explicitly
/// to the forward and reverse converters.  A direction that wasn't requested
/// has no table.
#[derive(Debug, Clone, Default)]
pub struct OntologyMap {
    genbank_to_so: Option<OntologyTable>,
    so_to_genbank: Option<OntologyTable>,
}

impl OntologyMap {
    // each side is read only when its path is given, so a missing table is
    // fatal only for the direction that needs it
    pub fn load(gb2so_path: Option<&Path>, so2gb_path: Option<&Path>) -> Result<OntologyMap> {
        let genbank_to_so = gb2so_path
            .map(|path| OntologyTable::load(path, Direction::GenBankToSo))
            .transpose()?;
        let so_to_genbank = so2gb_path
            .map(|path| OntologyTable::load(path, Direction::SoToGenBank))
            .transpose()?;

        Ok(OntologyMap {
            genbank_to_so,
            so_to_genbank,
        })
    }

    pub fn has_direction(&self, direction: Direction) -> bool {
        self.table(direction).is_ok()
    }

    pub fn table(&self, direction: Direction) -> Result<&OntologyTable> {
        let table =
            match direction {
                Direction::GenBankToSo => self.genbank_to_so.as_ref(),
                Direction::SoToGenBank => self.so_to_genbank.as_ref(),
            };
        table.ok_or(ConversionError::OntologyNotLoaded { direction })
    }
}

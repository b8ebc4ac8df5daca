use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use crate::constants::{GB2SO_TABLE_FILE_NAME, SO2GB_TABLE_FILE_NAME, TEST_NAMESPACE};
use crate::error::Result;

fn default_gb2so_table() -> PathBuf {
    bundled_path(GB2SO_TABLE_FILE_NAME)
}

fn default_so2gb_table() -> PathBuf {
    bundled_path(SO2GB_TABLE_FILE_NAME)
}

fn default_namespace() -> String {
    TEST_NAMESPACE.into()
}

// the tables shipped in data/, relative to the crate root
pub fn bundled_path(file_name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push(file_name);
    path
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ConverterConfig {
    #[serde(default = "default_gb2so_table")]
    pub gb2so_table: PathBuf,
    #[serde(default = "default_so2gb_table")]
    pub so2gb_table: PathBuf,
    // URIs of components will be {namespace}{record name}
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for ConverterConfig {
    fn default() -> ConverterConfig {
        ConverterConfig {
            gb2so_table: default_gb2so_table(),
            so2gb_table: default_so2gb_table(),
            namespace: default_namespace(),
        }
    }
}

impl ConverterConfig {
    pub fn read(config_file_name: &str) -> Result<ConverterConfig> {
        let file = File::open(config_file_name)?;
        let reader = BufReader::new(file);

        Ok(serde_json::from_reader(reader)?)
    }
}

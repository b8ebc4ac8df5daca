#[macro_use] extern crate serde_derive;
#[macro_use] extern crate lazy_static;

pub mod types;
pub mod constants;
pub mod error;
pub mod config;
pub mod ontology;
pub mod location;
pub mod flat;
pub mod sbol;
pub mod extension;
pub mod forward;
pub mod reverse;
pub mod genbank;
pub mod converter;

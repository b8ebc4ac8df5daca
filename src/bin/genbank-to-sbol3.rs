extern crate getopts;
extern crate gbsbol;

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use getopts::Options;
use tracing_subscriber::EnvFilter;

use gbsbol::config::ConverterConfig;
use gbsbol::converter::Converter;
use gbsbol::ontology::Direction;

const PKG_NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn usage_message(program: &str) -> String {
    format!("Usage: {} [options] GENBANK_FILE SBOL3_FILE

Converts the records of a GenBank file to an SBOL3 document.
",
            program)
}

fn print_usage(program: &str, opts: &Options) {
    let message = usage_message(program);
    print!("{}", opts.usage(&message));
}

fn eprint_usage(program: &str, opts: &Options) {
    let message = usage_message(program);
    eprint!("{}", opts.usage(&message));
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new("gbsbol=info"))?,
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut opts = Options::new();

    opts.optflag("h", "help", "print this help message");
    opts.optflag("v", "version", "print the version");
    opts.optopt("c", "config", "Configuration file name", "CONFIG");
    opts.optopt("n", "namespace", "Namespace of the created SBOL3 objects", "URI");
    opts.optopt("", "gb2so", "GenBank to SO mapping table", "CSV_FILE");
    opts.optopt("", "so2gb", "SO to GenBank mapping table", "CSV_FILE");
    opts.optflag("", "no-write", "convert but don't write the SBOL3 document");

    let program = args[0].clone();

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(e) => {
            eprint_usage(&program, &opts);
            eprintln!("\noption error: {}", e);
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        print_usage(&program, &opts);
        process::exit(0);
    }

    if matches.opt_present("version") {
        println!("{} v{}", PKG_NAME, VERSION);
        process::exit(0);
    }

    if matches.free.len() != 2 {
        eprintln!("needs GENBANK_FILE and SBOL3_FILE arguments\n");
        eprint_usage(&program, &opts);
        process::exit(1);
    }

    let mut config =
        if let Some(config_file_name) = matches.opt_str("config") {
            ConverterConfig::read(&config_file_name)
                .with_context(|| format!("failed to read config file {}", config_file_name))?
        } else {
            ConverterConfig::default()
        };

    if let Some(gb2so) = matches.opt_str("gb2so") {
        config.gb2so_table = PathBuf::from(gb2so);
    }
    if let Some(so2gb) = matches.opt_str("so2gb") {
        config.so2gb_table = PathBuf::from(so2gb);
    }
    if let Some(namespace) = matches.opt_str("namespace") {
        config.namespace = namespace;
    }

    let write = !matches.opt_present("no-write");

    let converter = Converter::with_directions(&config, &[Direction::GenBankToSo])?;

    let doc = converter.genbank_to_sbol3(Path::new(&matches.free[0]),
                                         Path::new(&matches.free[1]),
                                         None, write)?;

    println!("converted {} components into {} SBOL3 objects",
             doc.components().count(), doc.len());

    Ok(())
}

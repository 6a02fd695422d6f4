use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use aesr_config::input::{FileConfigReader, ReadConfig, StdinConfigReader};
use aesr_config::output::JsonProfileSetWriter;
use aesr_config::run::ParseAesrConfig;
use aesr_config::Error;

/// Parses an AWS config file into AWS Extend Switch Roles profiles, printed as JSON.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Config file to read. Reads stdin when omitted.
    #[arg()]
    file: Option<PathBuf>,

    /// Pretty-print the JSON with this many spaces (0 for compact output).
    #[arg(short, long)]
    indent: Option<usize>,
}

enum ConfigReader {
    Stdin(StdinConfigReader),
    File(FileConfigReader),
}

impl ReadConfig for ConfigReader {
    fn read_config(&self) -> anyhow::Result<String> {
        use ConfigReader::*;
        match self {
            Stdin(r) => r.read_config(),
            File(r) => r.read_config(),
        }
    }
}

fn reader_from(args: &Args) -> ConfigReader {
    if let Some(file) = args.file.as_ref() {
        ConfigReader::File(FileConfigReader::from(file))
    } else {
        ConfigReader::Stdin(StdinConfigReader)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("run failed. error:{:?}", e);
            if let Some(e) = e.downcast_ref::<Error>() {
                eprintln!("{}: {}", e.kind_name(), e);
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let reader = reader_from(&args);
    let writer = JsonProfileSetWriter::new(args.indent);
    ParseAesrConfig::new(reader, writer).run()
}

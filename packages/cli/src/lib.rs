//! The `fsquery` command: answers query paths against the local filesystem
//! and prints the responses as JSON.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fsquery_core::Path;
use fsquery_query::{Config, Dispatcher, ListingKind};
use serde_json::json;

mod error;

pub use error::CliError;

/// fsquery - structured queries over a device filesystem
#[derive(Parser, Debug)]
#[command(name = "fsquery")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Directory the device filesystem is mounted at (overrides the config)
    #[arg(long)]
    pub rootfs: Option<String>,

    /// Enable a listing resource: firmware or sonic-image
    #[arg(long = "enable", value_name = "KIND")]
    pub enable: Vec<ListingKind>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer one or more query paths
    Get {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print the data models served with this configuration
    Capabilities,
}

/// Merge the config file with command-line overrides.
pub fn load_config(args: &Args) -> Result<Config, CliError> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(root) = &args.rootfs {
        config.root_fs = root.clone();
    }
    config.enabled_listings.extend(args.enable.iter().copied());
    config.validate()?;
    Ok(config)
}

/// Run `args.command`, writing JSON to `out`.
pub fn run(args: &Args, out: &mut impl Write) -> Result<(), CliError> {
    let config = load_config(args)?;
    log::debug!("Using {:?}", config);
    let dispatcher = Dispatcher::new(config);

    let output = match &args.command {
        Command::Get { paths } => {
            let paths = paths
                .iter()
                .map(|input| {
                    Path::parse(input).map_err(|source| CliError::Path {
                        input: input.clone(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let mut updates = dispatcher.get(&paths)?;
            if updates.len() == 1 {
                updates.remove(0).value.to_json()
            } else {
                updates
                    .into_iter()
                    .map(|u| json!({"path": u.path.to_string(), "value": u.value.to_json()}))
                    .collect()
            }
        }
        Command::Capabilities => dispatcher
            .supported_models()
            .into_iter()
            .map(|m| json!({"name": m.name, "organization": m.organization}))
            .collect(),
    };

    serde_json::to_writer_pretty(&mut *out, &output)?;
    writeln!(out)?;
    Ok(())
}

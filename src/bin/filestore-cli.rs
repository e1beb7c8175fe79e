use std::path::PathBuf;

use clap::{Parser, Subcommand};

use filestore_api::config::load_from_env;
use filestore_api::logs::{LogManager, LogRotator};
use filestore_api::observability::logging;
use filestore_api::store::RecordStore;

#[derive(Parser)]
#[command(name = "filestore-cli")]
#[command(about = "Inspect records and log archives of a filestore-api deployment", long_about = None)]
struct Cli {
    /// Path to the service's TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with log streams and archives
    Logs {
        #[command(subcommand)]
        command: LogCommands,
    },
    /// Read stored records
    Records {
        #[command(subcommand)]
        command: RecordCommands,
    },
}

#[derive(Subcommand)]
enum LogCommands {
    /// List active streams, optionally with archives
    List {
        #[arg(long)]
        archived: bool,
    },
    /// Print the decompressed contents of an archive
    Show { archive_id: String },
    /// Run one rotation pass now
    Rotate,
}

#[derive(Subcommand)]
enum RecordCommands {
    /// List keys in a collection
    List { collection: String },
    /// Print one record
    Get { collection: String, key: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_from_env(cli.config.as_deref())?;
    logging::init("filestore_api=warn");

    match cli.command {
        Commands::Logs { command } => {
            let logs = LogManager::new(&config.logging.logs_dir);
            match command {
                LogCommands::List { archived } => {
                    let mut ids = logs.list(archived).await?;
                    ids.sort();
                    for id in ids {
                        println!("{id}");
                    }
                }
                LogCommands::Show { archive_id } => {
                    print!("{}", logs.decompress(&archive_id).await?);
                }
                LogCommands::Rotate => {
                    let rotator = LogRotator::new(logs, config.rotation_interval());
                    let report = rotator.rotate_all().await;
                    for (stream, archive) in report.archived() {
                        println!("{stream} -> {archive}");
                    }
                    let mut failed = false;
                    for (stream, error) in report.failures() {
                        eprintln!("{stream}: {error}");
                        failed = true;
                    }
                    if failed {
                        std::process::exit(1);
                    }
                }
            }
        }
        Commands::Records { command } => {
            let store = RecordStore::new(&config.storage.data_dir);
            match command {
                RecordCommands::List { collection } => {
                    let mut keys = store.list(&collection).await?;
                    keys.sort();
                    for key in keys {
                        println!("{key}");
                    }
                }
                RecordCommands::Get { collection, key } => {
                    let record = store.read(&collection, &key).await?;
                    println!("{}", serde_json::to_string_pretty(&record)?);
                }
            }
        }
    }

    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use davrepo::config::Config;
use davrepo::services::webdav::{ContentBackend, WebDAVRepository};
use davrepo::{CollectionSpec, MediaFile};

#[derive(Parser, Debug)]
#[command(name = "davrepo", about = "Browse and edit a WebDAV content repository")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the configured credentials against the server
    Check,
    /// Print every entry of a folder collection
    Entries {
        folder: String,
        #[arg(long, default_value = "md")]
        ext: String,
    },
    /// Print a single entry
    Get { path: String },
    /// Overwrite an entry with the contents of a local file
    Put { path: String, file: PathBuf },
    /// List the media folder
    Media,
    /// Upload a local file into the media folder
    Upload { file: PathBuf },
    /// Delete a file from the repository
    Rm { path: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("davrepo=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let mut repository = WebDAVRepository::new_with_configs(
        config.repository.clone(),
        config.request.clone(),
        config.concurrency.clone(),
    )?;
    repository.authenticate(config.credentials.clone()).await?;

    match cli.command {
        Command::Check => {
            info!("Connected to {}", config.repository.base_url());
        }
        Command::Entries { folder, ext } => {
            let collection = CollectionSpec::Folder { folder, extension: ext };
            let entries = repository.entries_by_folder(&collection).await?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Command::Get { path } => {
            let entry = repository.get_entry(&path).await?;
            print!("{}", entry.data);
        }
        Command::Put { path, file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            repository.persist_entry(&path, &raw).await?;
            info!("Wrote {}", path);
        }
        Command::Media => {
            let assets = repository.get_media().await?;
            println!("{}", serde_json::to_string_pretty(&assets)?);
        }
        Command::Upload { file } => {
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .with_context(|| format!("{} has no usable file name", file.display()))?
                .to_string();
            let content = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let asset = repository.persist_media(MediaFile::new(name, content)).await?;
            println!("{}", serde_json::to_string_pretty(&asset)?);
        }
        Command::Rm { path } => {
            repository.delete_file(&path).await?;
            info!("Deleted {}", path);
        }
    }

    repository.logout();
    Ok(())
}

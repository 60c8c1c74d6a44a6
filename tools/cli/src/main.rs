//! Depot CLI - run a single storage operation against the configured backend.
//!
//! The backend is provisioned once at startup from `STORAGES_BACKEND` (or
//! `--backend`) and the `STORAGES_*` keys its constructor requires.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use depot_common::{Content, ReadMode, WriteMode};
use depot_storage::{BackendRegistry, StorageHandle, StorageProvider};

#[derive(Parser)]
#[command(name = "depot")]
#[command(about = "Depot - Uniform access to file and object storage")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Backend class path. Defaults to the STORAGES_BACKEND variable.
    #[arg(short, long)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print an object to stdout.
    Read {
        /// Object name.
        name: String,

        /// Read mode: "r" (text) or "rb" (binary).
        #[arg(short, long, default_value = "r")]
        mode: ReadMode,
    },

    /// Store content under a name.
    Write {
        /// Object name.
        name: String,

        /// Text content to store.
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        content: Option<String>,

        /// Store the bytes of a local file instead.
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Write mode: "x" (create new), "w" (overwrite) or "a" (append).
        #[arg(short, long, default_value = "x")]
        mode: WriteMode,
    },

    /// Delete an object.
    Delete {
        /// Object name.
        name: String,
    },

    /// Report whether an object exists.
    Exists {
        /// Object name.
        name: String,
    },

    /// Print the size of an object in bytes.
    Size {
        /// Object name.
        name: String,
    },

    /// Print the creation time of an object.
    Created {
        /// Object name.
        name: String,
    },

    /// Print the last modification time of an object.
    Modified {
        /// Object name.
        name: String,
    },

    /// Print the last access time of an object.
    Accessed {
        /// Object name.
        name: String,
    },

    /// List the backend class paths that can be provisioned.
    Backends,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Commands::Backends = cli.command {
        for path in BackendRegistry::with_default_backends().backends() {
            println!("{}", path);
        }
        return Ok(());
    }

    let storage = provision(cli.backend.as_deref())?;

    match cli.command {
        Commands::Read { name, mode } => cmd_read(&storage, &name, mode).await,

        Commands::Write {
            name,
            content,
            file,
            mode,
        } => cmd_write(&storage, &name, content, file, mode).await,

        Commands::Delete { name } => {
            storage
                .delete(&name)
                .await
                .with_context(|| format!("Failed to delete {}", name))?;
            println!("Deleted {}", name);
            Ok(())
        }

        Commands::Exists { name } => {
            println!("{}", storage.exists(&name).await?);
            Ok(())
        }

        Commands::Size { name } => {
            println!("{}", storage.size(&name).await?);
            Ok(())
        }

        Commands::Created { name } => {
            println!("{}", storage.get_created_time(&name).await?.to_rfc3339());
            Ok(())
        }

        Commands::Modified { name } => {
            println!("{}", storage.get_modified_time(&name).await?.to_rfc3339());
            Ok(())
        }

        Commands::Accessed { name } => {
            println!("{}", storage.get_access_time(&name).await?.to_rfc3339());
            Ok(())
        }

        Commands::Backends => Ok(()),
    }
}

/// Build the storage handle before any command runs.
fn provision(backend: Option<&str>) -> Result<StorageHandle> {
    let provider = StorageProvider::from_env();
    let storage = match backend {
        Some(path) => provider.provide(path),
        None => provider.bootstrap(),
    }
    .context("Failed to provision storage")?;

    debug!("Using {:?}", storage);
    Ok(storage)
}

/// Print an object.
async fn cmd_read(storage: &StorageHandle, name: &str, mode: ReadMode) -> Result<()> {
    let content = storage
        .read(name, mode)
        .await
        .with_context(|| format!("Failed to read {}", name))?;

    match content {
        Content::Text(text) => println!("{}", text),
        Content::Binary(data) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Store text or the bytes of a local file.
async fn cmd_write(
    storage: &StorageHandle,
    name: &str,
    content: Option<String>,
    file: Option<PathBuf>,
    mode: WriteMode,
) -> Result<()> {
    let content = match (content, file) {
        (_, Some(path)) => Content::Binary(
            tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        (Some(text), None) => Content::Text(text),
        (None, None) => anyhow::bail!("Nothing to write"),
    };

    let size = content.len();
    storage
        .write(name, content, mode)
        .await
        .with_context(|| format!("Failed to write {}", name))?;

    println!("Wrote {} bytes to {}", size, name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_write_mode() {
        let cli = Cli::try_parse_from(["depot", "write", "a.txt", "hello", "--mode", "w"]).unwrap();
        match cli.command {
            Commands::Write { name, content, mode, .. } => {
                assert_eq!(name, "a.txt");
                assert_eq!(content.as_deref(), Some("hello"));
                assert_eq!(mode, WriteMode::Overwrite);
            }
            _ => panic!("expected write command"),
        }
    }

    #[test]
    fn test_rejects_invalid_read_mode() {
        assert!(Cli::try_parse_from(["depot", "read", "a.txt", "--mode", "q"]).is_err());
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use osnote::app::App;
use osnote::catalog::Catalog;
use osnote::config::Config;
use osnote::notebook::Notebook;
use osnote::storage::{Database, DatabaseError};
use osnote::ui;

/// Get the config directory path (~/.config/osnote/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("osnote"))
}

#[derive(Parser, Debug)]
#[command(
    name = "osnote",
    about = "Terminal notebook for studying operating systems concepts"
)]
struct Args {
    /// Catalog file or directory to use instead of the built-in topics
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Clear all completion marks before starting
    #[arg(long)]
    reset_progress: bool,

    /// Validate the catalog, print any warnings and exit
    #[arg(long)]
    check_catalog: bool,
}

/// The CLI flag wins over the config file; neither means the built-in set.
fn load_catalog(args: &Args, config: &Config) -> Result<Catalog> {
    match args.catalog.as_ref().or(config.catalog_dir.as_ref()) {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display())),
        None => Catalog::builtin().context("Built-in catalog is invalid"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    // Progress is personal: keep the directory user-only.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config_path = config_dir.join("config.toml");
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let catalog = load_catalog(&args, &config)?;
    let warnings = catalog.lint();

    if args.check_catalog {
        for warning in &warnings {
            println!("warning: {}", warning);
        }
        println!(
            "{} topics, {} subtopics, {} warning{}",
            catalog.len(),
            catalog.total_subtopic_count(),
            warnings.len(),
            if warnings.len() == 1 { "" } else { "s" }
        );
        return Ok(());
    }
    for warning in &warnings {
        tracing::warn!(%warning, "Catalog problem");
    }

    let db_path = config_dir.join("notebook.db");
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!("Error: {}", DatabaseError::InstanceLocked);
            std::process::exit(1);
        }
        Err(e) => {
            // Progress won't survive this session, but the notebook still works.
            tracing::warn!(error = %e, path = %db_path.display(), "Falling back to in-memory storage");
            eprintln!("Warning: {}. Progress will not be saved.", e);
            Database::open(":memory:")
                .await
                .context("Failed to open in-memory database")?
        }
    };

    let mut notebook = Notebook::init(Arc::new(catalog), db).await;
    if args.reset_progress {
        notebook.reset_progress().await;
        println!("Progress reset.");
    }

    let mut app = App::new(notebook, &config);
    ui::run(&mut app).await?;

    Ok(())
}

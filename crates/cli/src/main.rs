use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use stitchtrack_core::{Material, Pattern, Profile, Step};
use stitchtrack_http::{create_router, AppState};
use stitchtrack_service::{PatternImport, PatternService};
use stitchtrack_storage::Storage;

#[derive(Parser)]
#[command(name = "stitchtrack")]
#[command(about = "Progress tracker for craft patterns", long_about = None)]
struct Cli {
    /// Database file (defaults to the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        #[arg(short, long, default_value = "8700")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Import a pattern (steps and materials included) from a JSON file
    Import { file: PathBuf },
    /// List stored patterns
    Patterns {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show database row counts
    Stats,
}

fn get_db_path(cli: &Cli) -> PathBuf {
    cli.db.clone().unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stitchtrack")
            .join("stitchtrack.db")
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let db_path = get_db_path(&cli);

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let storage = Storage::new(&db_path)?;

    match cli.command {
        Commands::Serve { port, host } => {
            let state = Arc::new(AppState::new(storage));
            let router = create_router(state);
            let addr = format!("{}:{}", host, port);
            tracing::info!("Starting HTTP server on {}", addr);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, router).await?;
        },
        Commands::Import { file } => {
            let import = read_import_file(&file)?;
            import_pattern(storage, import).await?;
        },
        Commands::Patterns { limit } => {
            let patterns = storage.list_patterns(false, limit)?;
            println!("{}", serde_json::to_string_pretty(&patterns)?);
        },
        Commands::Stats => {
            let stats = storage.get_stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        },
    }

    Ok(())
}

// ── Import file format ───────────────────────────────────────────

#[derive(Deserialize)]
struct ImportFile {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    cover_image_url: Option<String>,
    #[serde(default)]
    designer: Option<ImportDesigner>,
    #[serde(default = "default_public")]
    is_public: bool,
    steps: Vec<ImportStep>,
    #[serde(default)]
    materials: Vec<ImportMaterial>,
}

fn default_public() -> bool {
    true
}

#[derive(Deserialize)]
struct ImportDesigner {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct ImportStep {
    description: String,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    stitch_count: Option<u32>,
}

#[derive(Deserialize)]
struct ImportMaterial {
    name: String,
    quantity: String,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    alternatives: Option<Vec<String>>,
}

fn read_import_file(path: &std::path::Path) -> Result<ImportFile> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

async fn import_pattern(storage: Storage, file: ImportFile) -> Result<()> {
    if let Some(designer) = &file.designer {
        storage.save_profile(&Profile::new(&designer.id, designer.name.clone()))?;
    }

    let mut pattern = Pattern::new(&file.title);
    pattern.description = file.description.clone();
    pattern.cover_image_url = file.cover_image_url.clone();
    pattern.designer_id = file.designer.as_ref().map(|d| d.id.clone());
    pattern.is_public = file.is_public;

    // step_order is 1-based, in file order
    let steps: Vec<Step> = file
        .steps
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let mut step = Step::new(&pattern.id, (i + 1) as u32, &s.description);
            step.image_url = s.image_url.clone();
            step.notes = s.notes.clone();
            step.stitch_count = s.stitch_count;
            step
        })
        .collect();

    let materials: Vec<Material> = file
        .materials
        .iter()
        .map(|m| {
            let mut material = Material::new(&pattern.id, &m.name, &m.quantity);
            material.brand = m.brand.clone();
            material.color = m.color.clone();
            material.alternatives = m.alternatives.clone();
            material
        })
        .collect();

    let store = Arc::new(storage);
    let service = PatternService::new(store.clone(), store);
    let pattern_id = pattern.id.clone();
    service.import_pattern(&PatternImport { pattern, steps, materials }).await?;
    println!("Imported pattern {}", pattern_id);
    Ok(())
}

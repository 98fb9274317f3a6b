//! curator CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use curator::{
    build::{
        activate_build, resume_build, run_build, start_build, tick_build, StartOptions,
        TickOutcome,
    },
    config::Config,
    embed::create_embedder,
    error::{Error, Result},
    meta::{ChunkRow, MetaDb, VectorIndex},
    store::QdrantStore,
};
use serde::Deserialize;
use std::io::BufRead;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "curator")]
#[command(version, about = "Resumable vector index builds with atomic activation", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Index namespace (overrides config)
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize curator configuration and database
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Import chunks from a JSONL file into the chunk source
    Import {
        /// Path to JSONL file (one chunk object per line)
        file: PathBuf,
    },

    /// Start (or restart) an index build
    Start {
        /// Target collection (defaults to a name derived from namespace + model)
        #[arg(long)]
        collection: Option<String>,

        /// Embedding model (overrides config)
        #[arg(long)]
        model: Option<String>,
    },

    /// Process one batch of the current build
    Tick {
        /// Target collection (defaults to the derived name)
        #[arg(long)]
        collection: Option<String>,

        /// Chunks per tick (overrides config)
        #[arg(long)]
        batch_size: Option<usize>,
    },

    /// Tick until the build is ready
    Run {
        /// Target collection (defaults to the derived name)
        #[arg(long)]
        collection: Option<String>,

        /// Chunks per tick (overrides config)
        #[arg(long)]
        batch_size: Option<usize>,

        /// Activate the index once it is ready
        #[arg(long)]
        activate: bool,
    },

    /// Resume a failed build from its last committed position
    Resume {
        /// Target collection (defaults to the derived name)
        #[arg(long)]
        collection: Option<String>,
    },

    /// Promote a ready build to serve its namespace
    Activate {
        /// Target collection (defaults to the derived name)
        #[arg(long)]
        collection: Option<String>,
    },

    /// Show all index builds and their collections
    Status,

    /// Show which index currently serves the namespace
    Resolve,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// One line of an import file
#[derive(Debug, Deserialize)]
struct ImportChunk {
    #[serde(default)]
    id: Option<String>,
    source_id: String,
    chunk_index: i64,
    text: String,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Handle init command specially (doesn't need existing config)
    if matches!(cli.command, Commands::Init { .. }) {
        return handle_init(cli).await;
    }

    // Handle completions command (doesn't need config/db/store)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "curator", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_config(cli.config.as_deref()).await?;
    if let Some(namespace) = &cli.namespace {
        config.namespace = namespace.clone();
    }
    config.validate()?;

    let db = MetaDb::connect(&config).await?;

    match cli.command {
        Commands::Init { .. } | Commands::Completions { .. } => unreachable!(),

        Commands::Import { file } => {
            let count = import_chunks(&db, &file).await?;
            if cli.json {
                println!(r#"{{"imported": {}}}"#, count);
            } else {
                println!("✓ Imported {} chunks from {}", count, file.display());
            }
        }

        Commands::Start { collection, model } => {
            let mut config = config;
            if let Some(model) = model {
                config.embedding.model = model;
            }
            let dimension = config.embedding.resolved_dimension();
            let collection = collection.unwrap_or_else(|| config.collection_name());

            let store = QdrantStore::connect(&config).await?;
            let options = StartOptions {
                namespace: config.namespace.clone(),
                collection,
                model_id: config.embedding.model.clone(),
                dimension,
                provider: config.embedding.provider.clone(),
            };

            let index = start_build(&db, &store, &options).await?;
            print_index_result(&index, cli.json)?;
        }

        Commands::Tick {
            collection,
            batch_size,
        } => {
            let collection = collection.unwrap_or_else(|| config.collection_name());
            let batch_size = batch_size.unwrap_or(config.build.batch_size);
            let store = QdrantStore::connect(&config).await?;
            let embedder = create_embedder(&config.embedding)?;

            let outcome = tick_build(
                &db,
                embedder.as_ref(),
                &store,
                &config.namespace,
                &collection,
                batch_size,
                config.build.max_embed_chars,
            )
            .await?;

            if cli.json {
                println!(
                    r#"{{"processed": {}, "finished": {}, "done": {}, "total": {}, "status": "{}"}}"#,
                    outcome.processed,
                    outcome.finished,
                    outcome.index.chunks_done,
                    outcome.index.chunks_total,
                    outcome.index.status
                );
            } else {
                print_tick(&outcome);
            }
        }

        Commands::Run {
            collection,
            batch_size,
            activate,
        } => {
            let collection = collection.unwrap_or_else(|| config.collection_name());
            let batch_size = batch_size.unwrap_or(config.build.batch_size);
            let store = QdrantStore::connect(&config).await?;
            let embedder = create_embedder(&config.embedding)?;

            let mut index = run_build(
                &db,
                embedder.as_ref(),
                &store,
                &config.namespace,
                &collection,
                batch_size,
                config.build.max_embed_chars,
            )
            .await?;

            if activate {
                index = activate_build(&db, &config.namespace, &collection).await?;
            }

            print_index_result(&index, cli.json)?;
        }

        Commands::Resume { collection } => {
            let collection = collection.unwrap_or_else(|| config.collection_name());
            let index = resume_build(&db, &config.namespace, &collection).await?;
            print_index_result(&index, cli.json)?;
        }

        Commands::Activate { collection } => {
            let collection = collection.unwrap_or_else(|| config.collection_name());
            let index = activate_build(&db, &config.namespace, &collection).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&index)?);
            } else {
                println!(
                    "✓ Index '{}' now serves namespace '{}'",
                    index.collection, index.namespace
                );
            }
        }

        Commands::Status => {
            let indexes = db.list_indexes().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&indexes)?);
            } else {
                print_status(&config, &indexes).await?;
            }
        }

        Commands::Resolve => {
            let active = db.get_active_index(&config.namespace).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&active)?);
            } else {
                println!("Namespace '{}' is served by:", config.namespace);
                println!("  Collection: {}", active.collection);
                println!("  Model:      {}", active.embedding_model_id);
                println!("  Dimension:  {}", active.embedding_dim);
                println!("  Provider:   {}", active.embedding_provider);
            }
        }
    }

    Ok(())
}

async fn handle_init(cli: Cli) -> Result<()> {
    let Commands::Init { force } = cli.command else {
        unreachable!()
    };

    let base_dir = cli
        .config
        .as_deref()
        .and_then(|p| {
            if p.extension().map_or(false, |e| e == "toml") {
                p.parent().map(PathBuf::from)
            } else {
                Some(p.to_path_buf())
            }
        })
        .unwrap_or_else(Config::default_base_dir);

    let mut config = Config::default();
    config.init_paths(Some(base_dir));

    if config.paths.config_file.exists() && !force {
        eprintln!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            config.paths.config_file.display()
        );
        std::process::exit(1);
    }

    config.save()?;
    MetaDb::connect(&config).await?;

    println!("✓ curator initialized successfully");
    println!("  Config: {}", config.paths.config_file.display());
    println!("\nNext steps:");
    println!("  1. Edit the config file to customize settings");
    println!("  2. Start Qdrant: docker run -p 6334:6334 qdrant/qdrant");
    println!("  3. Import chunks: curator import chunks.jsonl");
    println!("  4. Build the index: curator start && curator run --activate");

    Ok(())
}

async fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_config_path);

    if !config_path.exists() {
        eprintln!(
            "Config file not found: {}\nRun 'curator init' first.",
            config_path.display()
        );
        std::process::exit(1);
    }

    Config::load(&config_path)
}

async fn import_chunks(db: &MetaDb, file: &std::path::Path) -> Result<usize> {
    let reader = std::io::BufReader::new(std::fs::File::open(file)?);
    let mut count = 0usize;

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let parsed: ImportChunk = serde_json::from_str(&line).map_err(|e| {
            Error::Other(format!("invalid chunk on line {}: {}", lineno + 1, e))
        })?;

        let mut chunk = ChunkRow::new(parsed.source_id, parsed.chunk_index, parsed.text);
        if let Some(id) = parsed.id {
            chunk.id = id;
        }
        db.insert_chunk(&chunk).await?;
        count += 1;
    }

    Ok(count)
}

fn print_index_result(index: &VectorIndex, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(index)?);
    } else {
        println!("Index '{}' in namespace '{}':", index.collection, index.namespace);
        println!("  Status:   {}", index.status);
        println!("  Model:    {} (dim {})", index.embedding_model_id, index.embedding_dim);
        println!("  Progress: {}/{}", index.chunks_done, index.chunks_total);
        if let Some(built_at) = &index.built_at {
            println!("  Built at: {}", built_at);
        }
        if let Some(message) = &index.error_message {
            println!("  Error:    {}", message);
        }
    }
    Ok(())
}

fn print_tick(outcome: &TickOutcome) {
    println!(
        "Processed {} chunks ({}/{}), status: {}{}",
        outcome.processed,
        outcome.index.chunks_done,
        outcome.index.chunks_total,
        outcome.index.status,
        if outcome.finished { " [finished]" } else { "" }
    );
}

async fn print_status(config: &Config, indexes: &[VectorIndex]) -> Result<()> {
    if indexes.is_empty() {
        println!("No index builds recorded. Run 'curator start' to begin one.");
        return Ok(());
    }

    let store = QdrantStore::connect(config).await?;

    println!("Index builds:");
    for index in indexes {
        let marker = if index.is_active { "*" } else { " " };
        let points = match store.get_collection_info(&index.collection).await {
            Ok(Some(info)) => format!("{} points, {}", info.points_count, info.status),
            Ok(None) => "collection missing".to_string(),
            Err(_) => "store unreachable".to_string(),
        };
        println!(
            "{} {}/{} [{}] {}/{} chunks ({})",
            marker,
            index.namespace,
            index.collection,
            index.status,
            index.chunks_done,
            index.chunks_total,
            points
        );
        if let Some(message) = &index.error_message {
            println!("      error: {}", message);
        }
    }
    println!("\n(* = active)");

    Ok(())
}

//! typegen CLI entrypoint
//! Parses command-line arguments and dispatches to the core generator.

// Internal imports (std, crate)
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use typegen_core::{ApiTarget, Config, MetadataContext, TypesTarget};

#[derive(Parser)]
#[command(name = "typegen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate TypeScript types and client bindings from class metadata
    Generate {
        /// Path to the class metadata file (YAML or JSON)
        #[arg(long)]
        metadata: Option<PathBuf>,
        /// Output directories; the same files are written into each
        ///
        /// Example: --output-dir web/src/api,admin/src/api
        #[arg(long, value_delimiter = ',')]
        output_dir: Vec<PathBuf>,
        /// Types target (typescript, zod)
        #[arg(long)]
        types: Option<String>,
        /// API target (react_query, angular)
        #[arg(long)]
        api: Option<String>,
        /// Emit dates as strings instead of `Date`
        #[arg(long)]
        use_string_as_date: bool,
        /// Config file (YAML, JSON or TOML); flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the resolved types and endpoints as JSON
    Inspect {
        /// Path to the class metadata file (YAML or JSON)
        #[arg(long)]
        metadata: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            metadata,
            output_dir,
            types,
            api,
            use_string_as_date,
            config,
        } => {
            let mut config = match config {
                Some(path) => Config::from_file(&path)
                    .await
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => Config::new(String::new(), Vec::new()),
            };

            if let Some(metadata) = metadata {
                config.metadata_path = metadata.to_string_lossy().to_string();
            }
            if !output_dir.is_empty() {
                config.output_dirs = output_dir
                    .iter()
                    .map(|dir| dir.to_string_lossy().to_string())
                    .collect();
            }
            if let Some(types) = types {
                config.types_target = types;
            }
            if let Some(api) = api {
                config.api_target = api;
            }
            config.use_string_as_date |= use_string_as_date;

            if config.metadata_path.is_empty() {
                anyhow::bail!("No metadata file given; pass --metadata or set metadata_path in the config");
            }
            log::debug!("Effective config: {:?}", config);
            let types_target: TypesTarget = config.types_target()?;
            let api_target: ApiTarget = config.api_target()?;

            tracing::info!(
                "Generating {} types and {} bindings from {}",
                types_target,
                api_target,
                config.metadata_path
            );

            let written = typegen_core::generate(&config)
                .await
                .context("Failed to generate TypeScript sources")?;
            for path in &written {
                println!("{}", path.display());
            }
            tracing::info!("Generated {} files", written.len());
        }
        Commands::Inspect { metadata } => {
            let context = MetadataContext::from_file(&metadata)
                .await
                .with_context(|| format!("Failed to load metadata {}", metadata.display()))?;
            let model = typegen_core::inspect(&context)?;
            println!("{}", serde_json::to_string_pretty(&model)?);
        }
    }

    Ok(())
}

use clap::{Args, Parser, Subcommand, ValueEnum};
use modelarium::config::Config;
use modelarium::error::Result;
use modelarium::instances::{read_stubs, InstanceManager, InstanceOptions, OllamaClient};
use modelarium::models::{FetchOptions, Fetcher, HfHubClient};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "modelarium")]
#[command(about = "Fetch GGUF models and manage Ollama models built from them", long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/modelarium/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a model file and create its modelfile and note
    Fetch(FetchArgs),
    /// List modelfiles or create, rename and delete Ollama models
    Instances(InstancesArgs),
}

#[derive(Args)]
struct FetchArgs {
    /// Hugging Face repository id, e.g. TheBloke/Llama-2-7B-GGUF
    #[arg(long)]
    repo: String,
    /// File to download from the repository
    #[arg(long)]
    file: String,
    /// Download again even if the file exists
    #[arg(long)]
    redownload: bool,
    /// Root of the models/, modelfiles/ and notes/ directories
    #[arg(long = "output_dir", visible_alias = "output-dir")]
    output_dir: Option<PathBuf>,
}

#[derive(Args)]
struct InstancesArgs {
    /// Directory holding the modelfiles
    #[arg(long)]
    directory: Option<PathBuf>,
    /// Regex matched against the start of modelfile names
    #[arg(long)]
    pattern: Option<String>,
    /// Ollama host
    #[arg(long)]
    host: Option<String>,
    /// Namespace for created and renamed models
    #[arg(long)]
    namespace: Option<String>,
    /// Model to rename or delete
    #[arg(long)]
    source: Option<String>,
    /// New name for rename
    #[arg(long)]
    dest: Option<String>,
    /// Log what would happen without calling Ollama
    #[arg(long = "dry_run", visible_alias = "dry-run")]
    dry_run: bool,
    #[arg(long, value_enum, default_value_t = Action::List)]
    action: Action,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Action {
    /// Print matching modelfile names
    #[value(alias = "info")]
    List,
    /// Create one model per modelfile
    Create,
    /// Copy --source to --dest, then delete --source
    #[value(alias = "copy")]
    Rename,
    /// Delete --source
    Delete,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Fetch(args) => run_fetch(args, &config).await,
        Commands::Instances(args) => run_instances(args, &config).await,
    }
}

async fn run_fetch(args: FetchArgs, config: &Config) -> Result<()> {
    let options = FetchOptions {
        repo_id: args.repo,
        filename: args.file,
        output_dir: args
            .output_dir
            .unwrap_or_else(|| config.fetch.output_dir.clone()),
        redownload: args.redownload,
    };

    let fetcher = Fetcher::new(HfHubClient::new(config.fetch.revision.as_str()));
    let report = fetcher.fetch(&options).await?;

    tracing::info!("Model ready at {}", report.model_path.display());
    Ok(())
}

async fn run_instances(args: InstancesArgs, config: &Config) -> Result<()> {
    let defaults = &config.instances;
    let directory = args.directory.unwrap_or_else(|| defaults.directory.clone());
    let pattern = args.pattern.unwrap_or_else(|| defaults.pattern.clone());
    let host = args.host.unwrap_or_else(|| defaults.host.clone());

    let client = OllamaClient::new(host, Duration::from_secs(defaults.timeout_secs));
    let manager = InstanceManager::new(
        client,
        InstanceOptions {
            namespace: args.namespace.unwrap_or_else(|| defaults.namespace.clone()),
            dry_run: args.dry_run,
        },
    );

    match args.action {
        Action::List => {
            for stub in read_stubs(&directory, &pattern)? {
                println!("{}", stub.filename);
            }
        }
        Action::Create => {
            let stubs = read_stubs(&directory, &pattern)?;
            let report = manager.create_all(&stubs).await;
            tracing::info!(
                "Processed {} modelfiles: {} created, {} skipped, {} failed",
                report.outcomes.len(),
                report.created(),
                report.skipped(),
                report.failed()
            );
        }
        Action::Rename => {
            manager
                .rename(args.source.as_deref(), args.dest.as_deref())
                .await?;
        }
        Action::Delete => manager.delete(args.source.as_deref()).await?,
    }

    Ok(())
}

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use talentx_api::{RestApi, ScorerState};
use talentx_scoring::openai::{DEFAULT_BASE_URL, DEFAULT_DIM, DEFAULT_MODEL};
use talentx_scoring::{
    EngineConfig, Embedder, ExpAggMode, HashingEmbedder, OpenAiConfig, OpenAiEmbedder,
    ScoreOptions, ScoreResult, ScoreWeights, ScoringEngine, DEFAULT_EMBEDDING_BATCH_SIZE,
    DEFAULT_HASH_DIM, DEFAULT_TOP_K_SEARCH,
};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Rank candidate profiles against job descriptions
#[derive(Parser, Debug)]
#[command(name = "talentx")]
#[command(about = "An in-memory candidate scoring engine", long_about = None)]
struct Cli {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(flatten)]
    embedding: EmbeddingArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Deterministic feature hashing, no network
    Hashing,
    /// OpenAI-compatible /embeddings endpoint
    Openai,
}

#[derive(Args, Debug)]
struct EmbeddingArgs {
    /// Embedding backend
    #[arg(long, value_enum, default_value_t = Backend::Hashing, global = true)]
    embedder: Backend,

    /// Output dimension of the hashing embedder
    #[arg(long, default_value_t = DEFAULT_HASH_DIM, global = true)]
    hash_dim: usize,

    #[arg(long, env = "TALENTX_OPENAI_API_KEY", hide_env_values = true, global = true)]
    openai_api_key: Option<String>,

    #[arg(long, env = "TALENTX_OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    openai_base_url: String,

    #[arg(long, env = "TALENTX_OPENAI_MODEL", default_value = DEFAULT_MODEL, global = true)]
    openai_model: String,

    /// Vector size returned by the OpenAI model
    #[arg(long, default_value_t = DEFAULT_DIM, global = true)]
    openai_dim: usize,

    /// Texts per embedding request
    #[arg(long, default_value_t = DEFAULT_EMBEDDING_BATCH_SIZE, global = true)]
    batch_size: usize,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP scorer
    Serve {
        /// HTTP API port
        #[arg(long, default_value_t = 8088)]
        http_port: u16,

        /// Folder of profile JSON files to index at startup
        #[arg(long)]
        profiles: Option<PathBuf>,

        /// Experience aggregation: sum, mean or sum_norm
        #[arg(long, default_value = "sum_norm")]
        exp_agg: ExpAggMode,
    },
    /// Index a folder of profiles and print the ranking for one job description
    Score {
        /// Folder of profile JSON files
        #[arg(long)]
        profiles: PathBuf,

        /// Job description text, or @path to read it from a file
        #[arg(long)]
        job: String,

        /// Experience aggregation: sum, mean or sum_norm
        #[arg(long, default_value = "sum_norm")]
        exp_agg: ExpAggMode,

        /// Component weights, e.g. "skills=0.5,experience=0.5"
        #[arg(long)]
        weights: Option<String>,

        /// Entries retrieved per section
        #[arg(long, default_value_t = DEFAULT_TOP_K_SEARCH)]
        top_k_search: usize,

        /// Number of results to print
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let embedder = build_embedder(&cli.embedding)?;
    let base_config = EngineConfig {
        embedding_batch_size: cli.embedding.batch_size,
        ..EngineConfig::default()
    };

    match cli.command {
        Command::Serve {
            http_port,
            profiles,
            exp_agg,
        } => serve(embedder, base_config, http_port, profiles, exp_agg),
        Command::Score {
            profiles,
            job,
            exp_agg,
            weights,
            top_k_search,
            top,
            json,
        } => {
            let weights = match weights {
                Some(text) => parse_weights(&text)?,
                None => ScoreWeights::default(),
            };
            let options = ScoreOptions::default()
                .with_weights(weights)
                .with_top_k_search(top_k_search);
            options.validate()?;

            let mut engine = ScoringEngine::new(embedder, base_config.with_exp_agg_mode(exp_agg))?;
            let report = engine.load_folder(&profiles)?;
            info!(
                "Indexed {} candidates ({} files skipped)",
                engine.len(),
                report.sources_skipped
            );

            let job_text = read_job(&job)?;
            let results = engine.score(&job_text, &options)?;
            print_results(&results[..top.min(results.len())], json)
        }
    }
}

fn build_embedder(args: &EmbeddingArgs) -> anyhow::Result<Arc<dyn Embedder>> {
    match args.embedder {
        Backend::Hashing => Ok(Arc::new(HashingEmbedder::new(args.hash_dim)?)),
        Backend::Openai => {
            let api_key = args
                .openai_api_key
                .clone()
                .context("the openai embedder needs --openai-api-key or TALENTX_OPENAI_API_KEY")?;
            let mut config = OpenAiConfig::new(api_key);
            config.base_url = args.openai_base_url.clone();
            config.model = args.openai_model.clone();
            config.dim = args.openai_dim;
            config.batch_size = args.batch_size;
            info!("Using embeddings from {} ({})", config.base_url, config.model);
            Ok(Arc::new(OpenAiEmbedder::new(config)?))
        }
    }
}

fn serve(
    embedder: Arc<dyn Embedder>,
    base_config: EngineConfig,
    http_port: u16,
    profiles: Option<PathBuf>,
    exp_agg: ExpAggMode,
) -> anyhow::Result<()> {
    info!("Starting talentx v{}", env!("CARGO_PKG_VERSION"));

    let state = Arc::new(ScorerState::new(embedder, base_config));
    if let Some(folder) = profiles {
        let summary = state.load_profiles(&folder, exp_agg, true)?;
        info!(
            "Indexed {} candidates from {:?}",
            summary.indexed_profiles, summary.source
        );
    }

    let state_http = state.clone();
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state_http, http_port).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("HTTP API: http://localhost:{}/scorer/health", http_port);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
            }
            _ = tokio::task::spawn_blocking(move || {
                http_handle.join().ok();
            }) => {
                info!("HTTP server stopped");
            }
        }
    });
    runtime.shutdown_timeout(Duration::from_secs(1));

    info!("Shutting down...");
    Ok(())
}

/// `@path` reads the job description from a file.
fn read_job(job: &str) -> anyhow::Result<String> {
    match job.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read job description from {}", path)),
        None => Ok(job.to_string()),
    }
}

/// Parse `"skills=0.5,experience=0.5"`, or a JSON object of the same keys.
fn parse_weights(text: &str) -> anyhow::Result<ScoreWeights> {
    let text = text.trim();
    if text.starts_with('{') {
        return serde_json::from_str(text).context("invalid weights JSON");
    }

    let mut pairs = Vec::new();
    for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, value) = part
            .split_once('=')
            .with_context(|| format!("expected name=value, got '{}'", part))?;
        let value: f32 = value
            .trim()
            .parse()
            .with_context(|| format!("invalid weight for {}", name.trim()))?;
        pairs.push((name.trim(), value));
    }
    Ok(ScoreWeights::from_pairs(pairs))
}

fn print_results(results: &[ScoreResult], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    for (rank, result) in results.iter().enumerate() {
        let b = &result.breakdown;
        println!(
            "{}. {}  score={:.4}  experience={:.4} skills={:.4} education={:.4} languages={:.4}",
            rank + 1,
            result.candidate_id,
            result.score,
            b.experience,
            b.skills,
            b.education,
            b.languages
        );
    }
    Ok(())
}

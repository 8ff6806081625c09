use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::courses::CourseAdvisor;
use crate::llm_client::{GeminiClient, TextGenerator};
use crate::model::ModelContext;
use crate::recommendation::models::PipelineResult;
use crate::recommendation::pipeline::Pipeline;
use crate::routes::build_router;
use crate::state::AppState;

/// Recommends job categories and training courses for a resume.
#[derive(Debug, Parser)]
#[command(name = "recommender", version)]
pub struct Cli {
    /// Classifier artifact (.safetensors); overrides MODEL_PATH
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    /// Vectorizer artifact (.json); overrides VECTORIZER_PATH
    #[arg(long, global = true)]
    pub vectorizer: Option<PathBuf>,

    /// Category label mapping (.json); overrides JOB_MAPPING_PATH
    #[arg(long, global = true)]
    pub job_mapping: Option<PathBuf>,

    /// Score by keyword counts with templated courses; needs no artifacts or API key
    #[arg(long, global = true)]
    pub keyword_fallback: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze one resume and print the result as JSON
    Analyze {
        /// Resume file (.pdf or .docx, or .txt with --keyword-fallback)
        file: PathBuf,

        /// Number of job categories to return
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Command-line paths win over the environment.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.model {
            config.model_path = path.clone();
        }
        if let Some(path) = &self.vectorizer {
            config.vectorizer_path = path.clone();
        }
        if let Some(path) = &self.job_mapping {
            config.job_mapping_path = path.clone();
        }
    }
}

pub async fn run(cli: Cli, mut config: Config) -> Result<ExitCode> {
    cli.apply_overrides(&mut config);

    match cli.command {
        Commands::Analyze { file, top_n } => {
            let result = analyze(&config, &file, top_n, cli.keyword_fallback).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(if result.is_error() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Serve { port } => {
            let pipeline = build_pipeline(&config, cli.keyword_fallback)?;
            serve(pipeline, port.unwrap_or(config.port)).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

pub async fn analyze(
    config: &Config,
    file: &Path,
    top_n: Option<usize>,
    keyword_fallback: bool,
) -> Result<PipelineResult> {
    let pipeline = build_pipeline(config, keyword_fallback)?;
    Ok(pipeline
        .process_with_top_n(file, top_n.unwrap_or(config.top_n))
        .await)
}

/// Loads every artifact and wires the course advisor. Fails when the classifier or
/// vectorizer cannot be loaded. Keyword mode loads nothing and cannot fail.
pub fn build_pipeline(config: &Config, keyword_fallback: bool) -> Result<Pipeline> {
    if keyword_fallback {
        info!("Keyword fallback enabled; model artifacts and the Gemini API are not used");
        return Ok(Pipeline::keyword_fallback(config.top_n));
    }

    let models = ModelContext::load(
        &config.model_path,
        &config.vectorizer_path,
        &config.job_mapping_path,
    )
    .context("Failed to load model artifacts")?;

    let generator: Option<Arc<dyn TextGenerator>> = match &config.gemini_api_key {
        Some(key) => {
            let client = GeminiClient::new(
                key.clone(),
                config.gemini_api_url.clone(),
                config.llm_timeout,
            )
            .context("Failed to build Gemini client")?;
            info!("Gemini client initialized (timeout: {:?})", config.llm_timeout);
            Some(Arc::new(client))
        }
        None => {
            warn!(
                "GEMINI_API_KEY (or VITE_GEMINI_API_KEY) is not set; \
                 course recommendations are disabled"
            );
            None
        }
    };

    Ok(Pipeline::new(
        models,
        CourseAdvisor::new(generator),
        config.top_n,
    ))
}

async fn serve(pipeline: Pipeline, port: u16) -> Result<()> {
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Server binary for html2doc.
//!
//! A thin shim over the library crate that maps CLI flags and environment
//! variables to `ServiceConfig` and serves until stopped.

use anyhow::{Context, Result};
use clap::Parser;
use html2doc::{
    AppState, ArtifactStore, EngineConfig, EngineCoordinator, ProcessEngine, ServiceConfig,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve with A4 geometry (points), staging under the current directory
  html2doc --document-width 595 --document-height 842

  # US Letter, explicit directories, custom converter binary
  html2doc --document-width 612 --document-height 792 \
           --input-dir /srv/conv/Input --export-dir /srv/conv/Export \
           --engine-program /opt/libreoffice/program/soffice

ENDPOINTS:
  POST /converter/htmlToWord       multipart form, file parts named 'files'
  GET  /converter/result/{name}    download a converted .doc artifact
  GET  /health                     liveness probe

ENVIRONMENT VARIABLES:
  DOCUMENT_WIDTH        Page width handed to the engine (required)
  DOCUMENT_HEIGHT       Page height handed to the engine (required)
  HTML2DOC_ADDR         Bind address (default 0.0.0.0:8080)
  HTML2DOC_ROOT         Content root holding Input/ and Export/
  HTML2DOC_ENGINE       Converter program (default: soffice)

SETUP:
  LibreOffice must be installed and `soffice` reachable on PATH (or point
  HTML2DOC_ENGINE at it). The Input/ and Export/ directories are created
  on startup if missing.
"#;

/// HTML to legacy Word conversion service.
#[derive(Parser, Debug)]
#[command(
    name = "html2doc",
    version,
    about = "HTML to legacy Word (.doc) conversion service",
    long_about = "Accepts HTML uploads over HTTP, wraps them into a canonical document \
shell, drives an external converter (LibreOffice by default) to produce legacy Word \
files, and serves the converted artifacts.",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Bind address for the HTTP listener.
    #[arg(long, env = "HTML2DOC_ADDR", default_value = "0.0.0.0:8080")]
    addr: String,

    /// Content root; Input/ and Export/ are created beneath it.
    #[arg(long, env = "HTML2DOC_ROOT", default_value = ".")]
    root: PathBuf,

    /// Override the input staging directory.
    #[arg(long, env = "HTML2DOC_INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Override the export directory.
    #[arg(long, env = "HTML2DOC_EXPORT_DIR")]
    export_dir: Option<PathBuf>,

    /// Page width in engine units. Startup fails without a valid integer.
    #[arg(long, env = "DOCUMENT_WIDTH")]
    document_width: u32,

    /// Page height in engine units. Startup fails without a valid integer.
    #[arg(long, env = "DOCUMENT_HEIGHT")]
    document_height: u32,

    /// Converter executable to spawn for each conversion.
    #[arg(long, env = "HTML2DOC_ENGINE")]
    engine_program: Option<String>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "HTML2DOC_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let default_filter = if cli.verbose {
        "html2doc=debug,tower_http=debug"
    } else {
        "html2doc=info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ServiceConfig::builder()
        .bind_addr(&cli.addr)
        .content_root(&cli.root)
        .page_size(cli.document_width, cli.document_height);

    if let Some(dir) = cli.input_dir {
        builder = builder.input_dir(dir);
    }
    if let Some(dir) = cli.export_dir {
        builder = builder.export_dir(dir);
    }
    if let Some(program) = cli.engine_program {
        builder = builder.engine(EngineConfig {
            program,
            ..EngineConfig::default()
        });
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Wire up state and serve ──────────────────────────────────────────
    let store = ArtifactStore::new(&config.input_dir, &config.export_dir);
    store.ensure_dirs().with_context(|| {
        format!(
            "Failed to create staging directories '{}' and '{}'",
            config.input_dir.display(),
            config.export_dir.display()
        )
    })?;

    let engine = ProcessEngine::new(config.engine.clone(), config.page);
    let state = AppState::new(store, EngineCoordinator::new(engine));

    tracing::info!(
        input = %config.input_dir.display(),
        export = %config.export_dir.display(),
        page_width = config.page.width,
        page_height = config.page.height,
        "html2doc configured"
    );

    html2doc::start_server(&config.bind_addr, state)
        .await
        .context("Server failed")?;

    Ok(())
}

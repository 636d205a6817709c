//! # html2doc
//!
//! Convert uploaded HTML documents into legacy Word (`.doc`) files by
//! driving an external conversion engine, and serve the results over HTTP.
//!
//! ## Why this crate?
//!
//! Producing faithful `.doc` output is the kind of problem best delegated
//! to a real word processor. This crate does not parse HTML or emit OLE
//! containers itself; it owns everything around the engine instead: upload
//! validation, canonical on-disk staging, serialised engine invocation, and
//! stable retrieval handles for the produced artifacts.
//!
//! ## Request Pipeline
//!
//! ```text
//! upload (multipart)
//!  │
//!  ├─ 1. Validate   first non-empty `files` part must be text/html
//!  ├─ 2. Normalise  wrap the fragment into a fixed HTML document shell
//!  ├─ 3. Stage      write Input/<name>.html
//!  ├─ 4. Convert    external engine produces Export/<logical>.doc
//!  └─ 5. Respond    {success, fileUrl, message}; fileUrl is the
//!                   retrieval key for GET /converter/result/{fileUrl}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use html2doc::{
//!     ArtifactStore, AppState, EngineCoordinator, ProcessEngine, ServiceConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::builder()
//!         .content_root("/var/lib/html2doc")
//!         .page_size(595, 842)
//!         .build()?;
//!
//!     let store = ArtifactStore::new(&config.input_dir, &config.export_dir);
//!     store.ensure_dirs()?;
//!
//!     let engine = ProcessEngine::new(config.engine.clone(), config.page);
//!     let state = AppState::new(store, EngineCoordinator::new(engine));
//!     html2doc::start_server(&config.bind_addr, state).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! The engine is one long-lived external resource per process, configured
//! with its page geometry once at startup. The coordinator serialises
//! access to it: concurrent uploads queue, one conversion runs at a time.
//! Requests for distinct logical names are otherwise independent; requests
//! sharing a logical name race on the staged and exported files, and the
//! last writer wins.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `html2doc` server binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod server;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{EngineConfig, PageSize, ServiceConfig, ServiceConfigBuilder};
pub use convert::{convert_upload, ConversionOutcome};
pub use engine::{ConversionEngine, EngineCoordinator, EngineOutcome, ProcessEngine};
pub use error::ConvertError;
pub use server::{build_router, start_server, AppState};
pub use store::{logical_name, ArtifactStore};

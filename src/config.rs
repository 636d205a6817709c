//! Configuration types for the conversion service.
//!
//! All behaviour is controlled through [`ServiceConfig`], built via its
//! [`ServiceConfigBuilder`] and validated once at startup. The struct is
//! immutable after `build()`: page size in particular is captured here and
//! handed to the engine exactly once, never re-read per request.

use crate::error::ConvertError;
use serde::Serialize;
use std::path::PathBuf;

/// Page dimensions forwarded to the conversion engine, in whatever unit the
/// engine expects (LibreOffice takes points).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

/// How the external converter program is invoked.
///
/// `args` is a template: `{input}` and `{export_dir}` are substituted per
/// conversion, while `{page_width}` and `{page_height}` are substituted once
/// when the engine is constructed. The default template drives LibreOffice
/// in headless mode, which writes `<stem>.doc` into the given output
/// directory.
#[derive(Debug, Clone, Serialize)]
pub struct EngineConfig {
    /// Converter executable, resolved via `PATH` if not absolute.
    pub program: String,
    /// Argument template, one placeholder-bearing string per argv entry.
    pub args: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: "soffice".to_string(),
            args: vec![
                "--headless".to_string(),
                "--norestore".to_string(),
                "--convert-to".to_string(),
                "doc".to_string(),
                "--outdir".to_string(),
                "{export_dir}".to_string(),
                "{input}".to_string(),
            ],
        }
    }
}

/// Configuration for the html2doc service.
///
/// # Example
/// ```rust
/// use html2doc::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .content_root("/var/lib/html2doc")
///     .page_size(595, 842)
///     .build()
///     .unwrap();
/// assert!(config.input_dir.ends_with("Input"));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ServiceConfig {
    /// Address the HTTP listener binds to. Default: `0.0.0.0:8080`.
    pub bind_addr: String,

    /// Staging directory for normalised HTML inputs. Default:
    /// `<content root>/Input`.
    pub input_dir: PathBuf,

    /// Directory the engine writes `.doc` artifacts into, and the root all
    /// downloads are resolved against. Default: `<content root>/Export`.
    pub export_dir: PathBuf,

    /// Page dimensions applied to every produced document.
    pub page: PageSize,

    /// External converter invocation.
    pub engine: EngineConfig,
}

impl ServiceConfig {
    /// Create a new builder with defaults and the page size unset.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug, Default)]
pub struct ServiceConfigBuilder {
    bind_addr: Option<String>,
    content_root: Option<PathBuf>,
    input_dir: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    page: Option<PageSize>,
    engine: Option<EngineConfig>,
}

impl ServiceConfigBuilder {
    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = Some(addr.into());
        self
    }

    /// Root under which the default `Input/` and `Export/` directories live.
    pub fn content_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.content_root = Some(root.into());
        self
    }

    /// Override the input staging directory (ignores the content root).
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(dir.into());
        self
    }

    /// Override the export directory (ignores the content root).
    pub fn export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    pub fn page_size(mut self, width: u32, height: u32) -> Self {
        self.page = Some(PageSize { width, height });
        self
    }

    pub fn engine(mut self, engine: EngineConfig) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// Page width and height are required and must be non-zero; a service
    /// without them must not start.
    pub fn build(self) -> Result<ServiceConfig, ConvertError> {
        let page = self
            .page
            .ok_or_else(|| ConvertError::InvalidConfig("page size is required".into()))?;
        if page.width == 0 || page.height == 0 {
            return Err(ConvertError::InvalidConfig(format!(
                "page size must be non-zero, got {}x{}",
                page.width, page.height
            )));
        }

        let root = self.content_root.unwrap_or_else(|| PathBuf::from("."));
        let engine = self.engine.unwrap_or_default();
        if engine.program.trim().is_empty() {
            return Err(ConvertError::InvalidConfig(
                "engine program must not be empty".into(),
            ));
        }

        Ok(ServiceConfig {
            bind_addr: self
                .bind_addr
                .unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            input_dir: self.input_dir.unwrap_or_else(|| root.join("Input")),
            export_dir: self.export_dir.unwrap_or_else(|| root.join("Export")),
            page,
            engine,
        })
    }
}

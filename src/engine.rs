//! Adapter to the external conversion engine.
//!
//! The engine is an opaque external program that opens a staged HTML file
//! and saves a legacy Word document. The adapter's contract is narrow:
//! given an input path and a desired output path, report a structured
//! [`EngineOutcome`]. Failures to launch the program, open the input, or
//! produce the output all come back as `success: false` with a readable
//! message; this function never returns a Rust error and never panics on
//! engine misbehaviour.
//!
//! ## Why a coordinator?
//!
//! The engine is an expensive, stateful external resource configured once
//! per process (page size included) and not documented as reentrant.
//! [`EngineCoordinator`] therefore owns the single engine instance behind a
//! `tokio::sync::Mutex`: at most one conversion is in flight at a time, and
//! concurrent requests queue on the lock in arrival order.

use crate::config::{EngineConfig, PageSize};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::debug;

/// Result of one conversion attempt, as reported by the engine adapter.
#[derive(Debug, Clone, Serialize)]
pub struct EngineOutcome {
    pub success: bool,
    pub message: String,
}

impl EngineOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// A conversion engine: turns a staged HTML file into a `.doc` artifact.
///
/// Implementations must create or overwrite the file at `output` on
/// success. They must not return early before the artifact is durable;
/// callers treat a successful outcome as "the file is there now".
#[async_trait]
pub trait ConversionEngine: Send + Sync {
    async fn convert(&self, input: &Path, output: &Path) -> EngineOutcome;
}

/// Production engine: spawns an external converter process.
///
/// The argument template comes from [`EngineConfig`]; the page-size
/// placeholders are resolved here, once, because the engine is a long-lived
/// resource whose document geometry is fixed for the life of the process.
/// Only `{input}`, `{output}` and `{export_dir}` vary per call.
///
/// Converters like LibreOffice ignore requested output names and write
/// `<input stem>.<ext>` into the output directory instead. After a
/// successful run the produced file is moved onto the promised `output`
/// path, so the trait contract holds even for multi-dot input names.
pub struct ProcessEngine {
    program: String,
    args: Vec<String>,
}

impl ProcessEngine {
    pub fn new(config: EngineConfig, page: PageSize) -> Self {
        let width = page.width.to_string();
        let height = page.height.to_string();
        let args = config
            .args
            .iter()
            .map(|a| {
                a.replace("{page_width}", &width)
                    .replace("{page_height}", &height)
            })
            .collect();
        Self {
            program: config.program,
            args,
        }
    }

    /// Substitute the per-call placeholders into the resolved template.
    fn render_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input_str = input.to_string_lossy();
        let output_str = output.to_string_lossy();
        let export_dir = output
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_string_lossy();
        self.args
            .iter()
            .map(|a| {
                a.replace("{input}", &input_str)
                    .replace("{output}", &output_str)
                    .replace("{export_dir}", &export_dir)
            })
            .collect()
    }
}

#[async_trait]
impl ConversionEngine for ProcessEngine {
    async fn convert(&self, input: &Path, output: &Path) -> EngineOutcome {
        let args = self.render_args(input, output);
        debug!(program = %self.program, ?args, "invoking conversion engine");

        let run = Command::new(&self.program).args(&args).output().await;
        let done = match run {
            Ok(done) => done,
            Err(e) => {
                return EngineOutcome::failed(format!(
                    "Failed to launch conversion engine '{}': {e}",
                    self.program
                ));
            }
        };

        if !done.status.success() {
            let stderr = String::from_utf8_lossy(&done.stderr);
            let detail = last_line(&stderr).unwrap_or("no diagnostic output");
            return EngineOutcome::failed(format!(
                "Conversion engine exited with {}: {detail}",
                done.status
            ));
        }

        // The converter names its artifact after the input stem, so a
        // multi-dot upload lands at `<stem>.doc` rather than the promised
        // output path. Claim it before reporting.
        if let Some(produced) = produced_path(input, output) {
            if produced != output
                && tokio::fs::try_exists(&produced).await.unwrap_or(false)
            {
                if let Err(e) = tokio::fs::rename(&produced, output).await {
                    return EngineOutcome::failed(format!(
                        "Conversion engine wrote '{}' but it could not be moved to '{}': {e}",
                        produced.display(),
                        output.display()
                    ));
                }
            }
        }

        // A zero exit status is not enough; the engine must actually have
        // written the artifact we promised the caller.
        match tokio::fs::try_exists(output).await {
            Ok(true) => EngineOutcome::ok(format!(
                "Converted '{}' to '{}'",
                input.display(),
                output.display()
            )),
            _ => EngineOutcome::failed(format!(
                "Conversion engine produced no output at '{}'",
                output.display()
            )),
        }
    }
}

/// Serialises access to the process-wide engine instance.
pub struct EngineCoordinator {
    engine: Mutex<Box<dyn ConversionEngine>>,
}

impl EngineCoordinator {
    pub fn new<E: ConversionEngine + 'static>(engine: E) -> Self {
        Self {
            engine: Mutex::new(Box::new(engine)),
        }
    }

    /// Run one conversion. Blocks (asynchronously) while another conversion
    /// holds the engine; there is no cancellation once the engine starts.
    pub async fn convert(&self, input: &Path, output: &Path) -> EngineOutcome {
        let engine = self.engine.lock().await;
        engine.convert(input, output).await
    }
}

/// Where the converter actually writes: the input's stem with the output's
/// extension, next to `output`. Returns `None` when either part is missing.
fn produced_path(input: &Path, output: &Path) -> Option<PathBuf> {
    let stem = input.file_stem()?;
    let ext = output.extension()?;
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(ext);
    Some(output.with_file_name(name))
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).next_back()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn page() -> PageSize {
        PageSize {
            width: 595,
            height: 842,
        }
    }

    #[test]
    fn page_placeholders_resolve_at_construction() {
        let engine = ProcessEngine::new(
            EngineConfig {
                program: "conv".into(),
                args: vec![
                    "--width".into(),
                    "{page_width}".into(),
                    "--height".into(),
                    "{page_height}".into(),
                    "{input}".into(),
                ],
            },
            page(),
        );
        assert_eq!(engine.args[1], "595");
        assert_eq!(engine.args[3], "842");
        // The per-call placeholder survives construction untouched.
        assert_eq!(engine.args[4], "{input}");
    }

    #[test]
    fn per_call_placeholders_resolve_per_conversion() {
        let engine = ProcessEngine::new(EngineConfig::default(), page());
        let args = engine.render_args(
            Path::new("/in/report.html"),
            Path::new("/out/report.doc"),
        );
        assert!(args.contains(&"/in/report.html".to_string()));
        assert!(args.contains(&"/out".to_string()));
    }

    #[tokio::test]
    async fn missing_program_is_a_failure_outcome_not_a_panic() {
        let engine = ProcessEngine::new(
            EngineConfig {
                program: "/nonexistent/html2doc-test-converter".into(),
                args: vec!["{input}".into()],
            },
            page(),
        );
        let outcome = engine
            .convert(Path::new("/tmp/a.html"), Path::new("/tmp/a.doc"))
            .await;
        assert!(!outcome.success);
        assert!(
            outcome.message.contains("Failed to launch"),
            "got: {}",
            outcome.message
        );
    }

    #[tokio::test]
    async fn zero_exit_without_an_artifact_is_still_a_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("report.doc");
        // `true` exits 0 and writes nothing.
        let engine = ProcessEngine::new(
            EngineConfig {
                program: "true".into(),
                args: vec![],
            },
            page(),
        );
        let outcome = engine
            .convert(Path::new("/tmp/report.html"), &output)
            .await;
        assert!(!outcome.success);
        assert!(
            outcome.message.contains("no output"),
            "got: {}",
            outcome.message
        );
    }

    #[tokio::test]
    async fn coordinator_never_overlaps_conversions() {
        struct Probing {
            busy: Arc<AtomicBool>,
            overlapped: Arc<AtomicBool>,
        }

        #[async_trait]
        impl ConversionEngine for Probing {
            async fn convert(&self, _input: &Path, _output: &Path) -> EngineOutcome {
                if self.busy.swap(true, Ordering::SeqCst) {
                    self.overlapped.store(true, Ordering::SeqCst);
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
                self.busy.store(false, Ordering::SeqCst);
                EngineOutcome::ok("done")
            }
        }

        let overlapped = Arc::new(AtomicBool::new(false));
        let coordinator = Arc::new(EngineCoordinator::new(Probing {
            busy: Arc::new(AtomicBool::new(false)),
            overlapped: Arc::clone(&overlapped),
        }));

        let a = {
            let c = Arc::clone(&coordinator);
            tokio::spawn(async move {
                c.convert(Path::new("/a.html"), Path::new("/a.doc")).await
            })
        };
        let b = {
            let c = Arc::clone(&coordinator);
            tokio::spawn(async move {
                c.convert(Path::new("/b.html"), Path::new("/b.doc")).await
            })
        };

        let (ra, rb) = (a.await.unwrap(), b.await.unwrap());
        assert!(ra.success && rb.success);
        assert!(
            !overlapped.load(Ordering::SeqCst),
            "two conversions ran against the engine at once"
        );
    }

    #[test]
    fn produced_path_follows_the_input_stem() {
        let shifted = produced_path(
            Path::new("/in/annual.summary.html"),
            Path::new("/out/annual.doc"),
        )
        .unwrap();
        assert_eq!(shifted, PathBuf::from("/out/annual.summary.doc"));

        let same =
            produced_path(Path::new("/in/report.html"), Path::new("/out/report.doc")).unwrap();
        assert_eq!(same, PathBuf::from("/out/report.doc"));
    }

    #[tokio::test]
    async fn stem_named_artifact_is_claimed_onto_the_promised_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("annual.doc");
        // Stand-in converter that names its artifact after the input stem,
        // as LibreOffice does.
        let engine = ProcessEngine::new(
            EngineConfig {
                program: "touch".into(),
                args: vec!["{export_dir}/annual.summary.doc".into()],
            },
            page(),
        );
        let outcome = engine
            .convert(Path::new("/in/annual.summary.html"), &output)
            .await;
        assert!(outcome.success, "got: {}", outcome.message);
        assert!(output.exists());
        assert!(!dir.path().join("annual.summary.doc").exists());
    }

    #[test]
    fn last_line_picks_the_final_diagnostic() {
        let stderr = "warning: something\n\nError: source file missing\n";
        assert_eq!(last_line(stderr), Some("Error: source file missing"));
        assert_eq!(last_line(""), None);
    }
}

//! Per-request conversion orchestration.
//!
//! One call to [`convert_upload`] covers the life of a validated upload:
//! derive the logical name, stage the normalised HTML in the input
//! directory, hand the staged file to the engine coordinator, and shape the
//! caller-facing [`ConversionOutcome`].
//!
//! Staging I/O faults end the request as a client error carrying the fault
//! message. Engine failures do not: they travel inside a normally shaped
//! outcome with `success: false`, because by then the request itself was
//! handled correctly.

use crate::engine::EngineCoordinator;
use crate::error::ConvertError;
use crate::normalize;
use crate::store::{logical_name, ArtifactStore};
use serde::Serialize;
use tracing::{error, info};

/// What the caller gets back for a staged-and-converted upload.
///
/// `file_url` is the export file's name and doubles as the retrieval key
/// for the download endpoint. It is present whenever staging succeeded,
/// even if the engine then reported failure.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    pub message: String,
}

/// Stage one uploaded HTML fragment and convert it.
///
/// `file_name` is the name the client uploaded under; it decides both the
/// staged path (`input_dir/<file_name>`) and, through the logical name, the
/// export path (`export_dir/<logical>.doc`). Repeat uploads with the same
/// prefix overwrite both files.
pub async fn convert_upload(
    file_name: &str,
    fragment: &[u8],
    store: &ArtifactStore,
    engine: &EngineCoordinator,
) -> Result<ConversionOutcome, ConvertError> {
    let logical = logical_name(file_name);
    let staged = store.input_path(file_name);
    let export = store.export_path(logical);

    info!(%logical, staged = %staged.display(), "staging upload");
    if let Err(e) = stage(&staged, fragment).await {
        info!("Failed to export word of {logical}");
        error!("Failed to export word of {logical}. Error is {e}");
        return Err(ConvertError::StagingFailed {
            name: logical.to_string(),
            source: e,
        });
    }

    let outcome = engine.convert(&staged, &export).await;
    info!(%logical, success = outcome.success, "conversion finished");

    Ok(ConversionOutcome {
        success: outcome.success,
        file_url: Some(format!("{logical}.doc")),
        message: outcome.message,
    })
}

/// Write the wrapped document to the staged path, overwriting any previous
/// upload of the same name.
async fn stage(path: &std::path::Path, fragment: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    normalize::write_wrapped(&mut file, fragment).await
}

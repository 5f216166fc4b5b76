use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use retint::{EditSession, PathKind, PathSpec, RetintResult, SegmentSettings};

use crate::cli::ServiceArgs;

/// Derive a variant file path by appending a suffix before the extension.
pub fn derive_variant_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let mut derived = input.to_path_buf();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| suffix.to_string());
    derived.set_file_name(format!("{stem}-{suffix}.{extension}"));
    derived
}

/// Build segmentation settings from the service CLI arguments.
pub fn build_settings(service: &ServiceArgs) -> SegmentSettings {
    let mut settings = SegmentSettings::new(&service.endpoint, &service.upload_endpoint)
        .with_timeout(Duration::from_secs(service.timeout_secs))
        .with_retry(!service.no_retry);
    if let Some(key) = &service.api_key {
        settings = settings.with_api_key(key);
    }
    settings
}

/// Load a selection file and replay its strokes into a session sized from
/// the source image. Returns the session plus the number of invalid strokes
/// that were discarded.
pub fn load_session(selections: &Path, image: &Path) -> RetintResult<(EditSession, usize)> {
    let image_bytes = fs::read(image)?;
    let mut session = EditSession::for_image_bytes(&image_bytes)?;

    let file = fs::read(selections)?;
    let specs: Vec<PathSpec> = serde_json::from_slice(&file)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

    let mut discarded = 0;
    for spec in specs {
        let is_rubber = spec.kind == PathKind::Rubber;
        if session.add_spec(spec).is_none() && !is_rubber {
            discarded += 1;
        }
    }
    Ok((session, discarded))
}

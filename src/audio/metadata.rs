use std::path::Path;

use lofty::file::AudioFile;

use super::engine::MetadataReader;
use super::types::MetadataError;

/// Duration lookup backed by `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyMetadata;

impl MetadataReader for LoftyMetadata {
    fn duration_seconds(&self, path: &Path) -> Result<f64, MetadataError> {
        let tagged = lofty::read_from_path(path).map_err(|e| MetadataError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let duration = tagged.properties().duration();
        if duration.is_zero() {
            return Err(MetadataError::NoDuration {
                path: path.to_path_buf(),
            });
        }
        Ok(duration.as_secs_f64())
    }
}

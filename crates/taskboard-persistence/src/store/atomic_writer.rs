use std::path::Path;
use taskboard_core::BoardResult;
use tokio::fs;

/// Writes whole files through a temp file in the same directory followed
/// by a rename, so readers never observe a half-written file.
pub struct AtomicWriter;

impl AtomicWriter {
    pub async fn write_atomic(path: &Path, data: &[u8]) -> BoardResult<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).await?;

        let temp_path = tempfile::NamedTempFile::new_in(parent)?.into_temp_path();
        fs::write(&temp_path, data).await?;
        temp_path.persist(path).map_err(|e| e.error)?;

        tracing::debug!(
            "Atomically wrote {} bytes to {}",
            data.len(),
            path.display()
        );
        Ok(())
    }

    /// `None` when the file does not exist yet.
    pub async fn read_if_exists(path: &Path) -> BoardResult<Option<Vec<u8>>> {
        match fs::read(path).await {
            Ok(data) => {
                tracing::debug!("Read {} bytes from {}", data.len(), path.display());
                Ok(Some(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

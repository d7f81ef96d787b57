//! Sequential writer for one image's temp file.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{next_temp_id, temp_path};

/// Writes an image body to its own temp file in receipt order.
/// `finalize` renames it into place; dropping the writer without a successful
/// `finalize` (failure, `discard`, or unwinding) removes the temp file.
pub struct ImageWriter {
    file: Option<BufWriter<File>>,
    temp_path: PathBuf,
    final_path: PathBuf,
    written: u64,
    committed: bool,
}

impl ImageWriter {
    /// Create a fresh temp file for `final_path`.
    pub fn create(final_path: &Path) -> io::Result<Self> {
        let temp_path = temp_path(final_path, next_temp_id());
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        Ok(ImageWriter {
            file: Some(BufWriter::new(file)),
            temp_path,
            final_path: final_path.to_path_buf(),
            written: 0,
            committed: false,
        })
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Flush and rename the temp file to the final path. Returns bytes written.
    /// On error the temp file is removed.
    pub fn finalize(mut self) -> Result<u64> {
        if let Some(file) = self.file.take() {
            let file = file
                .into_inner()
                .map_err(|e| e.into_error())
                .with_context(|| format!("flush {}", self.temp_path.display()))?;
            drop(file);
        }

        std::fs::rename(&self.temp_path, &self.final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                self.temp_path.display(),
                self.final_path.display()
            )
        })?;
        self.committed = true;
        Ok(self.written)
    }

    /// Drop the temp file after a failed transfer.
    pub fn discard(self) {
        drop(self);
    }
}

impl Drop for ImageWriter {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        drop(self.file.take());
        if let Err(e) = std::fs::remove_file(&self.temp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::debug!(path = %self.temp_path.display(), "could not remove temp file: {}", e);
            }
        }
    }
}

impl Write for ImageWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("image writer already closed"))?;
        let n = file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

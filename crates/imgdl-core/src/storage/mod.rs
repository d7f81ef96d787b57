//! Image file lifecycle.
//!
//! Bytes are streamed into a temp file next to the final path (truncated on
//! open) and renamed to the final name only once the transfer succeeded, so a
//! failed or interrupted fetch never leaves a partial file under the final
//! `image_<n>.<ext>` name. Each writer gets its own temp name; two tasks that
//! target the same final path never share a temp file.

mod writer;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

pub use writer::ImageWriter;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

static NEXT_TEMP_ID: AtomicU64 = AtomicU64::new(0);

/// Temp path for `final_path` tagged with `id`
/// (e.g. `image_0.jpg`, 7 → `image_0.jpg.7.part`).
fn temp_path(final_path: &Path, id: u64) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(format!(".{}{}", id, TEMP_SUFFIX));
    PathBuf::from(o)
}

fn next_temp_id() -> u64 {
    NEXT_TEMP_ID.fetch_add(1, Ordering::Relaxed)
}

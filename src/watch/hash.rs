use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use anyhow::{Context, Result};
use blake3::Hasher;
use tracing::debug;

/// Compute the hash of a single file, or `None` if it does not exist.
pub fn compute_file_hash(path: &Path) -> Result<Option<String>> {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("opening file for hashing: {:?}", path));
        }
    };

    let mut hasher = Hasher::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(Some(hasher.finalize().to_hex().to_string()))
}

/// Remembers the last seen content hash of one file.
///
/// Editors and `notify` often report several events for a single save; only
/// the first one that actually changes the content counts.
#[derive(Debug, Clone, Default)]
pub struct ContentFingerprint {
    last: Option<String>,
}

impl ContentFingerprint {
    /// Start from the current content of `path`.
    pub fn of(path: &Path) -> Result<Self> {
        Ok(Self {
            last: compute_file_hash(path)?,
        })
    }

    /// Re-hash `path`; returns `true` if the content differs from last time.
    ///
    /// A missing file is not a change: the last good config stays active.
    pub fn refresh(&mut self, path: &Path) -> Result<bool> {
        let Some(current) = compute_file_hash(path)? else {
            debug!(?path, "watched file is missing");
            return Ok(false);
        };

        if self.last.as_deref() == Some(current.as_str()) {
            return Ok(false);
        }

        debug!(?path, hash = %current, "watched file content changed");
        self.last = Some(current);
        Ok(true)
    }
}

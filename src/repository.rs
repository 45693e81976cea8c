//! Plain JSON file persistence.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, task::spawn_blocking};

use crate::{Error, Result};

/// Writes `value` as pretty JSON, creating parent directories as needed.
///
/// The document goes to a uniquely named temp file next to `path` and is renamed into
/// place, so concurrent saves of the same artifact each replace it whole.
pub async fn save<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).await.map_err(Error::io_at(&dir))?;

    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');

    let path = path.to_path_buf();
    spawn_blocking(move || write_replacing(&dir, &path, &bytes)).await?
}

fn write_replacing(dir: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(Error::io_at(dir))?;
    tmp.write_all(bytes).map_err(Error::io_at(tmp.path()))?;
    tmp.flush().map_err(Error::io_at(tmp.path()))?;
    tmp.persist(path).map_err(|err| Error::IoAt {
        path: path.to_path_buf(),
        source: err.error,
    })?;
    Ok(())
}

pub async fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).await.map_err(Error::io_at(path))?;
    serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })
}

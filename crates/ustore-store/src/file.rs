use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use fastrace::trace;
use tracing::debug;
use ustore_types::Users;

use crate::lock::{lock_file, LockMode};
use crate::StoreError;

/// An open collection file, positioned wherever the last read or write left it.
pub(crate) struct StoreFile {
    file: File,
}

impl StoreFile {
    /// Opens `path` for read/write, creating an empty file if it is absent.
    #[trace]
    pub(crate) fn open(path: &Path, lock: Option<LockMode>) -> Result<Self, StoreError> {
        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        let file = options.open(path)?;

        if let Some(mode) = lock {
            lock_file(&file, mode)?;
            debug!("Locked {} ({:?})", path.display(), mode);
        }

        Ok(Self { file })
    }

    /// Reads and decodes the whole collection. Zero bytes is an empty collection.
    #[trace]
    pub(crate) fn read_all(&mut self) -> Result<Users, StoreError> {
        let mut data = Vec::new();
        self.file.read_to_end(&mut data)?;
        debug!("Read {} bytes", data.len());

        if data.is_empty() {
            return Ok(Users::new());
        }

        let users: Option<Users> =
            serde_json::from_slice(&data).map_err(StoreError::MalformedFile)?;
        Ok(users.unwrap_or_default())
    }

    /// Replaces the file contents with the encoded collection.
    #[trace]
    pub(crate) fn write_all(&mut self, users: &Users, pretty: bool) -> Result<(), StoreError> {
        let data = if pretty {
            serde_json::to_vec_pretty(users)?
        } else {
            serde_json::to_vec(users)?
        };

        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&data)?;
        self.file.sync_all()?;
        debug!("Wrote {} records ({} bytes)", users.len(), data.len());
        Ok(())
    }
}

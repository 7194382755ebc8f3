//! Fitness store persistence with file locking.
//!
//! The whole store lives in one pretty-printed JSON file. Loading tolerates a
//! damaged file by moving it aside; saving always rewrites the full file.

use crate::{Error, FitnessStore, Result};
use fs2::FileExt;
use serde::Serialize;
use std::ffi::OsString;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default store file name inside the data directory
pub const DEFAULT_FILE_NAME: &str = "fitness_data.json";

/// Suffix appended to a store file that failed to parse
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// Result of loading the store
#[derive(Debug)]
pub struct Loaded {
    pub store: FitnessStore,
    /// Set to [`Error::DataCorruption`] when the file was quarantined
    pub corruption: Option<Error>,
}

/// Path a corrupt store file is renamed to
pub fn quarantine_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(CORRUPT_SUFFIX);
    PathBuf::from(name)
}

impl FitnessStore {
    /// Load the store from a file with shared locking
    ///
    /// Returns an empty store if the file doesn't exist. If the contents
    /// cannot be parsed, the file is renamed with [`CORRUPT_SUFFIX`] and an
    /// empty store is returned together with the corruption notice.
    pub fn load(path: &Path) -> Result<Loaded> {
        if !path.exists() {
            tracing::info!("No data file found at {:?}, starting empty", path);
            return Ok(Loaded {
                store: Self::default(),
                corruption: None,
            });
        }

        let contents = {
            let file = File::open(path)?;
            file.lock_shared()?;

            let mut contents = Vec::new();
            let read = std::io::BufReader::new(&file).read_to_end(&mut contents);
            file.unlock()?;
            read?;
            contents
        };

        match serde_json::from_slice::<FitnessStore>(&contents) {
            Ok(store) => {
                tracing::debug!("Loaded fitness data from {:?}", path);
                Ok(Loaded {
                    store,
                    corruption: None,
                })
            }
            Err(e) => {
                let backup = quarantine_path(path);
                std::fs::rename(path, &backup)?;
                tracing::warn!(
                    "Failed to parse data file {:?}: {}. Moved it to {:?} and starting empty.",
                    path,
                    e,
                    backup
                );
                Ok(Loaded {
                    store: Self::default(),
                    corruption: Some(Error::DataCorruption {
                        path: path.to_path_buf(),
                        backup,
                        reason: e.to_string(),
                    }),
                })
            }
        }
    }

    /// Save the store to a file with exclusive locking
    ///
    /// Atomically writes the store by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the existing file
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(dir)?;

        // Acquire exclusive lock on the temp file to serialize concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
            self.serialize(&mut serializer)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace old data file
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved fitness data to {:?}", path);
        Ok(())
    }
}

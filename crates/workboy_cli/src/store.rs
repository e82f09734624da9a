//! Datafile persistence: load, save, backup and archives.
//!
//! # Responsibility
//! - Read and decode the JSON datafile into a company index.
//! - Write saves with an automatic backup of the previous content.
//! - Copy, restore, list and delete archive files.
//!
//! # Invariants
//! - Save writes the backup before the datafile.
//! - Sub-collection ids are compacted at save; company ids are stable.
//! - A missing or blank datafile loads as an empty index, not an error.
//! - Archive operations move raw bytes and never decode them.

use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use workboy_core::{compact_ids, CompanyIndex, SUB_ID_WIDTH};

use crate::paths::{DataPaths, BACKUP_FILE_NAME, DATA_FILE_NAME};

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Decode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "datafile access failed: {err}"),
            StoreError::Decode(err) => write!(f, "datafile could not be decoded: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            StoreError::Decode(err) => Some(err),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err)
    }
}

/// A decoded index plus the raw text it came from.
///
/// The raw text becomes the backup on the next save, so a bad session can
/// always be rolled back to the state the program started with.
#[derive(Debug)]
pub struct LoadedIndex {
    pub index: CompanyIndex,
    pub raw: String,
}

/// Loads the datafile. Missing or blank files yield an empty index.
pub fn load_index(paths: &DataPaths) -> Result<LoadedIndex, StoreError> {
    let raw = match fs::read_to_string(paths.datafile()) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err.into()),
    };
    if raw.trim().is_empty() {
        return Ok(LoadedIndex {
            index: CompanyIndex::new(),
            raw: String::new(),
        });
    }
    let index: CompanyIndex = serde_json::from_str(&raw)?;
    log::debug!("event=datafile_loaded companies={}", index.len());
    Ok(LoadedIndex { index, raw })
}

/// Saves the index, first preserving the startup content as the backup.
pub fn save_index(
    paths: &DataPaths,
    index: &CompanyIndex,
    startup_raw: &str,
) -> Result<(), StoreError> {
    let compacted = compact_sub_collections(index);
    fs::write(paths.backup(), startup_raw)?;
    let encoded = serde_json::to_string(&compacted)?;
    fs::write(paths.datafile(), encoded)?;
    log::info!("event=datafile_saved companies={}", compacted.len());
    Ok(())
}

/// Renumbers each company's contacts, info and log densely from zero.
///
/// Company ids stay as they are; they are the user's stable handles.
fn compact_sub_collections(index: &CompanyIndex) -> CompanyIndex {
    let mut compacted = index.clone();
    for company in compacted.values_mut() {
        company.contacts = compact_ids(std::mem::take(&mut company.contacts), SUB_ID_WIDTH);
        company.info = compact_ids(std::mem::take(&mut company.info), SUB_ID_WIDTH);
        company.log = compact_ids(std::mem::take(&mut company.log), SUB_ID_WIDTH);
    }
    compacted
}

/// Copies the backup file over the datafile.
pub fn restore_backup(paths: &DataPaths) -> io::Result<()> {
    let content = fs::read_to_string(paths.backup())?;
    fs::write(paths.datafile(), content)?;
    log::info!("event=backup_restored");
    Ok(())
}

/// Copies the datafile into a dated archive, returning the archive path.
pub fn archive(paths: &DataPaths, day: NaiveDate) -> io::Result<PathBuf> {
    let content = fs::read_to_string(paths.datafile())?;
    let target = paths.archive_for(day);
    fs::write(&target, content)?;
    log::info!("event=archive_written path={}", target.display());
    Ok(target)
}

/// Copies the archive for `day` over the datafile.
pub fn restore_archive(paths: &DataPaths, day: NaiveDate) -> io::Result<()> {
    let content = fs::read_to_string(paths.archive_for(day))?;
    fs::write(paths.datafile(), content)?;
    log::info!("event=archive_restored day={day}");
    Ok(())
}

/// Removes the archive for `day`.
pub fn delete_archive(paths: &DataPaths, day: NaiveDate) -> io::Result<()> {
    fs::remove_file(paths.archive_for(day))?;
    log::info!("event=archive_deleted day={day}");
    Ok(())
}

/// Names every file in the data directory except the datafile and backup.
///
/// Directories (such as the log directory) never count. Results are sorted
/// for stable output.
pub fn list_archives(paths: &DataPaths) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(paths.root())? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == DATA_FILE_NAME || name == BACKUP_FILE_NAME {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use workboy_core::{Company, IdMap};

    fn paths_in(dir: &tempfile::TempDir) -> DataPaths {
        DataPaths::at(dir.path())
    }

    fn index_with_info_gap() -> CompanyIndex {
        let mut company = Company::new("Initech");
        company
            .info
            .insert("01".to_string(), "remote friendly".to_string());
        company
            .info
            .insert("04".to_string(), "asked for referral".to_string());
        let mut index = CompanyIndex::new();
        index.insert("0003".to_string(), company);
        index
    }

    #[test]
    fn missing_datafile_loads_as_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_index(&paths_in(&dir)).unwrap();
        assert!(loaded.index.is_empty());
        assert_eq!(loaded.raw, "");
    }

    #[test]
    fn blank_datafile_loads_as_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(&dir);
        fs::write(paths.datafile(), "  \n\t ").unwrap();
        let loaded = load_index(&paths).unwrap();
        assert!(loaded.index.is_empty());
        assert_eq!(loaded.raw, "");
    }

    #[test]
    fn corrupt_datafile_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(&dir);
        fs::write(paths.datafile(), "{not json").unwrap();
        match load_index(&paths) {
            Err(StoreError::Decode(_)) => {}
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn save_writes_backup_before_compacted_datafile() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(&dir);
        let index = index_with_info_gap();

        save_index(&paths, &index, "previous raw content").unwrap();

        assert_eq!(
            fs::read_to_string(paths.backup()).unwrap(),
            "previous raw content"
        );
        let reloaded = load_index(&paths).unwrap();
        // Company ids survive untouched; info ids got renumbered.
        let company = &reloaded.index["0003"];
        let info_ids: Vec<&str> = company.info.keys().map(String::as_str).collect();
        assert_eq!(info_ids, ["00", "01"]);
        assert_eq!(company.info["00"], "remote friendly");
        assert_eq!(company.info["01"], "asked for referral");
    }

    #[test]
    fn compaction_leaves_dense_collections_alone() {
        let mut company = Company::new("Globex");
        let mut info: IdMap<String> = IdMap::new();
        info.insert("00".to_string(), "a".to_string());
        info.insert("01".to_string(), "b".to_string());
        company.info = info;
        let mut index = CompanyIndex::new();
        index.insert("0000".to_string(), company);

        let compacted = compact_sub_collections(&index);
        assert_eq!(compacted, index);
    }

    #[test]
    fn archives_round_trip_and_listing_hides_working_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(&dir);
        let day = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();

        fs::write(paths.datafile(), "{}").unwrap();
        fs::write(paths.backup(), "").unwrap();
        fs::create_dir_all(paths.log_dir()).unwrap();

        let target = archive(&paths, day).unwrap();
        assert!(target.ends_with("workboy_archive2026-08-01"));

        let listed = list_archives(&paths).unwrap();
        assert_eq!(listed, ["workboy_archive2026-08-01"]);

        fs::write(paths.datafile(), "clobbered").unwrap();
        restore_archive(&paths, day).unwrap();
        assert_eq!(fs::read_to_string(paths.datafile()).unwrap(), "{}");

        delete_archive(&paths, day).unwrap();
        assert!(list_archives(&paths).unwrap().is_empty());
    }

    #[test]
    fn restore_backup_overwrites_datafile() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(&dir);
        fs::write(paths.backup(), "older state").unwrap();
        fs::write(paths.datafile(), "newer state").unwrap();

        restore_backup(&paths).unwrap();
        assert_eq!(fs::read_to_string(paths.datafile()).unwrap(), "older state");
    }

    #[test]
    fn restore_backup_without_backup_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = restore_backup(&paths_in(&dir)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}

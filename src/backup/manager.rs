//! Archive manager
//!
//! Creates, lists and prunes timestamped copies of the budget workbook.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::paths::BudgetPaths;
use crate::error::{BudgetError, BudgetResult};

/// Metadata about one archived workbook
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveInfo {
    pub filename: String,
    pub path: PathBuf,
    /// Stem of the workbook the archive was taken from
    pub workbook: String,
    pub created_at: NaiveDateTime,
    /// Disambiguates archives taken within the same second
    pub sequence: u32,
    pub size_bytes: u64,
}

/// Manages workbook archives and their retention
pub struct BackupManager {
    archive_dir: PathBuf,
    /// Archives to keep; 0 keeps all
    retention: usize,
}

impl BackupManager {
    pub fn new(paths: &BudgetPaths, retention: usize) -> Self {
        Self {
            archive_dir: paths.archive_dir(),
            retention,
        }
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// Copy `workbook` into the archive directory.
    ///
    /// Returns the path of the archive.
    pub fn create_backup(&self, workbook: &Path) -> BudgetResult<PathBuf> {
        if !workbook.exists() {
            return Err(BudgetError::file_not_found(workbook.display().to_string()));
        }
        fs::create_dir_all(&self.archive_dir).map_err(|e| {
            BudgetError::Backup(format!("Failed to create archive directory: {}", e))
        })?;

        let stem = workbook
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workbook".to_string());
        let stamp = Local::now().format("%-m_%-d_%Y_%H%M%S").to_string();

        let mut path = self.archive_dir.join(format!("{}_{}.json", stem, stamp));
        let mut sequence = 0;
        while path.exists() {
            sequence += 1;
            path = self
                .archive_dir
                .join(format!("{}_{}_{}.json", stem, stamp, sequence));
        }

        fs::copy(workbook, &path)
            .map_err(|e| BudgetError::Backup(format!("Failed to archive workbook: {}", e)))?;
        info!(archive = %path.display(), "Archived workbook");
        Ok(path)
    }

    /// All archives, newest first
    pub fn list_backups(&self) -> BudgetResult<Vec<ArchiveInfo>> {
        if !self.archive_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.archive_dir)
            .map_err(|e| BudgetError::Backup(format!("Failed to read archive directory: {}", e)))?;

        let mut archives = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| BudgetError::Backup(format!("Failed to read directory entry: {}", e)))?
                .path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(info) = parse_archive_info(&path) {
                    archives.push(info);
                }
            }
        }

        archives.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.sequence.cmp(&a.sequence))
        });
        Ok(archives)
    }

    /// Delete archives beyond the retention count, returning their paths
    pub fn enforce_retention(&self) -> BudgetResult<Vec<PathBuf>> {
        if self.retention == 0 {
            return Ok(Vec::new());
        }

        let mut deleted = Vec::new();
        for archive in self.list_backups()?.into_iter().skip(self.retention) {
            fs::remove_file(&archive.path)
                .map_err(|e| BudgetError::Backup(format!("Failed to delete old archive: {}", e)))?;
            debug!(archive = %archive.path.display(), "Pruned archive");
            deleted.push(archive.path);
        }
        Ok(deleted)
    }

    /// Archive `workbook`, then prune
    pub fn create_backup_with_retention(
        &self,
        workbook: &Path,
    ) -> BudgetResult<(PathBuf, Vec<PathBuf>)> {
        let archive = self.create_backup(workbook)?;
        let deleted = self.enforce_retention()?;
        Ok((archive, deleted))
    }

    pub fn get_latest_backup(&self) -> BudgetResult<Option<ArchiveInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

/// Parse `<stem>_<m>_<d>_<yyyy>_<HHMMSS>[_<n>].json`
fn parse_archive_info(path: &Path) -> Option<ArchiveInfo> {
    let filename = path.file_name()?.to_string_lossy().into_owned();
    let base = filename.strip_suffix(".json")?;
    let parts: Vec<&str> = base.split('_').collect();

    let (parts, sequence) = match parse_stamp(&parts) {
        Some(stamp) => (stamp, 0),
        None => {
            let (last, rest) = parts.split_last()?;
            (parse_stamp(rest)?, last.parse().ok()?)
        }
    };
    let (workbook, created_at) = parts;

    Some(ArchiveInfo {
        size_bytes: fs::metadata(path).ok()?.len(),
        filename,
        path: path.to_path_buf(),
        workbook,
        created_at,
        sequence,
    })
}

/// Split trailing `m, d, yyyy, HHMMSS` parts off a name
fn parse_stamp(parts: &[&str]) -> Option<(String, NaiveDateTime)> {
    if parts.len() < 5 {
        return None;
    }
    let (stem, stamp) = parts.split_at(parts.len() - 4);
    let [month, day, year, time] = stamp else {
        return None;
    };
    if time.len() != 6 {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?;
    let time = NaiveTime::parse_from_str(time, "%H%M%S").ok()?;
    Some((stem.join("_"), date.and_time(time)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager(retention: usize) -> (BackupManager, PathBuf, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let workbook = paths.budget_file(2025);
        fs::write(&workbook, r#"{"sheets":[]}"#).unwrap();

        (BackupManager::new(&paths, retention), workbook, temp_dir)
    }

    #[test]
    fn test_create_backup() {
        let (manager, workbook, _temp) = create_test_manager(0);

        let archive = manager.create_backup(&workbook).unwrap();
        assert!(archive.exists());
        assert!(archive.starts_with(manager.archive_dir()));
        assert_eq!(fs::read(&archive).unwrap(), fs::read(&workbook).unwrap());

        let info = parse_archive_info(&archive).unwrap();
        assert_eq!(info.workbook, "Budget_2025");
    }

    #[test]
    fn test_missing_workbook() {
        let (manager, _workbook, temp) = create_test_manager(0);
        let err = manager
            .create_backup(&temp.path().join("nope.json"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_backups_newest_first() {
        let (manager, workbook, _temp) = create_test_manager(0);

        manager.create_backup(&workbook).unwrap();
        manager.create_backup(&workbook).unwrap();
        let newest = manager.create_backup(&workbook).unwrap();

        let archives = manager.list_backups().unwrap();
        assert_eq!(archives.len(), 3);
        assert_eq!(archives[0].path, newest);
        assert_eq!(manager.get_latest_backup().unwrap().unwrap().path, newest);
    }

    #[test]
    fn test_retention() {
        let (manager, workbook, _temp) = create_test_manager(2);
        for _ in 0..4 {
            manager.create_backup(&workbook).unwrap();
        }

        let deleted = manager.enforce_retention().unwrap();
        assert_eq!(deleted.len(), 2);
        assert_eq!(manager.list_backups().unwrap().len(), 2);
    }

    #[test]
    fn test_zero_retention_keeps_everything() {
        let (manager, workbook, _temp) = create_test_manager(0);
        for _ in 0..3 {
            manager.create_backup(&workbook).unwrap();
        }
        let (_, deleted) = manager.create_backup_with_retention(&workbook).unwrap();
        assert!(deleted.is_empty());
        assert_eq!(manager.list_backups().unwrap().len(), 4);
    }

    #[test]
    fn test_parse_archive_names() {
        let temp_dir = TempDir::new().unwrap();
        let plain = temp_dir.path().join("Budget_2025_3_7_2025_091500.json");
        let repeat = temp_dir.path().join("Budget_2025_3_7_2025_091500_2.json");
        let other = temp_dir.path().join("notes.json");
        for path in [&plain, &repeat, &other] {
            fs::write(path, "{}").unwrap();
        }

        let info = parse_archive_info(&plain).unwrap();
        assert_eq!(info.workbook, "Budget_2025");
        assert_eq!(info.sequence, 0);
        assert_eq!(
            info.created_at,
            NaiveDate::from_ymd_opt(2025, 3, 7)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap()
        );
        assert_eq!(parse_archive_info(&repeat).unwrap().sequence, 2);
        assert!(parse_archive_info(&other).is_none());
    }
}

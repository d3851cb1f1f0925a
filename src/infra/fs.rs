//! # File System Operations Module / 文件系统操作模块
//!
//! The failure-records directory: one file per failed target, named after the
//! target and holding its captured build output.
//!
//! 失败记录目录：每个失败目标一个文件，以目标命名并保存其捕获的构建输出。

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::models::{MatrixReport, Target};
use crate::infra::t;

/// Handle to a failure-records directory that has been reset for this run.
#[derive(Debug, Clone)]
pub struct FailureRecords {
    dir: PathBuf,
}

impl FailureRecords {
    /// Deletes `dir` if it exists and recreates it empty.
    ///
    /// This is a destructive reset, never a merge: records from a previous run
    /// must not survive into this one.
    pub fn reset(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                t!("fs.create_dir_failed", path = parent.display()).to_string()
            })?;
        }

        fs_extra::dir::create(&dir, true)
            .with_context(|| t!("fs.reset_failed", path = dir.display()).to_string())?;

        tracing::debug!(dir = %dir.display(), "failure records directory reset");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, target: &Target) -> PathBuf {
        self.dir.join(target.as_str())
    }

    /// Writes one failure record, replacing any earlier record for the target.
    pub fn write(&self, target: &Target, output: &str) -> Result<PathBuf> {
        let path = self.record_path(target);
        fs::write(&path, output)
            .with_context(|| t!("fs.write_record_failed", path = path.display()).to_string())?;
        Ok(path)
    }

    /// Writes a record for every failed target of the report and removes any
    /// record left for a target that built.
    pub fn materialize(&self, report: &MatrixReport) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for result in report.results() {
            if result.outcome.is_failure() {
                written.push(self.write(&result.target, result.outcome.output())?);
            } else {
                let path = self.record_path(&result.target);
                if path.exists() {
                    fs::remove_file(&path).with_context(|| {
                        t!("fs.remove_record_failed", path = path.display()).to_string()
                    })?;
                }
            }
        }
        Ok(written)
    }

    /// Names of the records currently in the directory, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = fs::read_dir(&self.dir)
            .with_context(|| t!("fs.list_failed", path = self.dir.display()).to_string())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        names.sort();
        Ok(names)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.list()?.is_empty())
    }
}

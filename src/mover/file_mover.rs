use crate::error::{Result, TaskError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What to do when a file with the same name already sits in the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the existing file.
    #[default]
    Overwrite,
    /// Leave the source file where it is.
    Skip,
    /// Stop the batch with an error.
    Fail,
}

/// Files selected for one move invocation.
#[derive(Debug, Clone)]
pub struct MoveBatch {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub files: Vec<PathBuf>,
}

impl MoveBatch {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveReport {
    pub extension: String,
    pub moved: usize,
    pub skipped: Vec<String>,
    pub destination: PathBuf,
}

impl MoveReport {
    /// Upper-cased extension without the dot, as shown to users ("JPG").
    pub fn extension_label(&self) -> String {
        self.extension.to_uppercase()
    }
}

#[derive(Debug, Clone)]
pub struct MoveProgress {
    pub files_moved: usize,
    pub total_files: usize,
    pub current_file: Option<String>,
}

impl MoveProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_moved: 0,
            total_files,
            current_file: None,
        }
    }

    pub fn update_file(&mut self, filename: String) {
        self.files_moved += 1;
        self.current_file = Some(filename);
    }
}

pub struct FileMover {
    extension: String,
    on_collision: CollisionPolicy,
}

impl FileMover {
    pub fn new() -> Self {
        Self {
            extension: "jpg".to_string(),
            on_collision: CollisionPolicy::Overwrite,
        }
    }

    /// Accepts `".jpg"`, `"jpg"` or `"JPG"` alike.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = normalize_extension(extension);
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.on_collision = policy;
        self
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.to_lowercase() == self.extension)
    }

    /// Enumerates the files to move without touching the filesystem.
    pub fn plan(&self, source: &Path, destination: &Path) -> Result<MoveBatch> {
        if !source.is_dir() {
            return Err(TaskError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(source).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                e.into_io_error()
                    .map(TaskError::Io)
                    .unwrap_or_else(|| TaskError::SourceNotFound {
                        path: source.to_path_buf(),
                    })
            })?;

            if entry.path().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(MoveBatch {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            files,
        })
    }

    pub fn move_by_extension(
        &self,
        source: &Path,
        destination: &Path,
        progress_callback: Option<&dyn Fn(&MoveProgress)>,
    ) -> Result<MoveReport> {
        let batch = self.plan(source, destination)?;

        fs::create_dir_all(destination)?;

        tracing::info!(
            source = %source.display(),
            destination = %destination.display(),
            files = batch.len(),
            "moving .{} files",
            self.extension
        );

        let mut progress = MoveProgress::new(batch.len());
        let mut report = MoveReport {
            extension: self.extension.clone(),
            moved: 0,
            skipped: Vec::new(),
            destination: destination.to_path_buf(),
        };

        for file in &batch.files {
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            // Walked entries always carry a final component.
            let Some(name) = file.file_name() else {
                continue;
            };
            let target = destination.join(name);
            let display_name = name.to_string_lossy().to_string();

            if target.exists() {
                match self.on_collision {
                    CollisionPolicy::Overwrite => {
                        tracing::debug!(file = %display_name, "overwriting existing file");
                    }
                    CollisionPolicy::Skip => {
                        tracing::debug!(file = %display_name, "skipping existing file");
                        report.skipped.push(display_name);
                        continue;
                    }
                    CollisionPolicy::Fail => {
                        return Err(TaskError::DestinationExists { path: target });
                    }
                }
            }

            move_file(file, &target)?;
            report.moved += 1;
            progress.update_file(display_name);
        }

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        Ok(report)
    }
}

impl Default for FileMover {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

/// Renames `source` to `target`, falling back to copy and delete when a
/// rename is not possible (different filesystems).
fn move_file(source: &Path, target: &Path) -> Result<()> {
    if let Err(rename_error) = fs::rename(source, target) {
        tracing::debug!(
            file = %source.display(),
            error = %rename_error,
            "rename failed, copying instead"
        );

        fs::copy(source, target)?;

        if let Ok(modified_time) = fs::metadata(source).and_then(|m| m.modified()) {
            let _ = filetime::set_file_mtime(target, filetime::FileTime::from_system_time(modified_time));
        }

        fs::remove_file(source)?;
    }

    Ok(())
}

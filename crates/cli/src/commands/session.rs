//! Shared setup for commands that answer questions.

use docqa_core::{config::AppConfig, AppError, AppResult};
use docqa_knowledge::{DocumentQa, IndexBuild, SourceFile};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Read every regular file under `paths`; directories are walked.
///
/// Each file is named by its path as reached from the command line, so
/// same-named files in different directories stay distinct sources.
/// Support is decided by the loader, so nothing is filtered here.
pub fn collect_files(paths: &[PathBuf]) -> AppResult<Vec<SourceFile>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(read_source(path)?);
        } else if path.is_dir() {
            let mut entries: Vec<PathBuf> = WalkDir::new(path)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .collect();
            entries.sort();

            for entry in entries {
                files.push(read_source(&entry)?);
            }
        } else {
            return Err(AppError::Config(format!(
                "Path does not exist: {}",
                path.display()
            )));
        }
    }

    tracing::debug!("Collected {} files", files.len());
    Ok(files)
}

fn read_source(path: &Path) -> AppResult<SourceFile> {
    let mut file = SourceFile::from_path(path)?;
    file.name = source_name(path);
    Ok(file)
}

/// `/`-separated display form of `path`, without a leading `./`.
fn source_name(path: &Path) -> String {
    let mut name = String::new();
    for component in path.components() {
        match component {
            Component::CurDir => continue,
            Component::RootDir => {
                name.push('/');
                continue;
            }
            _ => {}
        }
        if !name.is_empty() && !name.ends_with('/') {
            name.push('/');
        }
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}

/// Configure docqa and build an index over `paths`.
///
/// Loader warnings are printed to stderr so stdout carries only answers.
pub async fn open(config: &AppConfig, paths: &[PathBuf]) -> AppResult<(DocumentQa, IndexBuild)> {
    let qa = DocumentQa::from_config(config)?;
    let files = collect_files(paths)?;
    let build = qa.build_index(&files).await?;

    for warning in &build.warnings {
        eprintln!("warning: skipped {}", warning);
    }

    Ok((qa, build))
}

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const ALWAYS_SKIPPED_DIRS: [&str; 3] = ["vendor", "Godeps", "testdata"];
const GENERATED_SUFFIXES: [&str; 2] = [".pb.go", ".pb.gw.go"];
const GENERATED_HEADER_LINES: usize = 20;

/// Which files under a working copy count as source for linting.
#[derive(Debug, Clone)]
pub struct SkipPolicy {
    pub extension: String,
    pub skip_dirs: Vec<String>,
}

impl SkipPolicy {
    pub fn new(extension: impl Into<String>, skip_dirs: Vec<String>) -> Self {
        Self {
            extension: extension.into().trim_start_matches('.').to_string(),
            skip_dirs,
        }
    }

    fn skips_dir(&self, root: &Path, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') || ALWAYS_SKIPPED_DIRS.contains(&name.as_ref()) {
            return true;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        self.skip_dirs.iter().any(|skip| {
            let skip = skip.trim_matches('/');
            name == skip || relative == Path::new(skip)
        })
    }

    fn accepts_file(&self, path: &Path) -> bool {
        let matches_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension);
        if !matches_extension {
            return false;
        }
        let name = path
            .file_name()
            .and_then(|file| file.to_str())
            .unwrap_or_default();
        !GENERATED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) && !is_generated(path)
    }
}

/// Eligible source files under `root`, sorted, as paths relative to `root`.
pub fn list_source_files(root: &Path, policy: &SkipPolicy) -> Vec<PathBuf> {
    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !(entry.file_type().is_dir() && policy.skips_dir(root, entry)))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| policy.accepts_file(entry.path()))
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .ok()
                .map(Path::to_path_buf)
        })
        .collect::<Vec<_>>();
    files.sort();
    files
}

/// True when `dir` is missing or holds no entries at all.
pub fn is_missing_or_empty(dir: &Path) -> bool {
    match std::fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => !dir.exists(),
    }
}

fn is_generated(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    BufReader::new(file)
        .lines()
        .take(GENERATED_HEADER_LINES)
        .map_while(|line| line.ok())
        .any(|line| line.contains("Code generated") && line.contains("DO NOT EDIT"))
}

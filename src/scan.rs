//! Recursive discovery of APK files under a directory.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Find every regular file under `dir` whose base name ends in `.apk`.
///
/// The match is case-sensitive (`Foo.APK` is skipped). Results come back
/// in traversal order; unreadable subtrees are reported on stderr and
/// skipped rather than aborting the walk.
pub fn find_apk_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                eprintln!("apkinfo: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(".apk"))
        })
        .map(|entry| entry.into_path())
        .collect()
}

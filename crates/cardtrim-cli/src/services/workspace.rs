// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Card directory layout: listing images, backup copies, and derived output
// paths.

use std::path::{Path, PathBuf};

use cardtrim_core::error::{CardtrimError, Result};
use tracing::debug;

/// Backups taken before dark borders are repaired.
pub const DARK_BACKUP_DIR: &str = "backup_black_edges";
/// Backups taken before light borders are repaired.
pub const LIGHT_BACKUP_DIR: &str = "backup_white_edges";
/// Output of batch crop-and-resize.
pub const CROPPED_DIR: &str = "cropped_resized";

/// PNG files directly inside `dir`, sorted by name. Subdirectories (such as
/// backups) are not descended into.
pub fn list_pngs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CardtrimError::NotFound(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_png(&path) {
            files.push(path);
        }
    }
    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "Listed images");
    Ok(files)
}

/// PNG files in `dir` whose file name contains `needle`. A missing directory
/// yields no files.
pub fn list_pngs_containing(dir: &Path, needle: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    Ok(list_pngs(dir)?
        .into_iter()
        .filter(|path| file_name(path).contains(needle))
        .collect())
}

pub fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// File name as a lossy string, or an empty string for paths without one.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Create `dir` (and parents) if needed and return it.
pub fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    Ok(dir.to_path_buf())
}

/// Copy `path` into `backup_dir` under the same file name.
///
/// When `overwrite` is false an existing backup is kept, so the first
/// (original) copy survives repeated runs. Returns the backup path.
pub fn backup(path: &Path, backup_dir: &Path, overwrite: bool) -> Result<PathBuf> {
    ensure_dir(backup_dir)?;
    let target = backup_dir.join(file_name(path));
    if overwrite || !target.exists() {
        std::fs::copy(path, &target)?;
        debug!(from = %path.display(), to = %target.display(), "Backup written");
    }
    Ok(target)
}

/// `path` with `suffix` inserted before the extension
/// (`cups_05.png` -> `cups_05_standard.png`).
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(name)
}

/// Output path for a chroma-key source: `_chroma` becomes `_transparent`
/// and the file lands in `images_dir`.
pub fn transparent_output(source: &Path, images_dir: &Path) -> PathBuf {
    let name = file_name(source).replacen("_chroma", "_transparent", 1);
    images_dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::write(path, b"x").expect("touch");
    }

    #[test]
    fn lists_only_top_level_pngs_sorted() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("wands_02.png"));
        touch(&dir.path().join("cups_05.PNG"));
        touch(&dir.path().join("notes.txt"));
        std::fs::create_dir(dir.path().join(DARK_BACKUP_DIR)).expect("mkdir");
        touch(&dir.path().join(DARK_BACKUP_DIR).join("cups_06.png"));

        let names: Vec<_> = list_pngs(dir.path())
            .expect("list")
            .iter()
            .map(|p| file_name(p))
            .collect();
        assert_eq!(names, ["cups_05.PNG", "wands_02.png"]);
    }

    #[test]
    fn missing_dir_is_not_found() {
        let err = list_pngs(Path::new("/nonexistent/images")).unwrap_err();
        assert!(matches!(err, CardtrimError::NotFound(_)));
        assert!(list_pngs_containing(Path::new("/nonexistent"), "_chroma")
            .expect("empty")
            .is_empty());
    }

    #[test]
    fn backup_keeps_first_copy_unless_overwriting() {
        let dir = tempfile::tempdir().expect("tempdir");
        let card = dir.path().join("20_judgement.png");
        let backups = dir.path().join(LIGHT_BACKUP_DIR);

        std::fs::write(&card, b"original").expect("write");
        let saved = backup(&card, &backups, false).expect("backup");
        assert_eq!(saved, backups.join("20_judgement.png"));

        std::fs::write(&card, b"edited").expect("write");
        backup(&card, &backups, false).expect("backup again");
        assert_eq!(std::fs::read(&saved).expect("read"), b"original");

        backup(&card, &backups, true).expect("overwrite");
        assert_eq!(std::fs::read(&saved).expect("read"), b"edited");
    }

    #[test]
    fn suffix_goes_before_extension() {
        assert_eq!(
            with_suffix(Path::new("images/cups_05.png"), "_standard"),
            PathBuf::from("images/cups_05_standard.png")
        );
    }

    #[test]
    fn chroma_output_moves_to_images_dir() {
        let out = transparent_output(
            Path::new("generated_images/ace_chroma_2025.png"),
            Path::new("images"),
        );
        assert_eq!(out, PathBuf::from("images/ace_transparent_2025.png"));
    }

    #[test]
    fn filters_by_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("a_chroma_1.png"));
        touch(&dir.path().join("b.png"));
        let found = list_pngs_containing(dir.path(), "_chroma").expect("list");
        assert_eq!(found.len(), 1);
    }
}

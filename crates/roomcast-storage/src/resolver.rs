//! Path resolution with storage-root sandboxing
//!
//! Media records store root-relative paths. This module turns those into
//! absolute filesystem paths while validating that nothing escapes the
//! configured storage root.

use std::path::{Path, PathBuf};

use roomcast_core::models::MediaType;

use crate::error::{StorageError, StorageResult};

/// Build the stored relative path for a new artifact,
/// e.g. `/uploads/videos/clip.mp4`.
pub fn upload_relative_path(file_type: MediaType, stored_file_name: &str) -> String {
    format!(
        "/uploads/{}/{}",
        file_type.storage_subfolder(),
        stored_file_name
    )
}

/// Build the stored relative path for a thumbnail derived from `stem`.
pub fn thumbnail_relative_path(stem: &str) -> String {
    format!("/uploads/thumbnails/{}-thumb.jpg", stem)
}

/// Resolves stored relative paths to absolute paths under the storage root.
#[derive(Clone, Debug)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Convert a stored relative path to an absolute path under the root.
    ///
    /// Stored paths are web-style and may carry a leading `/`, which is
    /// stripped before joining. Traversal sequences are rejected before
    /// joining; for paths that already exist (or whose ancestors do),
    /// canonicalization also catches symlink escapes.
    pub fn resolve(&self, relative: &str) -> StorageResult<PathBuf> {
        let relative = relative.trim().trim_start_matches('/');
        if relative.is_empty() {
            return Err(StorageError::EmptyPath);
        }

        if relative.contains("..") || Path::new(relative).is_absolute() {
            return Err(StorageError::PathOutsideStorageRoot(relative.to_string()));
        }

        let path = self.root.join(relative);

        let root_canonical = self.root.canonicalize().map_err(|e| {
            StorageError::Config(format!(
                "Failed to canonicalize storage root {}: {}",
                self.root.display(),
                e
            ))
        })?;

        // The target may not exist yet; check the nearest existing ancestor
        // instead.
        if let Ok(canonical) = nearest_existing(&path).canonicalize() {
            if canonical.strip_prefix(&root_canonical).is_err() {
                return Err(StorageError::PathOutsideStorageRoot(relative.to_string()));
            }
        }

        Ok(path)
    }
}

fn nearest_existing(path: &Path) -> &Path {
    let mut current = path;
    while !current.exists() {
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    current
}

/// Whether two paths point at the same file. Paths are canonicalized when
/// possible and compared case-insensitively, so a metadata-only edit that
/// re-derives the same filename in a different case never deletes the file
/// it just kept.
pub fn is_same_path(a: &Path, b: &Path) -> bool {
    let canon_a = a.canonicalize().unwrap_or_else(|_| a.to_path_buf());
    let canon_b = b.canonicalize().unwrap_or_else(|_| b.to_path_buf());
    canon_a
        .to_string_lossy()
        .eq_ignore_ascii_case(&canon_b.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_joins_under_root() {
        let dir = tempdir().unwrap();
        let resolver = PathResolver::new(dir.path());

        let path = resolver.resolve("uploads/videos/clip.mp4").unwrap();
        assert!(path.starts_with(dir.path()));
        assert!(path.ends_with("uploads/videos/clip.mp4"));
    }

    #[test]
    fn test_resolve_strips_leading_slash() {
        let dir = tempdir().unwrap();
        let resolver = PathResolver::new(dir.path());

        let path = resolver.resolve("/uploads/videos/clip.mp4").unwrap();
        assert!(path.starts_with(dir.path()));
        assert!(path.ends_with("uploads/videos/clip.mp4"));

        // An "absolute" stored path lands harmlessly inside the root.
        let passwd = resolver.resolve("/etc/passwd").unwrap();
        assert_eq!(passwd, dir.path().join("etc/passwd"));
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        let dir = tempdir().unwrap();
        let resolver = PathResolver::new(dir.path());

        let path = resolver.resolve("  uploads/a.txt  ").unwrap();
        assert!(path.ends_with("uploads/a.txt"));
    }

    #[test]
    fn test_empty_path_rejected() {
        let dir = tempdir().unwrap();
        let resolver = PathResolver::new(dir.path());

        assert!(matches!(resolver.resolve(""), Err(StorageError::EmptyPath)));
        assert!(matches!(
            resolver.resolve("   "),
            Err(StorageError::EmptyPath)
        ));
    }

    #[test]
    fn test_traversal_rejected() {
        let dir = tempdir().unwrap();
        let resolver = PathResolver::new(dir.path());

        assert!(matches!(
            resolver.resolve("../../../etc/passwd"),
            Err(StorageError::PathOutsideStorageRoot(_))
        ));
        assert!(matches!(
            resolver.resolve("uploads/../../escape.txt"),
            Err(StorageError::PathOutsideStorageRoot(_))
        ));
    }

    #[test]
    fn test_relative_path_builders() {
        assert_eq!(
            upload_relative_path(MediaType::Video, "clip-abc.mp4"),
            "/uploads/videos/clip-abc.mp4"
        );
        assert_eq!(
            upload_relative_path(MediaType::Document, "notes-abc.txt"),
            "/uploads/documents/notes-abc.txt"
        );
        assert_eq!(
            thumbnail_relative_path("clip-abc"),
            "/uploads/thumbnails/clip-abc-thumb.jpg"
        );
    }

    #[test]
    fn test_symlink_escape_rejected() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        let link = dir.path().join("sneaky");
        std::os::unix::fs::symlink(outside.path(), &link).unwrap();

        let resolver = PathResolver::new(dir.path());
        assert!(matches!(
            resolver.resolve("sneaky/file.txt"),
            Err(StorageError::PathOutsideStorageRoot(_))
        ));
    }

    #[test]
    fn test_is_same_path_ignores_case() {
        assert!(is_same_path(
            Path::new("/storage/uploads/Clip.MP4"),
            Path::new("/storage/uploads/clip.mp4")
        ));
        assert!(!is_same_path(
            Path::new("/storage/uploads/clip.mp4"),
            Path::new("/storage/uploads/other.mp4")
        ));
    }

    #[test]
    fn test_is_same_path_resolves_existing_files() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"x").unwrap();

        let via_dot = dir.path().join("./a.txt");
        assert!(is_same_path(&file, &via_dot));
    }
}

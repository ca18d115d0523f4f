//! Collision-resistant artifact filenames.

use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

fn non_alphanumeric_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap())
}

/// Build a filesystem-safe stored filename from a title and an extension.
///
/// The title is lowercased, runs of non-alphanumerics collapse to a single
/// hyphen, leading/trailing hyphens are trimmed, and an empty result falls
/// back to `file`. A random hex suffix makes the name collision-resistant
/// without checking existing files.
pub fn safe_file_name(title: &str, extension: &str) -> String {
    let lowered = title.to_lowercase();
    let slug = non_alphanumeric_runs().replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    let slug = if slug.is_empty() { "file" } else { slug };

    let mut extension = extension.trim().to_string();
    if !extension.is_empty() && !extension.starts_with('.') {
        extension = format!(".{}", extension);
    }

    format!("{}-{}{}", slug, Uuid::new_v4().simple(), extension)
}

/// Lowercase extension of a filename, including the leading dot.
/// Empty string when there is none.
pub fn file_extension(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Filename without its final extension.
pub fn file_stem(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_suffix_and_ext(name: &str) -> String {
        // slug-<32 hex>.ext
        let stem = file_stem(name);
        let (slug, _hex) = stem.rsplit_once('-').unwrap();
        slug.to_string()
    }

    #[test]
    fn test_safe_file_name_slug_charset() {
        let name = safe_file_name("My Vacation Video! (2024)", ".mp4");
        let slug = strip_suffix_and_ext(&name);
        assert_eq!(slug, "my-vacation-video-2024");
        assert!(name.ends_with(".mp4"));
        assert!(slug.chars().all(|c| c.is_ascii_lowercase()
            || c.is_ascii_digit()
            || c == '-'));
    }

    #[test]
    fn test_safe_file_name_empty_title_falls_back() {
        let name = safe_file_name("", ".txt");
        assert!(name.starts_with("file-"));
        assert!(name.ends_with(".txt"));
    }

    #[test]
    fn test_safe_file_name_symbols_only_falls_back() {
        let name = safe_file_name("!!! ???", ".png");
        assert!(name.starts_with("file-"));
    }

    #[test]
    fn test_safe_file_name_trims_hyphens() {
        let name = safe_file_name("--hello--", ".md");
        let slug = strip_suffix_and_ext(&name);
        assert_eq!(slug, "hello");
    }

    #[test]
    fn test_safe_file_name_adds_dot_to_extension() {
        let name = safe_file_name("notes", "txt");
        assert!(name.ends_with(".txt"));
    }

    #[test]
    fn test_safe_file_name_unique_per_call() {
        let a = safe_file_name("same title", ".jpg");
        let b = safe_file_name("same title", ".jpg");
        assert_ne!(a, b);
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("movie.MP4"), ".mp4");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("no_extension"), "");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("movie.mp4"), "movie");
        assert_eq!(file_stem("no_extension"), "no_extension");
    }
}

//! Utility functions for identifiers, string manipulation, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Region slugs and URL digests for stable finding identifiers
//! - String truncation and slugification for logging and Markdown anchors
//! - File system validation for the store's directory

use sha2::{Digest, Sha256};
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Number of hex characters of the URL digest kept in identifiers.
const DIGEST_LEN: usize = 16;

/// Lowercase a region name and replace spaces with underscores.
///
/// ```ignore
/// assert_eq!(region_slug("New Hampshire"), "new_hampshire");
/// ```
pub fn region_slug(region: &str) -> String {
    region.trim().to_lowercase().replace(' ', "_")
}

/// Fixed-width SHA-256 digest of a resolved URL, as lowercase hex.
pub fn url_digest(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    hex[..DIGEST_LEN].to_string()
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at a character boundary no later than `max` bytes,
/// with an ellipsis and byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Convert a title to a URL-friendly slug for Markdown anchors.
///
/// ```ignore
/// assert_eq!(slugify_title("Hello World"), "hello-world");
/// ```
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Capitalize the first character of a string.
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Ensure the directory holding `file_path` exists and is writable.
///
/// Creates the directory if needed, then creates and removes a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable.
#[instrument(level = "info", skip_all, fields(path = %file_path.display()))]
pub async fn ensure_writable_parent(file_path: &Path) -> Result<(), Box<dyn Error>> {
    let dir = match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&dir).await?;

    // Probe with a small sync write.
    let probe_path = dir.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!(dir = %dir.display(), "Store directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_slug() {
        assert_eq!(region_slug("New Hampshire"), "new_hampshire");
        assert_eq!(region_slug("NASPO"), "naspo");
        assert_eq!(region_slug(" Ohio "), "ohio");
    }

    #[test]
    fn test_url_digest_is_fixed_width_hex() {
        let digest = url_digest("https://procure.ohio.gov");
        assert_eq!(digest.len(), DIGEST_LEN);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, url_digest("https://procure.ohio.gov"));
        assert_ne!(digest, url_digest("https://procure.ohio.gov/"));
    }

    #[test]
    fn test_url_digest_known_value() {
        // sha256("abc") = ba7816bf8f01cfea...
        assert_eq!(url_digest("abc"), "ba7816bf8f01cfea");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Health \n\t Plan  "), "Health Plan");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundary() {
        let s = "é".repeat(10);
        let result = truncate_for_log(&s, 3);
        assert!(result.starts_with('é'));
        assert!(result.contains("(+18 bytes)"));
    }

    #[test]
    fn test_slugify_title() {
        assert_eq!(slugify_title("Hello World"), "hello-world");
        assert_eq!(slugify_title("New York"), "new-york");
        assert_eq!(slugify_title("Wyoming A&I"), "wyoming-ai");
    }

    #[test]
    fn test_upcase() {
        assert_eq!(upcase("texas"), "Texas");
        assert_eq!(upcase(""), "");
    }

    #[tokio::test]
    async fn test_ensure_writable_parent_creates_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("nested").join("findings.json");
        ensure_writable_parent(&file).await.unwrap();
        assert!(tmp.path().join("nested").is_dir());
    }
}

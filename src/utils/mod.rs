//! Cross-cutting helpers: content fingerprinting and asset file copying.

use std::path::Path;

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::core::Result;

/// Calculates a SHA-256 fingerprint over an ordered list of content parts.
///
/// Parts are separated by a NUL byte so that `["ab", "c"]` and `["a", "bc"]`
/// hash differently. The fingerprint is returned as lowercase hex and is used
/// as the cache key for resolved fragments and assembled output: any change to
/// a part produces a different key and therefore a cache miss.
pub fn content_fingerprint<S: AsRef<str>>(parts: &[S]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_ref().as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

/// Copies every regular file under `src` into `dest`, flattening the tree.
///
/// Nested directories in `src` are walked but their structure is not
/// preserved: each file lands directly in `dest` under its own file name,
/// which is the `<package>/<file>` shape that rewritten stylesheet URLs
/// reference. Returns the number of files copied.
pub fn copy_dir_flat(src: &Path, dest: &Path) -> Result<usize> {
    std::fs::create_dir_all(dest)?;

    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.map_err(|e| {
            std::io::Error::other(format!("failed to walk {}: {e}", src.display()))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let target = dest.join(entry.file_name());
        std::fs::copy(entry.path(), &target)?;
        copied += 1;
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable_and_content_sensitive() {
        let a = content_fingerprint(&["drums", ".drums { }"]);
        let b = content_fingerprint(&["drums", ".drums { }"]);
        let c = content_fingerprint(&["drums", ".drums { color: red }"]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_respects_part_boundaries() {
        let joined = content_fingerprint(&["abc"]);
        let split = content_fingerprint(&["ab", "c"]);
        assert_ne!(joined, split);
    }

    #[test]
    fn test_copy_dir_flat_flattens_nested_files() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("a.png"), b"a").unwrap();
        std::fs::create_dir(src.path().join("nested")).unwrap();
        std::fs::write(src.path().join("nested").join("b.png"), b"b").unwrap();

        let copied = copy_dir_flat(src.path(), dest.path()).unwrap();
        assert_eq!(copied, 2);
        assert!(dest.path().join("a.png").is_file());
        assert!(dest.path().join("b.png").is_file());
    }
}

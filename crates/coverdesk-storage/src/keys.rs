//! Object keys for submitted covers.
//!
//! `manga/submissions/<sha256(title) hex>/<unix millis>-<8 hex>.<ext>`

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

const KEY_PREFIX: &str = "manga/submissions";

/// Derive a fresh key for a cover of the given volume title.
///
/// The title only contributes a digest, so arbitrary user text never reaches
/// the object path. The random suffix keeps two uploads in the same
/// millisecond apart.
pub fn submission_cover_key(volume_title: &str, extension: &str, now: DateTime<Utc>) -> String {
    let title_hash = hex::encode(Sha256::digest(volume_title.as_bytes()));
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}/{}/{}-{}.{}",
        KEY_PREFIX,
        title_hash,
        now.timestamp_millis(),
        &suffix[..8],
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_key_layout() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let key = submission_cover_key("Vol 1", "jpg", now);

        let parts: Vec<&str> = key.split('/').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "manga");
        assert_eq!(parts[1], "submissions");
        assert_eq!(parts[2].len(), 64);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));

        let file = parts[3];
        assert!(file.starts_with("1700000000123-"));
        assert!(file.ends_with(".jpg"));
        assert_eq!(file.len(), "1700000000123-".len() + 8 + ".jpg".len());
    }

    #[test]
    fn test_title_never_appears_in_key() {
        let now = Utc::now();
        let key = submission_cover_key("../../etc/passwd", "png", now);
        assert!(!key.contains(".."));
        assert!(!key.contains("etc"));
    }

    #[test]
    fn test_same_title_same_prefix_distinct_keys() {
        let now = Utc::now();
        let a = submission_cover_key("Vol 1", "png", now);
        let b = submission_cover_key("Vol 1", "png", now);
        assert_ne!(a, b);
        assert_eq!(a.rsplit_once('/').unwrap().0, b.rsplit_once('/').unwrap().0);
    }
}

//! Content digest used to detect unchanged values.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Serializes `value` to JSON and returns the lowercase hex SHA-256 of it.
pub fn content_hash<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let serialized = serde_json::to_string(value)?;
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hash_is_stable() {
        let a = content_hash(&json!({"user": "ada", "id": 7})).unwrap();
        let b = content_hash(&json!({"user": "ada", "id": 7})).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_hash_changes_with_content() {
        let a = content_hash(&json!("one")).unwrap();
        let b = content_hash(&json!("two")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_known_digest() {
        // sha256("\"abc\"")
        assert_eq!(
            content_hash("abc").unwrap(),
            "6cc43f858fbb763301637b5af970e2a46b46f461f27e5a0f41e009c59b827b25"
        );
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A server-stored uploaded file record.
///
/// `id` is server-assigned and unique; the server may rename `name` on
/// collision (e.g. appending a counter), so callers should match on the
/// base name, not equality. Fields beyond the known schema are kept in
/// `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserFile {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_file_deserializes_minimal_record() {
        let file: UserFile =
            serde_json::from_value(json!({"id": "f-1", "name": "test.txt"})).unwrap();
        assert_eq!(file.id, "f-1");
        assert_eq!(file.name, "test.txt");
        assert!(file.path.is_none());
        assert!(file.size.is_none());
    }

    #[test]
    fn test_user_file_deserializes_full_record() {
        let file: UserFile = serde_json::from_value(json!({
            "id": "f-2",
            "name": "test (1).txt",
            "path": "user/f-2/test.txt",
            "size": 59,
            "provider": null,
            "created_at": "2025-06-01T10:00:00Z",
            "updated_at": "2025-06-01T10:00:00Z",
            "user_id": "u-1"
        }))
        .unwrap();
        assert_eq!(file.size, Some(59));
        assert_eq!(file.extra["user_id"], "u-1");
    }

    #[test]
    fn test_user_file_serde_roundtrip() {
        let file: UserFile =
            serde_json::from_value(json!({"id": "f-3", "name": "a.bin", "size": 4})).unwrap();
        let json = serde_json::to_string(&file).unwrap();
        let back: UserFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "f-3");
        assert_eq!(back.size, Some(4));
    }
}

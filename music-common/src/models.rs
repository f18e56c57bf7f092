//! Entity records shared by the stores and the HTTP layer

use serde::{Deserialize, Serialize};

/// Song record
///
/// Missing JSON fields decode to their zero value, so a body without `id`
/// is accepted and the database assigns one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default, rename_all = "camelCase")]
pub struct Song {
    pub id: i64,
    pub name: String,
    pub duration: String,
    /// Referenced artist. Not checked against `Artists`.
    pub artist_id: i64,
}

/// Artist record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct Artist {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_json_uses_artist_id_camel_case() {
        let song = Song {
            id: 4,
            name: "Imagine".to_string(),
            duration: "3:03".to_string(),
            artist_id: 1,
        };

        let value = serde_json::to_value(&song).unwrap();
        assert_eq!(value["artistId"], 1);
        assert!(value.get("artist_id").is_none());
    }

    #[test]
    fn test_song_missing_fields_default() {
        let song: Song = serde_json::from_str(r#"{"name":"Imagine"}"#).unwrap();
        assert_eq!(song.id, 0);
        assert_eq!(song.name, "Imagine");
        assert_eq!(song.duration, "");
        assert_eq!(song.artist_id, 0);
    }

    #[test]
    fn test_artist_rejects_wrong_types() {
        let result = serde_json::from_str::<Artist>(r#"{"name": 12}"#);
        assert!(result.is_err());
    }
}

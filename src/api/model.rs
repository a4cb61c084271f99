//! API model types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata of the track being played
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackMeta {
    /// Opaque track identity used for change detection and offsets
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub duration_ms: u64,
}

impl TrackMeta {
    /// First listed artist, used for lookups
    pub fn primary_artist(&self) -> &str {
        self.artists.first().map(String::as_str).unwrap_or("")
    }

    /// All artists joined for display
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }
}

/// One answer from the playback source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub is_playing: bool,
    pub position_ms: u64,
    pub track: TrackMeta,
}

/// LRCLIB track record (`/api/get` and `/api/search`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LrcLibTrack {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub track_name: String,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub instrumental: bool,
    #[serde(default)]
    pub plain_lyrics: Option<String>,
    #[serde(default)]
    pub synced_lyrics: Option<String>,
}

/// MyMemory `/get` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyMemoryResponse {
    #[serde(default)]
    pub response_data: Option<MyMemoryData>,
    /// Sent as a number on success and sometimes as a string on errors
    #[serde(default)]
    pub response_status: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyMemoryData {
    #[serde(default)]
    pub translated_text: Option<String>,
}

impl MyMemoryResponse {
    pub fn is_ok(&self) -> bool {
        match &self.response_status {
            Value::Number(n) => n.as_u64() == Some(200),
            Value::String(s) => s == "200",
            _ => false,
        }
    }

    /// Translated text of a successful, non-empty response
    pub fn into_translation(self) -> Option<String> {
        if !self.is_ok() {
            return None;
        }
        self.response_data?
            .translated_text
            .filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_artists() {
        let track = TrackMeta {
            id: "1".into(),
            name: "Song".into(),
            artists: vec!["A".into(), "B".into()],
            duration_ms: 1000,
        };
        assert_eq!(track.primary_artist(), "A");
        assert_eq!(track.artist_line(), "A, B");
        assert_eq!(TrackMeta::default().primary_artist(), "");
    }

    #[test]
    fn test_lrclib_track_deserialize() {
        let json = r#"{"id":7,"trackName":"T","artistName":"A","albumName":null,
            "duration":181.0,"instrumental":false,"plainLyrics":"x","syncedLyrics":null}"#;
        let track: LrcLibTrack = serde_json::from_str(json).unwrap();
        assert_eq!(track.id, 7);
        assert_eq!(track.plain_lyrics.as_deref(), Some("x"));
        assert!(track.synced_lyrics.is_none());
    }

    #[test]
    fn test_mymemory_response() {
        let ok: MyMemoryResponse = serde_json::from_str(
            r#"{"responseData":{"translatedText":"Hello"},"responseStatus":200}"#,
        )
        .unwrap();
        assert_eq!(ok.into_translation().as_deref(), Some("Hello"));

        let quota: MyMemoryResponse = serde_json::from_str(
            r#"{"responseData":{"translatedText":"QUOTA EXCEEDED"},"responseStatus":"429"}"#,
        )
        .unwrap();
        assert_eq!(quota.into_translation(), None);

        let empty: MyMemoryResponse = serde_json::from_str(
            r#"{"responseData":{"translatedText":" "},"responseStatus":"200"}"#,
        )
        .unwrap();
        assert_eq!(empty.into_translation(), None);
    }
}

//! Stored splash metadata record.
//!
//! This is the JSON blob kept under the storage key. Field names follow the
//! camelCase wire format shared with the host platforms. Every field except
//! `status` is optional on the wire because `EMPTY` and `ERROR` records only
//! carry a status and an error message.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status of the stored record. Only `Ready` is presentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplashStatus {
    #[default]
    Empty,
    Ready,
    Error,
    /// Any status string this build does not know about (e.g. `DRAFT`).
    #[serde(other)]
    Unknown,
}

/// Easing curve for the scale-in animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScaleEasing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl ScaleEasing {
    /// Resolve a wire name. Unknown or empty names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linear" => Some(Self::Linear),
            "easeIn" => Some(Self::EaseIn),
            "easeOut" => Some(Self::EaseOut),
            "easeInOut" => Some(Self::EaseInOut),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "easeIn",
            Self::EaseOut => "easeOut",
            Self::EaseInOut => "easeInOut",
        }
    }
}

/// Reads a wrong-typed optional value as absent, so it takes its default
/// instead of failing the whole record.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<T> {
        Value(T),
        Other(IgnoredAny),
    }

    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Value(value) => Some(value),
        Lenient::Other(_) => None,
    })
}

/// The persisted metadata record.
///
/// Numeric fields are `f64` on the wire since the record is also written by
/// JavaScript hosts, where every number is a double. Only `status`,
/// `startAt`, `endAt` and `localPath` are typed strictly; any other field
/// holding the wrong JSON type reads as `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplashMetadata {
    pub status: SplashStatus,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Absolute path of the already-downloaded asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
    /// Epoch milliseconds.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    /// Epoch milliseconds of the last successful publish.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<i64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub config_version: Option<String>,

    // Presentation options
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub enable_fade: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub fade_duration_ms: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub scale_start: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub scale_end: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub scale_duration_ms: Option<f64>,
    /// Kept as a raw string so unknown curves fall back instead of failing the record.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub scale_easing: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub min_duration_ms: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub max_duration_ms: Option<f64>,
}

impl SplashMetadata {
    /// Record with only a status, as written when there is nothing to show.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Failure record carrying the error message.
    pub fn error(message: impl Into<String>, updated_at: i64) -> Self {
        Self {
            status: SplashStatus::Error,
            last_error: Some(message.into()),
            updated_at: Some(updated_at),
            ..Self::default()
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == SplashStatus::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ready_record() {
        let json = r##"{
            "status": "READY",
            "imageName": "spring",
            "startAt": "2025-03-01T00:00:00Z",
            "endAt": "2025-03-31T23:59:59Z",
            "localPath": "/data/splash/spring.png",
            "backgroundColor": "#112233",
            "enableFade": false,
            "fadeDurationMs": 350,
            "scaleEasing": "easeOut",
            "minDurationMs": 1000,
            "somethingNew": [1, 2, 3]
        }"##;

        let meta: SplashMetadata = serde_json::from_str(json).unwrap();
        assert!(meta.is_ready());
        assert_eq!(meta.local_path.as_deref(), Some("/data/splash/spring.png"));
        assert_eq!(meta.enable_fade, Some(false));
        assert_eq!(meta.fade_duration_ms, Some(350.0));
        assert_eq!(meta.min_duration_ms, Some(1000.0));
        assert_eq!(meta.max_duration_ms, None);
        assert_eq!(meta.scale_easing.as_deref(), Some("easeOut"));
    }

    #[test]
    fn test_wrong_typed_optional_fields_read_as_absent() {
        let json = r#"{
            "status": "READY",
            "startAt": "2025-03-01T00:00:00Z",
            "endAt": "2025-03-31T23:59:59Z",
            "localPath": "/data/splash/spring.png",
            "backgroundColor": 123,
            "enableFade": "false",
            "fadeDurationMs": "300",
            "scaleStart": null,
            "scaleEasing": 5,
            "minDurationMs": {"ms": 10},
            "updatedAt": "yesterday"
        }"#;

        let meta: SplashMetadata = serde_json::from_str(json).unwrap();
        assert!(meta.is_ready());
        assert_eq!(meta.background_color, None);
        assert_eq!(meta.enable_fade, None);
        assert_eq!(meta.fade_duration_ms, None);
        assert_eq!(meta.scale_start, None);
        assert_eq!(meta.scale_easing, None);
        assert_eq!(meta.min_duration_ms, None);
        assert_eq!(meta.updated_at, None);
    }

    #[test]
    fn test_wrong_typed_required_field_fails() {
        let json = r#"{"status":"READY","startAt":1,"endAt":"2025-03-31T23:59:59Z","localPath":"/a.png"}"#;
        assert!(serde_json::from_str::<SplashMetadata>(json).is_err());
    }

    #[test]
    fn test_unknown_status_is_not_ready() {
        let meta: SplashMetadata = serde_json::from_str(r#"{"status":"DRAFT"}"#).unwrap();
        assert_eq!(meta.status, SplashStatus::Unknown);
        assert!(!meta.is_ready());
    }

    #[test]
    fn test_missing_status_fails() {
        assert!(serde_json::from_str::<SplashMetadata>(r#"{"localPath":"/a.png"}"#).is_err());
    }

    #[test]
    fn test_error_record_serializes_compactly() {
        let meta = SplashMetadata::error("Invalid JSON schema", 1_700_000_000_000);
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(
            json,
            r#"{"status":"ERROR","updatedAt":1700000000000,"lastError":"Invalid JSON schema"}"#
        );
    }

    #[test]
    fn test_easing_names() {
        assert_eq!(ScaleEasing::from_name("easeIn"), Some(ScaleEasing::EaseIn));
        assert_eq!(ScaleEasing::from_name("bounce"), None);
        assert_eq!(ScaleEasing::from_name(""), None);
        assert_eq!(ScaleEasing::default().name(), "easeInOut");
    }
}

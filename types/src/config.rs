//! Splash config records as delivered by a config provider.

use serde::{Deserialize, Serialize};

/// One candidate splash. A provider hands over one or many of these; the
/// publisher validates them, picks one and writes a [`crate::SplashMetadata`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplashConfig {
    /// Asset identifier, also the cached file name.
    pub image_name: String,
    /// Accessibility description.
    #[serde(default)]
    pub alt: String,
    /// ISO-8601 start of the presentation window.
    pub start_at: String,
    /// ISO-8601 end of the presentation window.
    pub end_at: String,
    /// Remote asset location (http/https).
    pub image_url: String,
    /// Changing this invalidates a previously published asset.
    pub config_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Relative selection weight, defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl SplashConfig {
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_list() {
        let json = r##"[
            {
                "imageName": "summer",
                "alt": "Summer sale",
                "startAt": "2025-06-01T00:00:00Z",
                "endAt": "2025-06-30T00:00:00Z",
                "imageUrl": "https://cdn.example.com/summer.png",
                "configVersion": "3",
                "weight": 2.5
            },
            {
                "imageName": "winter",
                "startAt": "2025-12-01T00:00:00Z",
                "endAt": "2025-12-31T00:00:00Z",
                "imageUrl": "https://cdn.example.com/winter.png",
                "configVersion": "1",
                "backgroundColor": "#000000"
            }
        ]"##;

        let configs: Vec<SplashConfig> = serde_json::from_str(json).unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].effective_weight(), 2.5);
        assert_eq!(configs[1].effective_weight(), 1.0);
        assert_eq!(configs[1].alt, "");
        assert_eq!(configs[1].background_color.as_deref(), Some("#000000"));
    }
}

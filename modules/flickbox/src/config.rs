use serde::{Deserialize, Serialize};

/// Configuration for the flickbox module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlickboxConfig {
    /// Base URL of the PHP gateway; endpoint files are resolved against it.
    #[serde(default = "default_gateway_base_url")]
    pub gateway_base_url: String,
    #[serde(default = "default_metadata_base_url")]
    pub metadata_base_url: String,
    /// Metadata API key. Empty disables search and popular listings.
    #[serde(default)]
    pub metadata_api_key: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_placeholder_poster_url")]
    pub placeholder_poster_url: String,
    /// Page of popular films shown when the search modal opens.
    #[serde(default = "default_popular_page")]
    pub popular_page: u32,
}

impl Default for FlickboxConfig {
    fn default() -> Self {
        Self {
            gateway_base_url: default_gateway_base_url(),
            metadata_base_url: default_metadata_base_url(),
            metadata_api_key: String::new(),
            image_base_url: default_image_base_url(),
            placeholder_poster_url: default_placeholder_poster_url(),
            popular_page: default_popular_page(),
        }
    }
}

fn default_gateway_base_url() -> String {
    "https://flickbox.my.id/api".to_string()
}

fn default_metadata_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_placeholder_poster_url() -> String {
    "https://via.placeholder.com/300x450?text=No+Image".to_string()
}

fn default_popular_page() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_section_keeps_defaults() {
        let cfg: FlickboxConfig = serde_json::from_value(serde_json::json!({
            "metadata_api_key": "abc",
            "popular_page": 2
        }))
        .unwrap();
        assert_eq!(cfg.metadata_api_key, "abc");
        assert_eq!(cfg.popular_page, 2);
        assert_eq!(cfg.gateway_base_url, "https://flickbox.my.id/api");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res = serde_json::from_value::<FlickboxConfig>(serde_json::json!({ "api": "x" }));
        assert!(res.is_err());
    }
}

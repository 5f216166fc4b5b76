use std::time::Duration;

use crate::blend::DEFAULT_BLUR_SIGMA;

/// Environment variable consulted for the segmentation service API key.
pub const ENV_API_KEY: &str = "RETINT_API_KEY";
/// Environment variable consulted for the segmentation endpoint URL.
pub const ENV_SEGMENT_ENDPOINT: &str = "RETINT_SEGMENT_ENDPOINT";
/// Environment variable consulted for the object-storage upload URL.
pub const ENV_UPLOAD_ENDPOINT: &str = "RETINT_UPLOAD_ENDPOINT";

/// Options for the recolor blend stage.
#[derive(Debug, Clone)]
pub struct RecolorOptions {
    /// Gaussian sigma applied to the refined mask before blending. Zero
    /// disables the blur.
    pub blur_sigma: f32,
}

impl RecolorOptions {
    /// Override the refined-mask blur sigma.
    pub fn with_blur_sigma(mut self, sigma: f32) -> Self {
        self.blur_sigma = sigma;
        self
    }
}

impl Default for RecolorOptions {
    fn default() -> Self {
        Self {
            blur_sigma: DEFAULT_BLUR_SIGMA,
        }
    }
}

/// Connection settings for the segmentation service and its object-storage
/// upload endpoint.
#[derive(Debug, Clone)]
pub struct SegmentSettings {
    /// Segmentation endpoint accepting box prompts.
    pub endpoint: String,
    /// Object-storage endpoint accepting raw PNG bytes.
    pub upload_endpoint: String,
    /// API key sent as `Authorization: Key <key>` when present.
    pub api_key: Option<String>,
    /// Per-request timeout applied to every HTTP hop.
    pub timeout: Duration,
    /// Retry the segmentation call once on transport errors. HTTP status
    /// errors are never retried.
    pub retry_transient: bool,
}

impl SegmentSettings {
    /// Create settings for the given endpoints with default timeout and
    /// retry policy.
    pub fn new(endpoint: impl Into<String>, upload_endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            upload_endpoint: upload_endpoint.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
            retry_transient: true,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable the single transport-error retry.
    pub fn with_retry(mut self, retry_transient: bool) -> Self {
        self.retry_transient = retry_transient;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod unit {
        use super::*;

        #[test]
        fn recolor_options_default_blur_sigma() {
            let options = RecolorOptions::default();
            assert!((options.blur_sigma - 1.5).abs() < f32::EPSILON);
        }

        #[test]
        fn segment_settings_builders_override_fields() {
            let settings = SegmentSettings::new("https://seg.example/run", "https://seg.example/upload")
                .with_api_key("secret")
                .with_timeout(Duration::from_secs(5))
                .with_retry(false);

            assert_eq!(settings.endpoint, "https://seg.example/run");
            assert_eq!(settings.upload_endpoint, "https://seg.example/upload");
            assert_eq!(settings.api_key.as_deref(), Some("secret"));
            assert_eq!(settings.timeout, Duration::from_secs(5));
            assert!(!settings.retry_transient);
        }
    }
}

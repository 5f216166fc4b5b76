use serde::{Deserialize, Serialize};
use ureq::Agent;

use crate::bbox::BoundingBox;
use crate::config::SegmentSettings;
use crate::{RetintError, RetintResult};

/// A single axis-aligned box prompt in source-image pixel space, as the
/// segmentation service expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxPrompt {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
}

impl From<BoundingBox> for BoxPrompt {
    fn from(b: BoundingBox) -> Self {
        Self {
            x_min: b.min_x,
            y_min: b.min_y,
            x_max: b.max_x,
            y_max: b.max_y,
        }
    }
}

/// Request body posted to the segmentation service.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentRequest {
    pub image_url: String,
    pub box_prompts: Vec<BoxPrompt>,
}

/// Successful segmentation result: the refined mask location plus any
/// progress log lines the service emitted. The logs are diagnostics only and
/// can be ignored for correctness.
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentResponse {
    pub image: RefinedMask,
    #[serde(default)]
    pub logs: Vec<String>,
}

/// Location of the refined mask produced by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct RefinedMask {
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// The external collaborators the recolor pipeline talks to: object storage
/// for the original image, the segmentation service, and plain HTTP for the
/// refined mask. Implementations own transport and auth; the pipeline only
/// sees this contract.
pub trait SegmentProvider {
    /// Push PNG bytes to object storage and return a publicly fetchable URL.
    fn upload_image(&self, png: &[u8]) -> RetintResult<String>;

    /// Ask the service to refine a box prompt into a precise object mask.
    fn segment(&self, image_url: &str, prompt: BoxPrompt) -> RetintResult<SegmentResponse>;

    /// Download the refined mask bytes. Any non-2xx answer is a hard
    /// failure; this hop is never retried.
    fn fetch_mask(&self, url: &str) -> RetintResult<Vec<u8>>;
}

/// HTTP-backed [`SegmentProvider`] with a per-request timeout on every hop
/// and a single optional retry for transport failures of the segmentation
/// call.
pub struct HttpSegmentClient {
    settings: SegmentSettings,
    agent: Agent,
}

impl HttpSegmentClient {
    pub fn new(settings: SegmentSettings) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(settings.timeout))
            .build();
        Self {
            settings,
            agent: config.into(),
        }
    }

    pub fn settings(&self) -> &SegmentSettings {
        &self.settings
    }

    fn post_segment(&self, body: &SegmentRequest) -> Result<SegmentResponse, ureq::Error> {
        let mut request = self.agent.post(&self.settings.endpoint);
        if let Some(key) = &self.settings.api_key {
            request = request.header("Authorization", format!("Key {key}"));
        }
        let mut response = request.send_json(body)?;
        response.body_mut().read_json::<SegmentResponse>()
    }
}

impl SegmentProvider for HttpSegmentClient {
    fn upload_image(&self, png: &[u8]) -> RetintResult<String> {
        let mut request = self
            .agent
            .post(&self.settings.upload_endpoint)
            .header("Content-Type", "image/png");
        if let Some(key) = &self.settings.api_key {
            request = request.header("Authorization", format!("Key {key}"));
        }
        let mut response = request
            .send(png)
            .map_err(|error| match error {
                ureq::Error::StatusCode(status) => {
                    RetintError::Upload(format!("HTTP status {status}"))
                }
                other => RetintError::Upload(other.to_string()),
            })?;
        let parsed: UploadResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| RetintError::Upload(format!("malformed upload response: {e}")))?;
        Ok(parsed.url)
    }

    fn segment(&self, image_url: &str, prompt: BoxPrompt) -> RetintResult<SegmentResponse> {
        let body = SegmentRequest {
            image_url: image_url.to_string(),
            box_prompts: vec![prompt],
        };

        let result = match self.post_segment(&body) {
            Err(error) if self.settings.retry_transient && is_transient(&error) => {
                self.post_segment(&body)
            }
            first => first,
        };

        result.map_err(|error| match error {
            ureq::Error::StatusCode(status) => {
                RetintError::Segmentation(format!("service answered HTTP status {status}"))
            }
            other => RetintError::Segmentation(other.to_string()),
        })
    }

    fn fetch_mask(&self, url: &str) -> RetintResult<Vec<u8>> {
        let mut response = self.agent.get(url).call().map_err(|error| match error {
            ureq::Error::StatusCode(status) => RetintError::RemoteStatus {
                url: url.to_string(),
                status,
            },
            other => RetintError::RemoteFetch {
                url: url.to_string(),
                message: other.to_string(),
            },
        })?;
        response
            .body_mut()
            .read_to_vec()
            .map_err(|e| RetintError::RemoteFetch {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

/// Transport-level failures are worth one retry; HTTP status answers are
/// authoritative and are not.
fn is_transient(error: &ureq::Error) -> bool {
    !matches!(error, ureq::Error::StatusCode(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    mod wire_format {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn box_prompt_serializes_with_service_field_names() {
                let prompt = BoxPrompt {
                    x_min: 20,
                    y_min: 30,
                    x_max: 80,
                    y_max: 90,
                };
                let json = serde_json::to_value(SegmentRequest {
                    image_url: "https://store.example/a.png".into(),
                    box_prompts: vec![prompt],
                })
                .unwrap();

                assert_eq!(json["image_url"], "https://store.example/a.png");
                assert_eq!(json["box_prompts"][0]["x_min"], 20);
                assert_eq!(json["box_prompts"][0]["y_min"], 30);
                assert_eq!(json["box_prompts"][0]["x_max"], 80);
                assert_eq!(json["box_prompts"][0]["y_max"], 90);
            }

            #[test]
            fn box_prompt_from_bounding_box() {
                let b = BoundingBox {
                    min_x: 1,
                    min_y: 2,
                    max_x: 3,
                    max_y: 4,
                };
                assert_eq!(
                    BoxPrompt::from(b),
                    BoxPrompt {
                        x_min: 1,
                        y_min: 2,
                        x_max: 3,
                        y_max: 4
                    }
                );
            }

            #[test]
            fn response_logs_default_to_empty() {
                let parsed: SegmentResponse =
                    serde_json::from_str(r#"{"image": {"url": "https://cdn.example/mask.png"}}"#)
                        .unwrap();
                assert_eq!(parsed.image.url, "https://cdn.example/mask.png");
                assert!(parsed.logs.is_empty());
            }

            #[test]
            fn response_carries_progress_logs() {
                let parsed: SegmentResponse = serde_json::from_str(
                    r#"{"image": {"url": "u"}, "logs": ["queued", "running"]}"#,
                )
                .unwrap();
                assert_eq!(parsed.logs, ["queued", "running"]);
            }
        }
    }

    mod retry_policy {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn http_status_answers_are_not_retried() {
                assert!(!is_transient(&ureq::Error::StatusCode(502)));
            }

            #[test]
            fn transport_failures_are_retried() {
                let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
                assert!(is_transient(&ureq::Error::Io(io)));
            }
        }
    }
}

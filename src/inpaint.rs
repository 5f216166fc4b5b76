use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use crate::{RetintError, RetintResult};

/// Input payload for the generative inpainting backend. The backend itself
/// is an opaque collaborator; only the request shape is part of this crate.
#[derive(Debug, Clone, Serialize)]
pub struct InpaintRequest {
    /// Original image as a base64 data URI.
    pub image: String,
    /// Selection mask as a base64 data URI.
    pub mask: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_outputs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_inference_steps: Option<u32>,
}

impl InpaintRequest {
    /// Request for prompt-driven generation into the masked region.
    pub fn generate(image_png: &[u8], mask_png: &[u8], prompt: impl Into<String>) -> Self {
        Self {
            image: image_data_uri(image_png),
            mask: image_data_uri(mask_png),
            prompt: Some(prompt.into()),
            guidance: Some(65),
            num_outputs: Some(1),
            output_format: Some("png".into()),
            num_inference_steps: Some(50),
        }
    }

    /// Request for object removal: image and mask only.
    pub fn remove(image_png: &[u8], mask_png: &[u8]) -> Self {
        Self {
            image: image_data_uri(image_png),
            mask: image_data_uri(mask_png),
            prompt: None,
            guidance: None,
            num_outputs: None,
            output_format: None,
            num_inference_steps: None,
        }
    }
}

/// Generative inpainting/removal backend seam. Implementations run the model
/// and return one or more result image URLs.
pub trait InpaintBackend {
    fn run(&self, request: &InpaintRequest) -> RetintResult<Vec<String>>;
}

/// Wrap image bytes as the octet-stream data URI the backends accept.
pub fn image_data_uri(bytes: &[u8]) -> String {
    format!("data:application/octet-stream;base64,{}", STANDARD.encode(bytes))
}

/// Fetch a generated image URL and return its bytes as base64, for callers
/// speaking the JSON route contract. Non-2xx answers are hard failures.
pub fn fetch_output_image(agent: &ureq::Agent, url: &str) -> RetintResult<String> {
    let mut response = agent.get(url).call().map_err(|error| match error {
        ureq::Error::StatusCode(status) => RetintError::RemoteStatus {
            url: url.to_string(),
            status,
        },
        other => RetintError::RemoteFetch {
            url: url.to_string(),
            message: other.to_string(),
        },
    })?;
    let bytes = response
        .body_mut()
        .read_to_vec()
        .map_err(|e| RetintError::RemoteFetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;
    Ok(STANDARD.encode(bytes))
}

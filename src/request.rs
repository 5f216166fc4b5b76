use serde::{Deserialize, Serialize};

/// What the caller wants done with the image, as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UseFor {
    #[serde(rename = "magic_genImage")]
    MagicGenImage,
    #[serde(rename = "magic_removeMask")]
    MagicRemoveMask,
    #[serde(rename = "normal_genImage")]
    NormalGenImage,
}

/// JSON body of an edit request as the route boundary receives it. Every
/// field is optional at the wire level; [`missing_fields`] reports what a
/// given mode actually requires.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    pub use_for: Option<UseFor>,
    pub image_base64: Option<String>,
    pub mask_base64: Option<String>,
    pub prompt: Option<String>,
    pub color: Option<String>,
    pub value: Option<f64>,
}

/// How a valid request should be dispatched.
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    /// A target color is present: run the segmentation-guided recolor
    /// pipeline. Takes precedence over the generative backends.
    Recolor { color: String },
    /// Erase the masked region with the object-removal backend.
    RemoveObject,
    /// Generate into the masked region (or the whole image for the normal
    /// mode) with the inpainting backend.
    Generate { prompt: String },
}

/// Pure required-field validation: returns the missing field names, or
/// `None` when the request is complete. No side effects.
pub fn missing_fields(request: &EditRequest) -> Option<Vec<&'static str>> {
    let mut missing = Vec::new();
    if request.use_for.is_none() {
        missing.push("useFor");
    }
    if request.image_base64.is_none() {
        missing.push("imageBase64");
    }
    if matches!(
        request.use_for,
        Some(UseFor::MagicGenImage | UseFor::NormalGenImage)
    ) && request.prompt.is_none()
    {
        missing.push("prompt");
    }
    if matches!(
        request.use_for,
        Some(UseFor::MagicGenImage | UseFor::MagicRemoveMask)
    ) && request.mask_base64.is_none()
    {
        missing.push("maskBase64");
    }
    if missing.is_empty() { None } else { Some(missing) }
}

/// Decide the dispatch target for a validated request. Returns `None` when
/// the request is incomplete.
pub fn plan(request: &EditRequest) -> Option<EditAction> {
    if missing_fields(request).is_some() {
        return None;
    }
    if let Some(color) = &request.color {
        return Some(EditAction::Recolor {
            color: color.clone(),
        });
    }
    match request.use_for? {
        UseFor::MagicRemoveMask => Some(EditAction::RemoveObject),
        UseFor::MagicGenImage | UseFor::NormalGenImage => Some(EditAction::Generate {
            prompt: request.prompt.clone()?,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gen_request() -> EditRequest {
        EditRequest {
            use_for: Some(UseFor::MagicGenImage),
            image_base64: Some("aW1n".into()),
            mask_base64: Some("bWFzaw==".into()),
            prompt: Some("walnut floor".into()),
            color: None,
            value: None,
        }
    }

    mod missing_fields {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn complete_gen_request_is_valid() {
                assert_eq!(missing_fields(&gen_request()), None);
            }

            #[test]
            fn empty_request_reports_base_fields() {
                let missing = missing_fields(&EditRequest::default()).unwrap();
                assert_eq!(missing, ["useFor", "imageBase64"]);
            }

            #[test]
            fn gen_modes_require_prompt() {
                let mut request = gen_request();
                request.prompt = None;
                assert_eq!(missing_fields(&request), Some(vec!["prompt"]));

                request.use_for = Some(UseFor::NormalGenImage);
                assert_eq!(missing_fields(&request), Some(vec!["prompt"]));
            }

            #[test]
            fn remove_mode_requires_mask_but_not_prompt() {
                let request = EditRequest {
                    use_for: Some(UseFor::MagicRemoveMask),
                    image_base64: Some("aW1n".into()),
                    ..EditRequest::default()
                };
                assert_eq!(missing_fields(&request), Some(vec!["maskBase64"]));
            }

            #[test]
            fn normal_gen_does_not_require_mask() {
                let request = EditRequest {
                    use_for: Some(UseFor::NormalGenImage),
                    image_base64: Some("aW1n".into()),
                    prompt: Some("bright kitchen".into()),
                    ..EditRequest::default()
                };
                assert_eq!(missing_fields(&request), None);
            }
        }
    }

    mod plan {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn color_takes_precedence_over_generation() {
                let mut request = gen_request();
                request.color = Some("#808080".into());
                assert_eq!(
                    plan(&request),
                    Some(EditAction::Recolor {
                        color: "#808080".into()
                    })
                );
            }

            #[test]
            fn remove_mode_plans_object_removal() {
                let request = EditRequest {
                    use_for: Some(UseFor::MagicRemoveMask),
                    image_base64: Some("aW1n".into()),
                    mask_base64: Some("bWFzaw==".into()),
                    ..EditRequest::default()
                };
                assert_eq!(plan(&request), Some(EditAction::RemoveObject));
            }

            #[test]
            fn gen_mode_plans_generation_with_prompt() {
                assert_eq!(
                    plan(&gen_request()),
                    Some(EditAction::Generate {
                        prompt: "walnut floor".into()
                    })
                );
            }

            #[test]
            fn incomplete_request_has_no_plan() {
                assert_eq!(plan(&EditRequest::default()), None);
            }
        }
    }

    mod wire_format {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn deserializes_camel_case_body() {
                let request: EditRequest = serde_json::from_str(
                    r#"{
                        "useFor": "magic_genImage",
                        "imageBase64": "aW1n",
                        "maskBase64": "bWFzaw==",
                        "prompt": "oak shelves",
                        "value": 0.8
                    }"#,
                )
                .unwrap();
                assert_eq!(request.use_for, Some(UseFor::MagicGenImage));
                assert_eq!(request.value, Some(0.8));
                assert!(request.color.is_none());
            }

            #[test]
            fn unknown_use_for_is_rejected() {
                let result: Result<EditRequest, _> =
                    serde_json::from_str(r#"{"useFor": "magic_other"}"#);
                assert!(result.is_err());
            }
        }
    }
}

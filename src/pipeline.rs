use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::blend::{blend_recolor, encode_output, prepare_refined_mask};
use crate::color::parse_hex_color;
use crate::config::RecolorOptions;
use crate::segment::{BoxPrompt, SegmentProvider};
use crate::{RetintError, RetintResult, bbox};

/// Result of a recolor run.
#[derive(Debug, Clone)]
pub enum RecolorOutcome {
    /// The drawn mask had no selected pixel; nothing was done and no
    /// collaborator was called. This is an explicit no-op, not an error.
    NothingSelected,
    /// The recolored image.
    Recolored(RecoloredImage),
}

/// Final recolored image as PNG bytes. Writing to disk is the caller's
/// concern; there is no implicit filesystem side effect.
#[derive(Debug, Clone)]
pub struct RecoloredImage {
    png: Vec<u8>,
    logs: Vec<String>,
}

impl RecoloredImage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.png
    }

    /// Base64 of the PNG bytes, for callers speaking the JSON route contract.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.png)
    }

    /// Progress log lines relayed by the segmentation service. Diagnostics
    /// only.
    pub fn segmentation_logs(&self) -> &[String] {
        &self.logs
    }
}

/// End-to-end recolor workflow: bounding box from the drawn mask, refined
/// mask from the segmentation service, then the alpha-weighted color blend.
///
/// The stages run strictly in sequence and fail fast; a failed stage
/// surfaces with its own error kind and there is no resume, so callers
/// restart the whole pipeline on failure.
#[derive(Debug)]
pub struct RecolorPipeline<P> {
    provider: P,
    options: RecolorOptions,
}

impl<P: SegmentProvider> RecolorPipeline<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            options: RecolorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RecolorOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the pipeline over the original image, the user-drawn mask (white
    /// foreground on black), and a `#RRGGBB` target color.
    pub fn run(
        &self,
        original_bytes: &[u8],
        drawn_mask_bytes: &[u8],
        color_code: &str,
    ) -> RetintResult<RecolorOutcome> {
        let Some(bounds) = bbox::estimate_bounding_box(drawn_mask_bytes)? else {
            return Ok(RecolorOutcome::NothingSelected);
        };

        // Normalize the original to PNG for the upload, whatever the caller
        // decoded it from, and keep the decode for the blend stage.
        let original = image::load_from_memory(original_bytes)?.to_rgba8();
        let original_png = crate::raster::encode_png(&original)?;

        let image_url = self
            .provider
            .upload_image(&original_png)
            .map_err(|e| RetintError::Segmentation(e.to_string()))?;
        let segmented = self.provider.segment(&image_url, BoxPrompt::from(bounds))?;

        let refined_bytes = self.provider.fetch_mask(&segmented.image.url)?;

        let target = parse_hex_color(color_code)?;

        let refined = prepare_refined_mask(
            &refined_bytes,
            original.dimensions(),
            self.options.blur_sigma,
        )?;
        let blended = blend_recolor(&original, &refined, target)?;

        Ok(RecolorOutcome::Recolored(RecoloredImage {
            png: encode_output(&blended)?,
            logs: segmented.logs,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{RefinedMask, SegmentResponse};
    use image::{GrayImage, Luma, Rgba, RgbaImage};
    use std::cell::RefCell;

    fn png_of_gray(image: &GrayImage) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        image.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
        cursor.into_inner()
    }

    fn png_of_rgba(image: &RgbaImage) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        image.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
        cursor.into_inner()
    }

    #[derive(Default)]
    struct Calls {
        uploads: u32,
        segments: u32,
        fetches: u32,
        last_prompt: Option<BoxPrompt>,
    }

    /// Provider that serves a canned refined mask and records call counts.
    struct FakeProvider {
        refined_mask_png: Vec<u8>,
        fail_segment: bool,
        calls: RefCell<Calls>,
    }

    impl FakeProvider {
        fn serving(refined_mask_png: Vec<u8>) -> Self {
            Self {
                refined_mask_png,
                fail_segment: false,
                calls: RefCell::new(Calls::default()),
            }
        }
    }

    impl SegmentProvider for FakeProvider {
        fn upload_image(&self, _png: &[u8]) -> RetintResult<String> {
            self.calls.borrow_mut().uploads += 1;
            Ok("https://store.example/original.png".into())
        }

        fn segment(&self, _image_url: &str, prompt: BoxPrompt) -> RetintResult<SegmentResponse> {
            let mut calls = self.calls.borrow_mut();
            calls.segments += 1;
            calls.last_prompt = Some(prompt);
            if self.fail_segment {
                return Err(RetintError::Segmentation("service exploded".into()));
            }
            Ok(SegmentResponse {
                image: RefinedMask {
                    url: "https://cdn.example/refined.png".into(),
                },
                logs: vec!["running".into()],
            })
        }

        fn fetch_mask(&self, _url: &str) -> RetintResult<Vec<u8>> {
            self.calls.borrow_mut().fetches += 1;
            Ok(self.refined_mask_png.clone())
        }
    }

    fn drawn_mask_png(w: u32, h: u32, rect: Option<(u32, u32, u32, u32)>) -> Vec<u8> {
        let mut mask = GrayImage::from_pixel(w, h, Luma([0]));
        if let Some((x0, y0, x1, y1)) = rect {
            for y in y0..=y1 {
                for x in x0..=x1 {
                    mask.put_pixel(x, y, Luma([255]));
                }
            }
        }
        png_of_gray(&mask)
    }

    mod run {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn all_background_mask_short_circuits_without_network() {
                let provider = FakeProvider::serving(Vec::new());
                let pipeline = RecolorPipeline::new(provider);
                let original = png_of_rgba(&RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 255])));
                let mask = drawn_mask_png(10, 10, None);

                let outcome = pipeline.run(&original, &mask, "#808080").unwrap();

                assert!(matches!(outcome, RecolorOutcome::NothingSelected));
                let calls = pipeline.provider.calls.borrow();
                assert_eq!(calls.uploads, 0);
                assert_eq!(calls.segments, 0);
                assert_eq!(calls.fetches, 0);
            }

            #[test]
            fn box_prompt_matches_drawn_mask_bounds() {
                let refined = drawn_mask_png(10, 10, Some((2, 3, 7, 8)));
                let provider = FakeProvider::serving(refined);
                let pipeline =
                    RecolorPipeline::new(provider).with_options(RecolorOptions::default());
                let original = png_of_rgba(&RgbaImage::from_pixel(10, 10, Rgba([9, 9, 9, 255])));
                let mask = drawn_mask_png(10, 10, Some((2, 3, 7, 8)));

                pipeline.run(&original, &mask, "#606060").unwrap();

                let calls = pipeline.provider.calls.borrow();
                assert_eq!(
                    calls.last_prompt,
                    Some(BoxPrompt {
                        x_min: 2,
                        y_min: 3,
                        x_max: 7,
                        y_max: 8
                    })
                );
                assert_eq!((calls.uploads, calls.segments, calls.fetches), (1, 1, 1));
            }

            #[test]
            fn recolors_masked_region_with_multiply() {
                let original_image = RgbaImage::from_pixel(10, 10, Rgba([200, 100, 40, 255]));
                let refined = drawn_mask_png(10, 10, Some((0, 0, 4, 9)));
                let pipeline = RecolorPipeline::new(FakeProvider::serving(refined))
                    .with_options(RecolorOptions::default().with_blur_sigma(0.0));
                let mask = drawn_mask_png(10, 10, Some((0, 0, 4, 9)));

                let outcome = pipeline
                    .run(&png_of_rgba(&original_image), &mask, "#808080")
                    .unwrap();
                let RecolorOutcome::Recolored(result) = outcome else {
                    panic!("expected a recolored image");
                };

                let output = image::load_from_memory(result.as_bytes()).unwrap().to_rgba8();
                let expected = [
                    (200u16 * 128 / 255) as u8,
                    (100u16 * 128 / 255) as u8,
                    (40u16 * 128 / 255) as u8,
                    255,
                ];
                assert_eq!(output.get_pixel(2, 5).0, expected);
                assert_eq!(output.get_pixel(8, 5).0, [200, 100, 40, 255]);
                assert_eq!(result.segmentation_logs(), ["running"]);
            }

            #[test]
            fn segmentation_failure_propagates_with_its_own_kind() {
                let refined = drawn_mask_png(4, 4, Some((0, 0, 1, 1)));
                let mut provider = FakeProvider::serving(refined);
                provider.fail_segment = true;
                let pipeline = RecolorPipeline::new(provider);
                let original = png_of_rgba(&RgbaImage::from_pixel(4, 4, Rgba([7, 7, 7, 255])));
                let mask = drawn_mask_png(4, 4, Some((1, 1, 2, 2)));

                let err = pipeline.run(&original, &mask, "#445566").unwrap_err();
                assert!(matches!(err, RetintError::Segmentation(_)));
            }

            #[test]
            fn bad_color_fails_after_mask_fetch_with_parse_error() {
                let refined = drawn_mask_png(4, 4, Some((0, 0, 3, 3)));
                let pipeline = RecolorPipeline::new(FakeProvider::serving(refined));
                let original = png_of_rgba(&RgbaImage::from_pixel(4, 4, Rgba([7, 7, 7, 255])));
                let mask = drawn_mask_png(4, 4, Some((1, 1, 2, 2)));

                let err = pipeline.run(&original, &mask, "#XYZ").unwrap_err();
                assert!(matches!(err, RetintError::ColorParse(_)));
            }

            #[test]
            fn refined_mask_of_wrong_size_is_a_size_mismatch() {
                let refined = drawn_mask_png(5, 5, Some((0, 0, 4, 4)));
                let pipeline = RecolorPipeline::new(FakeProvider::serving(refined));
                let original = png_of_rgba(&RgbaImage::from_pixel(10, 10, Rgba([7, 7, 7, 255])));
                let mask = drawn_mask_png(10, 10, Some((1, 1, 2, 2)));

                let err = pipeline.run(&original, &mask, "#445566").unwrap_err();
                assert!(matches!(err, RetintError::MaskSizeMismatch { .. }));
            }

            #[test]
            fn undecodable_drawn_mask_is_a_bounding_box_error() {
                let pipeline = RecolorPipeline::new(FakeProvider::serving(Vec::new()));
                let original = png_of_rgba(&RgbaImage::from_pixel(4, 4, Rgba([7, 7, 7, 255])));

                let err = pipeline.run(&original, b"not a png", "#445566").unwrap_err();
                assert!(matches!(err, RetintError::BoundingBox(_)));
                assert_eq!(pipeline.provider.calls.borrow().uploads, 0);
            }

            #[test]
            fn base64_output_round_trips() {
                let refined = drawn_mask_png(4, 4, Some((0, 0, 3, 3)));
                let pipeline = RecolorPipeline::new(FakeProvider::serving(refined))
                    .with_options(RecolorOptions::default().with_blur_sigma(0.0));
                let original = png_of_rgba(&RgbaImage::from_pixel(4, 4, Rgba([7, 7, 7, 255])));
                let mask = drawn_mask_png(4, 4, Some((0, 0, 3, 3)));

                let RecolorOutcome::Recolored(result) =
                    pipeline.run(&original, &mask, "#445566").unwrap()
                else {
                    panic!("expected a recolored image");
                };
                let decoded = STANDARD.decode(result.to_base64()).unwrap();
                assert_eq!(decoded, result.as_bytes());
            }
        }
    }
}

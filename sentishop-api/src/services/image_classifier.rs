//! Image classification adapter
//!
//! Uploaded images are normalized into the classifier's input layout:
//! 224x224 RGB, pixel values scaled to [0, 1], batch of one (NHWC).
//! The hosted model receives that exact input re-encoded as PNG and
//! answers with a ranked `[{label, score}]` list of ImageNet classes.

use async_trait::async_trait;
use image::{imageops::FilterType, ImageFormat, Rgb, RgbImage};
use sentishop_common::{Error, Result};
use std::io::Cursor;
use std::time::Duration;
use tracing::debug;

use super::{build_http_client, send_with_retry, LabelScore};

/// Side length of the square model input
pub const INPUT_SIZE: u32 = 224;
const CHANNELS: usize = 3;

/// Normalized image batch, shape `[1, INPUT_SIZE, INPUT_SIZE, 3]`
#[derive(Debug, Clone)]
pub struct ImageTensor {
    data: Vec<f32>,
}

impl ImageTensor {
    pub fn shape(&self) -> [usize; 4] {
        [1, INPUT_SIZE as usize, INPUT_SIZE as usize, CHANNELS]
    }

    /// Encode the tensor back into an 8-bit PNG
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let [_, _, width, channels] = self.shape();
        let img = RgbImage::from_fn(INPUT_SIZE, INPUT_SIZE, |x, y| {
            let base = (y as usize * width + x as usize) * channels;
            Rgb([
                to_byte(self.data[base]),
                to_byte(self.data[base + 1]),
                to_byte(self.data[base + 2]),
            ])
        });

        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| Error::Classification(format!("Cannot encode model input: {}", e)))?;
        Ok(buf)
    }
}

fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Decode, resize and normalize raw image bytes
pub fn preprocess(bytes: &[u8]) -> Result<ImageTensor> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| Error::Classification(format!("Unreadable image: {}", e)))?;

    let rgb = decoded
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::CatmullRom)
        .to_rgb8();

    let data = rgb
        .into_raw()
        .into_iter()
        .map(|channel| f32::from(channel) / 255.0)
        .collect();

    Ok(ImageTensor { data })
}

/// Reduce an ImageNet label to its primary class name
///
/// `"jersey, T-shirt, tee shirt"` becomes `"jersey"`,
/// `"Windsor tie"` becomes `"Windsor_tie"`.
pub fn imagenet_class_name(label: &str) -> String {
    label
        .split(',')
        .next()
        .unwrap_or(label)
        .trim()
        .replace(' ', "_")
}

#[async_trait]
pub trait ImageClassifier: Send + Sync {
    /// Return the single highest-confidence class label for `image`
    async fn classify(&self, image: &ImageTensor) -> Result<String>;
}

/// Client for a hosted image-classification endpoint
pub struct HttpImageClassifier {
    http_client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpImageClassifier {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = build_http_client(timeout)
            .map_err(|e| Error::Internal(format!("Cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            url: url.into(),
            api_key: api_key.into(),
        })
    }

    fn request(&self, png: &[u8]) -> reqwest::RequestBuilder {
        let request = self
            .http_client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "image/png")
            .body(png.to_vec());
        if self.api_key.is_empty() {
            request
        } else {
            request.bearer_auth(&self.api_key)
        }
    }
}

#[async_trait]
impl ImageClassifier for HttpImageClassifier {
    async fn classify(&self, image: &ImageTensor) -> Result<String> {
        let png = image.to_png()?;

        let response = send_with_retry("image-classifier", || self.request(&png))
            .await
            .map_err(|e| Error::Classification(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Classification(format!("API error {}: {}", status.as_u16(), body)));
        }

        let ranked: Vec<LabelScore> = response
            .json()
            .await
            .map_err(|e| Error::Classification(format!("Malformed response: {}", e)))?;

        let top = ranked
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| Error::Classification("Empty result list".to_string()))?;

        let category = imagenet_class_name(&top.label);
        if category.is_empty() {
            return Err(Error::Classification(format!("Unusable label: {:?}", top.label)));
        }

        debug!(%category, score = top.score, "Image classified");
        Ok(category)
    }
}

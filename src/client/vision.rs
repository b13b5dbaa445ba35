//! Vision chat request builder
//!
//! Builds an OpenAI-style chat request whose user message carries a text
//! segment and an image embedded as a base64 `data:` URI.

use super::ClientError;
use base64::Engine;
use base64::engine::general_purpose;
use serde_json::{Value, json};
use std::path::Path;

pub const DEFAULT_MODEL: &str = "cogvlm-chat-17b";
pub const DEFAULT_PROMPT: &str = "Describe what is in the image";

/// Image formats accepted by vision backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageMime {
    pub fn as_mime(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
            ImageMime::Gif => "image/gif",
            ImageMime::Webp => "image/webp",
        }
    }

    /// Infer the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, ClientError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "jpg" | "jpeg" => Ok(ImageMime::Jpeg),
            "png" => Ok(ImageMime::Png),
            "gif" => Ok(ImageMime::Gif),
            "webp" => Ok(ImageMime::Webp),
            _ => Err(ClientError::UnsupportedImage(path.display().to_string())),
        }
    }
}

/// Encode image bytes as a `data:<mime>;base64,<payload>` URI
pub fn image_data_url(bytes: &[u8], mime: ImageMime) -> String {
    let encoded = general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime.as_mime(), encoded)
}

/// Chat request with one user turn: a prompt plus an image
#[derive(Debug, Clone)]
pub struct VisionRequest {
    model: String,
    prompt: String,
    image_url: String,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
}

impl VisionRequest {
    /// Start a request for an already-encoded image URL
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            image_url: image_url.into(),
            temperature: 0.8,
            top_p: 0.9,
            max_tokens: 1024,
        }
    }

    /// Read an image file and embed it as a data URI
    pub fn from_image_file(path: &Path) -> Result<Self, ClientError> {
        let mime = ImageMime::from_path(path)?;
        let bytes = std::fs::read(path).map_err(|source| ClientError::ImageRead {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(image_data_url(&bytes, mime)))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// JSON body ready to POST to `/v1/chat/completions`
    pub fn to_json(&self) -> Value {
        json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": self.prompt },
                    { "type": "image_url", "image_url": { "url": self.image_url } },
                ],
            }],
            "temperature": self.temperature,
            "top_p": self.top_p,
            "max_tokens": self.max_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_image_data_url_encodes_standard_base64() {
        assert_eq!(
            image_data_url(b"hello", ImageMime::Png),
            "data:image/png;base64,aGVsbG8="
        );
    }

    #[test]
    fn test_mime_from_path() {
        assert_eq!(
            ImageMime::from_path(Path::new("test.jpg")).unwrap(),
            ImageMime::Jpeg
        );
        assert_eq!(
            ImageMime::from_path(Path::new("photo.JPEG")).unwrap(),
            ImageMime::Jpeg
        );
        assert_eq!(
            ImageMime::from_path(Path::new("a/b.webp")).unwrap(),
            ImageMime::Webp
        );
        assert!(ImageMime::from_path(Path::new("scan.tiff")).is_err());
        assert!(ImageMime::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_request_json_shape() {
        let body = VisionRequest::new("data:image/jpeg;base64,AAAA").to_json();

        assert_eq!(body["model"], "cogvlm-chat-17b");
        assert_eq!(body["temperature"], 0.8);
        assert_eq!(body["top_p"], 0.9);
        assert_eq!(body["max_tokens"], 1024);

        let message = &body["messages"][0];
        assert_eq!(message["role"], "user");
        assert_eq!(message["content"][0]["type"], "text");
        assert_eq!(message["content"][0]["text"], DEFAULT_PROMPT);
        assert_eq!(message["content"][1]["type"], "image_url");
        assert_eq!(
            message["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,AAAA"
        );
    }

    #[test]
    fn test_builder_overrides() {
        let request = VisionRequest::new("data:image/png;base64,AA==")
            .with_model("qwenvl-chat")
            .with_prompt("What colour is the car?")
            .with_temperature(0.2)
            .with_top_p(0.5)
            .with_max_tokens(64);
        assert_eq!(request.model(), "qwenvl-chat");

        let body = request.to_json();
        assert_eq!(body["model"], "qwenvl-chat");
        assert_eq!(body["messages"][0]["content"][0]["text"], "What colour is the car?");
        assert_eq!(body["temperature"], 0.2);
        assert_eq!(body["top_p"], 0.5);
        assert_eq!(body["max_tokens"], 64);
    }

    #[test]
    fn test_from_image_file_embeds_contents() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"hello").unwrap();
        file.flush().unwrap();

        let request = VisionRequest::from_image_file(file.path()).unwrap();
        assert_eq!(
            request.to_json()["messages"][0]["content"][1]["image_url"]["url"],
            "data:image/png;base64,aGVsbG8="
        );
    }

    #[test]
    fn test_from_image_file_missing_file() {
        let err = VisionRequest::from_image_file(Path::new("/nonexistent/test.jpg")).unwrap_err();
        assert!(matches!(err, ClientError::ImageRead { .. }));
    }
}

//! Azure OpenAI chat-completions client for image tagging.

use super::{parse_tags, TaggingService, TAG_INSTRUCTION};
use crate::error::TagError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_VERSION: &str = "2024-06-01";

/// Connection settings for the vision deployment
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,
    pub api_key: String,
    /// Deployment name of a vision-capable chat model
    pub deployment: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl VisionConfig {
    pub fn new(endpoint: String, api_key: String, deployment: String) -> Self {
        Self {
            endpoint,
            api_key,
            deployment,
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

/// Blocking client, built once per run and shared by all workers
pub struct VisionClient {
    config: VisionConfig,
    client: Client,
}

impl VisionClient {
    pub fn new(config: VisionConfig) -> Result<Self, TagError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }
}

impl TaggingService for VisionClient {
    fn tag(&self, path: &Path, description: &str) -> Result<Vec<String>, TagError> {
        let bytes = std::fs::read(path).map_err(|source| TagError::ReadImage {
            path: path.to_path_buf(),
            source,
        })?;

        let response = self
            .client
            .post(self.config.completions_url())
            .header("api-key", &self.config.api_key)
            .json(&request_body(&data_url(path, &bytes), description))
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error message".to_string());

            if is_invalid_payload(status, &body) {
                return Err(TagError::InvalidPayload {
                    path: path.to_path_buf(),
                });
            }
            return Err(TagError::Service {
                status: status.as_u16(),
                body,
            });
        }

        #[derive(Deserialize)]
        struct Completion {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }

        #[derive(Deserialize)]
        struct Message {
            content: Option<String>,
        }

        let completion: Completion = response.json()?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(TagError::EmptyResponse)?;

        Ok(parse_tags(&content))
    }
}

fn data_url(path: &Path, bytes: &[u8]) -> String {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

fn request_body(image_url: &str, description: &str) -> Value {
    let text = if description.is_empty() {
        TAG_INSTRUCTION.to_string()
    } else {
        format!("{}\n\n{}", TAG_INSTRUCTION, description)
    };

    json!({
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": text },
                { "type": "image_url", "image_url": { "url": image_url } }
            ]
        }]
    })
}

/// The service rejects images it cannot read with a 400
fn is_invalid_payload(status: StatusCode, body: &str) -> bool {
    status == StatusCode::BAD_REQUEST
        && ["invalidPayload", "invalid_image", "Invalid image"]
            .iter()
            .any(|marker| body.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_includes_deployment_and_version() {
        let config = VisionConfig::new(
            "https://example.openai.azure.com/".to_string(),
            "key".to_string(),
            "gpt-4o".to_string(),
        );
        assert_eq!(
            config.completions_url(),
            "https://example.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-06-01"
        );
    }

    #[test]
    fn data_url_uses_image_mime() {
        let url = data_url(Path::new("photo.JPG"), b"abc");
        assert_eq!(url, "data:image/jpeg;base64,YWJj");
    }

    #[test]
    fn request_carries_instruction_description_and_image() {
        let body = request_body("data:image/png;base64,AA==", "An image with keywords 'cat'");
        let content = &body["messages"][0]["content"];

        let text = content[0]["text"].as_str().unwrap();
        assert!(text.starts_with(TAG_INSTRUCTION));
        assert!(text.ends_with("An image with keywords 'cat'"));
        assert_eq!(content[1]["image_url"]["url"], "data:image/png;base64,AA==");
    }

    #[test]
    fn empty_description_sends_instruction_only() {
        let body = request_body("data:image/png;base64,AA==", "");
        assert_eq!(body["messages"][0]["content"][0]["text"], TAG_INSTRUCTION);
    }

    #[test]
    fn invalid_payload_needs_400_and_marker() {
        let body = r#"{"error":{"code":"invalidPayload","message":"bad image"}}"#;
        assert!(is_invalid_payload(StatusCode::BAD_REQUEST, body));
        assert!(!is_invalid_payload(StatusCode::INTERNAL_SERVER_ERROR, body));
        assert!(!is_invalid_payload(StatusCode::BAD_REQUEST, "quota exceeded"));
    }

    #[test]
    fn unreadable_image_fails_before_network() {
        let client = VisionClient::new(VisionConfig::new(
            "http://127.0.0.1:9".to_string(),
            "key".to_string(),
            "deployment".to_string(),
        ))
        .unwrap();

        let err = client
            .tag(Path::new("/nonexistent/photo.jpg"), "")
            .unwrap_err();
        assert!(matches!(err, TagError::ReadImage { .. }));
    }
}

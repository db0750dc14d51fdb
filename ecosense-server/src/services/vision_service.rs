use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ecosense_api::models::AnalysisResult;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use crate::configs::Vision;
use crate::errors::VisionError;

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Still image fetched before the request is sent.
    Url(String),
    /// Base64 JPEG captured from the live camera.
    Inline(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisionRequest {
    pub image: ImageSource,
    /// Ambient temperature in whole degrees Celsius.
    pub temperature: i32,
    /// Ambient brightness, 0-100.
    pub brightness: i32,
}

/// Remote multimodal model that turns a room image and its sensor readings into a recommendation.
#[async_trait]
pub trait VisionService: Send + Sync {
    async fn analyze(&self, request: VisionRequest) -> Result<AnalysisResult, VisionError>;
}

pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(vision: &Vision) -> Result<Self, VisionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(vision.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: vision.base_url.trim_end_matches('/').to_string(),
            model: vision.model.clone(),
            api_key: vision.api_key.clone(),
        })
    }

    async fn fetch_image(&self, url: &str) -> Result<String, VisionError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| VisionError::Image(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VisionError::Image(format!("{} returned {}", url, response.status())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| VisionError::Image(e.to_string()))?;

        Ok(STANDARD.encode(bytes))
    }

    fn request_body(request: &VisionRequest, image: &str) -> Value {
        json!({
            "contents": [{
                "parts": [
                    { "text": prompt(request.temperature, request.brightness) },
                    { "inline_data": { "mime_type": "image/jpeg", "data": image } }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "occupied": { "type": "BOOLEAN" },
                        "personCount": { "type": "INTEGER" },
                        "lightRecommendation": { "type": "STRING", "enum": ["ON", "OFF"] },
                        "fanRecommendation": { "type": "STRING", "enum": ["ON", "OFF"] },
                        "fanSpeed": { "type": "INTEGER", "minimum": 0, "maximum": 5 },
                        "acRecommendation": { "type": "STRING", "enum": ["ON", "OFF"] },
                        "targetTemp": { "type": "NUMBER" }
                    },
                    "required": [
                        "occupied",
                        "personCount",
                        "lightRecommendation",
                        "fanRecommendation",
                        "fanSpeed",
                        "acRecommendation",
                        "targetTemp"
                    ]
                }
            }
        })
    }
}

fn prompt(temperature: i32, brightness: i32) -> String {
    format!(
        r#"Current node status: temperature {temperature}°C, ambient light {brightness} lux.

Audit rules (strict):
1. Occupancy: count every person in the image.
2. Lighting: if occupants > 0 and ambient light < 60 lux recommend ON, otherwise OFF.
3. Climate, only when occupied:
   - occupants = 0: AC OFF, fan OFF.
   - temperature > 26°C: AC ON with target 23°C, fan OFF.
   - 24°C <= temperature <= 26°C: AC OFF, fan ON at speed 4.
   - temperature < 24°C: AC OFF, fan OFF.

Answer with JSON only, following the response schema."#
    )
}

fn is_quota_message(body: &str) -> bool {
    body.contains("429") || body.contains("RESOURCE_EXHAUSTED")
}

/// Pulls the recommendation out of the first candidate's text part.
fn parse_response(body: &Value) -> Result<AnalysisResult, VisionError> {
    let text = body
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| VisionError::InvalidResponse("response has no text part".to_string()))?;

    let result: AnalysisResult = serde_json::from_str(text.trim())
        .map_err(|e| VisionError::InvalidResponse(e.to_string()))?;

    Ok(result.normalized())
}

#[async_trait]
impl VisionService for GeminiClient {
    async fn analyze(&self, request: VisionRequest) -> Result<AnalysisResult, VisionError> {
        let image = match &request.image {
            ImageSource::Inline(data) => data.clone(),
            ImageSource::Url(url) => self.fetch_image(url).await?,
        };

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        tracing::debug!("requesting analysis from {}", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(&request, &image))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(VisionError::QuotaExceeded(response.text().await.unwrap_or_default()));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            if is_quota_message(&message) {
                return Err(VisionError::QuotaExceeded(message));
            }
            return Err(VisionError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        parse_response(&body)
    }
}

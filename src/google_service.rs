use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::config_manager::{ApiEndpoints, AuthConfig};

/// Where the bearer token for outgoing calls comes from
#[derive(Debug)]
pub enum TokenSource {
    /// Emulators accept unauthenticated calls
    None,
    Static(String),
    /// Metadata server of the hosting platform, cached until shortly before expiry
    Metadata {
        url: String,
        cached: RwLock<Option<CachedToken>>,
    },
}

#[derive(Debug, Clone)]
pub struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
    expires_in: i64,
}

impl TokenSource {
    pub fn from_config(auth: &AuthConfig) -> Result<Self> {
        match auth.mode.as_str() {
            "none" => Ok(Self::None),
            "static" => {
                let token = auth
                    .access_token
                    .clone()
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| anyhow!("auth mode static needs an access_token"))?;
                Ok(Self::Static(token))
            }
            "metadata" => Ok(Self::Metadata {
                url: auth.metadata_url.clone(),
                cached: RwLock::new(None),
            }),
            other => Err(anyhow!("Unsupported auth mode: {}", other)),
        }
    }

    async fn bearer(&self, client: &Client) -> Result<Option<String>> {
        match self {
            Self::None => Ok(None),
            Self::Static(token) => Ok(Some(token.clone())),
            Self::Metadata { url, cached } => {
                if let Some(token) = cached.read().await.as_ref() {
                    if token.expires_at > Utc::now() {
                        return Ok(Some(token.token.clone()));
                    }
                }

                let mut slot = cached.write().await;
                if let Some(token) = slot.as_ref() {
                    if token.expires_at > Utc::now() {
                        return Ok(Some(token.token.clone()));
                    }
                }
                let response = client
                    .get(url)
                    .header("Metadata-Flavor", "Google")
                    .send()
                    .await?;
                let fetched: MetadataToken = read_json(response, "metadata server").await?;
                debug!("Fetched access token valid for {}s", fetched.expires_in);

                // treat the token as expired a minute early
                let expires_at = Utc::now() + Duration::seconds(fetched.expires_in - 60);
                *slot = Some(CachedToken {
                    token: fetched.access_token.clone(),
                    expires_at,
                });
                Ok(Some(fetched.access_token))
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest {
    image: VisionImage,
    features: Vec<VisionFeature>,
}

#[derive(Debug, Serialize)]
struct VisionImage {
    source: VisionImageSource,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VisionImageSource {
    image_uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VisionFeature {
    #[serde(rename = "type")]
    feature_type: String,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    #[serde(default)]
    error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
struct TranslateTextRequest<'a> {
    q: Vec<&'a str>,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateTextResponse {
    data: TranslationList,
}

#[derive(Debug, Deserialize)]
struct TranslationList {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
    #[serde(default)]
    detected_source_language: Option<String>,
}

#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    messages: Vec<PublishMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct PublishMessage<'a> {
    data: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    attributes: &'a BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    #[serde(default)]
    message_ids: Vec<String>,
}

/// Thin REST client for the managed Google APIs the pipeline delegates to
#[derive(Debug)]
pub struct GoogleServiceClient {
    client: Client,
    endpoints: ApiEndpoints,
    token: TokenSource,
    unauthenticated: Vec<String>,
}

impl GoogleServiceClient {
    pub fn new(endpoints: ApiEndpoints, token: TokenSource) -> Self {
        Self {
            client: Client::new(),
            endpoints,
            token,
            unauthenticated: Vec::new(),
        }
    }

    /// Call the named services without a bearer token
    pub fn with_unauthenticated(mut self, services: Vec<String>) -> Self {
        self.unauthenticated = services;
        self
    }

    async fn authorize(&self, service: &str, request: RequestBuilder) -> Result<RequestBuilder> {
        if self.unauthenticated.iter().any(|s| s == service) {
            return Ok(request);
        }
        Ok(match self.token.bearer(&self.client).await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    /// Run text detection on an image already sitting in a bucket.
    ///
    /// Returns every annotation's description in API order: the full text
    /// block first, then the individual words.
    pub async fn detect_texts(&self, image_uri: &str, max_results: u32) -> Result<Vec<String>> {
        let url = format!("{}/v1/images:annotate", self.endpoints.vision);
        let body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: VisionImage {
                    source: VisionImageSource {
                        image_uri: image_uri.to_string(),
                    },
                },
                features: vec![VisionFeature {
                    feature_type: "TEXT_DETECTION".to_string(),
                    max_results,
                }],
            }],
        };

        let request = self.authorize("vision", self.client.post(&url).json(&body)).await?;
        let result: AnnotateResponse = read_json(request.send().await?, "vision").await?;

        let mut texts = Vec::new();
        for response in result.responses {
            if let Some(status) = response.error {
                return Err(anyhow!(
                    "vision annotate failed ({}): {}",
                    status.code,
                    status.message
                ));
            }
            texts.extend(response.text_annotations.into_iter().map(|a| a.description));
        }
        Ok(texts)
    }

    /// Translate `text` into `target`, letting the API detect the source language
    pub async fn translate(&self, text: &str, target: &str) -> Result<String> {
        let url = format!("{}/language/translate/v2", self.endpoints.translate);
        let body = TranslateTextRequest {
            q: vec![text],
            target,
            format: "text",
        };

        let request = self.authorize("translate", self.client.post(&url).json(&body)).await?;
        let result: TranslateTextResponse = read_json(request.send().await?, "translate").await?;

        let translation = result
            .data
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("translate returned no translations"))?;
        if let Some(source) = &translation.detected_source_language {
            debug!("Detected source language {} for target {}", source, target);
        }
        Ok(translation.translated_text)
    }

    /// Publish one message, returning the id the broker assigned
    pub async fn publish(
        &self,
        project_id: &str,
        topic: &str,
        data: &[u8],
        attributes: &BTreeMap<String, String>,
    ) -> Result<String> {
        let url = format!(
            "{}/v1/projects/{}/topics/{}:publish",
            self.endpoints.pubsub, project_id, topic
        );
        let body = PublishRequest {
            messages: vec![PublishMessage {
                data: STANDARD.encode(data),
                attributes,
            }],
        };

        let request = self.authorize("pubsub", self.client.post(&url).json(&body)).await?;
        let result: PublishResponse = read_json(request.send().await?, "pubsub").await?;
        result
            .message_ids
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("pubsub returned no message id"))
    }

    /// Create or overwrite an object with a single media upload
    pub async fn upload_object(
        &self,
        bucket: &str,
        name: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let url = format!("{}/upload/storage/v1/b/{}/o", self.endpoints.storage, bucket);
        let request = self
            .client
            .post(&url)
            .query(&[("uploadType", "media"), ("name", name)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body);

        let request = self.authorize("storage", request).await?;
        let _: serde_json::Value = read_json(request.send().await?, "storage").await?;
        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, service: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!("{} returned {}: {}", service, status, body));
    }
    Ok(response.json().await?)
}

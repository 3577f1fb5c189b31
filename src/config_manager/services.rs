use serde::{Deserialize, Serialize};

/// Base URLs of the managed APIs the collaborators talk to.
///
/// Overridable so the stages can run against local emulators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEndpoints {
    #[serde(default = "default_vision_endpoint")]
    pub vision: String,

    #[serde(default = "default_translate_endpoint")]
    pub translate: String,

    #[serde(default = "default_pubsub_endpoint")]
    pub pubsub: String,

    #[serde(default = "default_storage_endpoint")]
    pub storage: String,
}

fn default_vision_endpoint() -> String {
    "https://vision.googleapis.com".to_string()
}

fn default_translate_endpoint() -> String {
    "https://translation.googleapis.com".to_string()
}

fn default_pubsub_endpoint() -> String {
    "https://pubsub.googleapis.com".to_string()
}

fn default_storage_endpoint() -> String {
    "https://storage.googleapis.com".to_string()
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            vision: default_vision_endpoint(),
            translate: default_translate_endpoint(),
            pubsub: default_pubsub_endpoint(),
            storage: default_storage_endpoint(),
        }
    }
}

/// How outgoing API calls get their bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// `metadata`, `static` or `none`
    #[serde(default = "default_auth_mode")]
    pub mode: String,

    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,

    /// Services called without a bearer token, e.g. `pubsub` behind an emulator
    #[serde(default)]
    pub unauthenticated: Vec<String>,
}

fn default_auth_mode() -> String {
    "metadata".to_string()
}

fn default_metadata_url() -> String {
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token"
        .to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: default_auth_mode(),
            access_token: None,
            metadata_url: default_metadata_url(),
            unauthenticated: Vec::new(),
        }
    }
}

/// Configuration for the external collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_ocr_backend")]
    pub ocr_backend: String,

    #[serde(default = "default_translate_backend")]
    pub translate_backend: String,

    #[serde(default = "default_publisher_backend")]
    pub publisher_backend: String,

    #[serde(default = "default_storage_backend")]
    pub storage_backend: String,

    /// Root directory for the `local` storage backend
    #[serde(default = "default_local_storage_dir")]
    pub local_storage_dir: String,

    #[serde(default = "default_vision_max_results")]
    pub vision_max_results: u32,

    #[serde(default)]
    pub endpoints: ApiEndpoints,

    #[serde(default)]
    pub auth: AuthConfig,
}

fn default_ocr_backend() -> String {
    "vision".to_string()
}

fn default_translate_backend() -> String {
    "google".to_string()
}

fn default_publisher_backend() -> String {
    "pubsub".to_string()
}

fn default_storage_backend() -> String {
    "gcs".to_string()
}

fn default_local_storage_dir() -> String {
    "results".to_string()
}

fn default_vision_max_results() -> u32 {
    10
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            ocr_backend: default_ocr_backend(),
            translate_backend: default_translate_backend(),
            publisher_backend: default_publisher_backend(),
            storage_backend: default_storage_backend(),
            local_storage_dir: default_local_storage_dir(),
            vision_max_results: default_vision_max_results(),
            endpoints: ApiEndpoints::default(),
            auth: AuthConfig::default(),
        }
    }
}

use std::sync::Arc;

use crate::bus::{Publisher, PublisherFactory};
use crate::config::Config;
use crate::google_service::{GoogleServiceClient, TokenSource};
use crate::ocr::{OcrFactory, TextDetector};
use crate::storage::{ObjectStore, StorageFactory};
use crate::translate::{Translator, TranslatorFactory};

/// Everything a stage invocation needs. Holds no per-event state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub detector: Arc<dyn TextDetector>,
    pub translator: Arc<dyn Translator>,
    pub publisher: Arc<dyn Publisher>,
    pub object_store: Arc<dyn ObjectStore>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let service_config = &config.service_config;
        let google_service = Arc::new(
            GoogleServiceClient::new(
                service_config.endpoints.clone(),
                TokenSource::from_config(&service_config.auth)?,
            )
            .with_unauthenticated(service_config.auth.unauthenticated.clone()),
        );

        let detector = OcrFactory::create_detector(service_config, google_service.clone())?;
        let translator =
            TranslatorFactory::create_translator(service_config, google_service.clone())?;
        let publisher = PublisherFactory::create_publisher(
            service_config,
            &config.pipeline_config.project_id,
            google_service.clone(),
        )?;
        let object_store = StorageFactory::create_store(service_config, google_service)?;

        Ok(Self::with_collaborators(
            config,
            detector,
            translator,
            publisher,
            object_store,
        ))
    }

    pub fn with_collaborators(
        config: Config,
        detector: Arc<dyn TextDetector>,
        translator: Arc<dyn Translator>,
        publisher: Arc<dyn Publisher>,
        object_store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            detector,
            translator,
            publisher,
            object_store,
        }
    }
}

//! Extract: storage event -> OCR -> one translation request per target language.
//!
//! Safe to run more than once for the same object; a redelivered event simply
//! publishes the same requests again.

use futures::StreamExt;
use tracing::{error, info, warn};

use crate::bus::OutboundMessage;
use crate::config_manager::FanoutPolicy;
use crate::error::PipelineError;
use crate::events::{
    decode_storage_event, StorageFinalizeEvent, TranslationRequest, MAX_ATTRIBUTE_VALUE_BYTES,
};
use crate::ocr::FragmentStream;
use crate::state::AppState;

/// Outcome of one Extract invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    pub text: String,
    /// Languages whose request made it onto the bus, in publish order
    pub published: Vec<String>,
    /// Languages whose publish failed
    pub failed: Vec<String>,
}

/// Drain the fragment stream and join the fragments with single spaces
pub async fn join_fragments(mut fragments: FragmentStream) -> Result<String, anyhow::Error> {
    let mut parts = Vec::new();
    while let Some(fragment) = fragments.next().await {
        parts.push(fragment?);
    }
    Ok(parts.join(" "))
}

/// One request per language, in the configured order
pub fn build_requests(text: &str, filename: &str, langs: &[String]) -> Vec<TranslationRequest> {
    langs
        .iter()
        .map(|lang| TranslationRequest {
            text: text.to_string(),
            filename: filename.to_string(),
            lang: lang.clone(),
        })
        .collect()
}

pub async fn handle_object_finalized(
    state: &AppState,
    event: StorageFinalizeEvent,
) -> Result<ExtractReport, PipelineError> {
    let image_uri = event.image_uri();
    info!("extract: {}", image_uri);

    let fragments = state
        .detector
        .detect_texts(&image_uri)
        .await
        .map_err(|e| PipelineError::collaborator("vision", e))?;
    let text = join_fragments(fragments)
        .await
        .map_err(|e| PipelineError::collaborator("vision", e))?;
    info!("Extracted {} characters from {}", text.chars().count(), image_uri);

    let pipeline = &state.config.pipeline_config;
    let requests = build_requests(&text, &event.object_name, &pipeline.target_languages);
    let total = requests.len();

    let mut report = ExtractReport {
        text,
        published: Vec::with_capacity(total),
        failed: Vec::new(),
    };

    let oversized = requests
        .first()
        .map(|r| r.oversized_attributes())
        .unwrap_or_default();
    if !oversized.is_empty() {
        warn!(
            "attributes {:?} of {} exceed {} bytes, the bus is likely to reject every publish",
            oversized, event.object_name, MAX_ATTRIBUTE_VALUE_BYTES
        );
    }

    for request in requests {
        let message = OutboundMessage::json(&request)?.with_attributes(request.to_attributes());
        match state.publisher.publish(&pipeline.request_topic, message).await {
            Ok(id) => {
                info!("published: {} for {} ({})", id, request.filename, request.lang);
                report.published.push(request.lang);
            }
            Err(e) => {
                error!(
                    "publish to {} failed for {} ({}): {}",
                    pipeline.request_topic, request.filename, request.lang, e
                );
                report.failed.push(request.lang);
            }
        }
    }

    info!(
        "fan-out of {} bytes for {}: {} published, {} failed",
        report.text.len(),
        event.object_name,
        report.published.len(),
        report.failed.len()
    );

    if !report.failed.is_empty() && pipeline.fanout_policy == FanoutPolicy::RequireAll {
        return Err(PipelineError::PartialPublish {
            failed: report.failed.len(),
            total,
        });
    }

    Ok(report)
}

/// Entry point for a raw push delivery
pub async fn handle_object_finalized_push(
    state: &AppState,
    body: &[u8],
) -> Result<ExtractReport, PipelineError> {
    let event = decode_storage_event(body)?;
    handle_object_finalized(state, event).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::bus::{MemoryPublisher, MockPublisher};
    use crate::ocr::MockTextDetector;
    use crate::state::test_support::{test_config, StateBuilder};

    fn fragment_stream(fragments: &[&str]) -> FragmentStream {
        let items: Vec<anyhow::Result<String>> =
            fragments.iter().map(|f| Ok(f.to_string())).collect();
        Box::new(futures::stream::iter(items))
    }

    fn detector_returning(expected_uri: &str, fragments: &[&str]) -> MockTextDetector {
        let expected_uri = expected_uri.to_string();
        let fragments: Vec<String> = fragments.iter().map(|f| f.to_string()).collect();
        let mut detector = MockTextDetector::new();
        detector
            .expect_detect_texts()
            .withf(move |uri| uri == expected_uri)
            .times(1)
            .returning(move |_| {
                let refs: Vec<&str> = fragments.iter().map(|f| f.as_str()).collect();
                Ok(fragment_stream(&refs))
            });
        detector
    }

    fn requests_on(bus: &MemoryPublisher, topic: &str) -> Vec<TranslationRequest> {
        bus.messages(topic)
            .iter()
            .map(|m| m.decode_json().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn joins_fragments_with_single_spaces() {
        let cases: &[&[&str]] = &[
            &[],
            &["STOP"],
            &["NO", "PARKING"],
            &["", "a", ""],
            &["Hola mundo", "Hola", "mundo"],
        ];
        for fragments in cases {
            let joined = join_fragments(fragment_stream(fragments)).await.unwrap();
            assert_eq!(joined, fragments.join(" "));
        }
        assert_eq!(join_fragments(fragment_stream(&[])).await.unwrap(), "");
    }

    #[tokio::test]
    async fn stream_error_surfaces() {
        let items: Vec<anyhow::Result<String>> =
            vec![Ok("a".to_string()), Err(anyhow::anyhow!("broken page"))];
        let err = join_fragments(Box::new(futures::stream::iter(items)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "broken page");
    }

    #[tokio::test]
    async fn sign_scenario_publishes_one_request_per_language() {
        let bus = Arc::new(MemoryPublisher::new());
        let state = StateBuilder::new(test_config(&["es", "fr"]))
            .detector(detector_returning("gs://b/sign.jpg", &["STOP"]))
            .publisher(bus.clone())
            .build();

        let report = handle_object_finalized(&state, StorageFinalizeEvent::new("b", "sign.jpg"))
            .await
            .unwrap();

        assert_eq!(report.text, "STOP");
        assert_eq!(report.published, vec!["es", "fr"]);
        assert!(report.failed.is_empty());

        let sent = requests_on(&bus, "translate");
        assert_eq!(
            sent,
            vec![
                TranslationRequest {
                    text: "STOP".to_string(),
                    filename: "sign.jpg".to_string(),
                    lang: "es".to_string(),
                },
                TranslationRequest {
                    text: "STOP".to_string(),
                    filename: "sign.jpg".to_string(),
                    lang: "fr".to_string(),
                },
            ]
        );
        let attrs = &bus.messages("translate")[1].attributes;
        assert_eq!(attrs["text"], "STOP");
        assert_eq!(attrs["filename"], "sign.jpg");
        assert_eq!(attrs["lang"], "fr");
    }

    #[tokio::test]
    async fn fan_out_follows_configured_order() {
        let langs = ["ja", "es", "fr", "en"];
        let bus = Arc::new(MemoryPublisher::new());
        let state = StateBuilder::new(test_config(&langs))
            .detector(detector_returning("gs://image/menu.png", &["Menu", "del", "día"]))
            .publisher(bus.clone())
            .build();

        handle_object_finalized(&state, StorageFinalizeEvent::new("image", "menu.png"))
            .await
            .unwrap();

        let sent = requests_on(&bus, "translate");
        assert_eq!(sent.len(), langs.len());
        for (request, lang) in sent.iter().zip(langs) {
            assert_eq!(request.text, "Menu del día");
            assert_eq!(request.filename, "menu.png");
            assert_eq!(request.lang, lang);
        }
    }

    #[tokio::test]
    async fn image_without_text_still_fans_out_empty_text() {
        let bus = Arc::new(MemoryPublisher::new());
        let state = StateBuilder::new(test_config(&["en"]))
            .detector(detector_returning("gs://b/blank.png", &[]))
            .publisher(bus.clone())
            .build();

        let report = handle_object_finalized(&state, StorageFinalizeEvent::new("b", "blank.png"))
            .await
            .unwrap();

        assert_eq!(report.text, "");
        assert_eq!(requests_on(&bus, "translate")[0].text, "");
    }

    fn publisher_failing_for(lang: &'static str, calls: usize) -> MockPublisher {
        let mut publisher = MockPublisher::new();
        publisher
            .expect_publish()
            .times(calls)
            .returning(move |_, message| {
                if message.attributes["lang"] == lang {
                    Err(anyhow::anyhow!("deadline exceeded"))
                } else {
                    Ok(format!("id-{}", message.attributes["lang"]))
                }
            });
        publisher
    }

    #[tokio::test]
    async fn best_effort_keeps_going_after_a_failed_publish() {
        let state = StateBuilder::new(test_config(&["es", "fr", "ja"]))
            .detector(detector_returning("gs://b/sign.jpg", &["STOP"]))
            .publisher(Arc::new(publisher_failing_for("fr", 3)))
            .build();

        let report = handle_object_finalized(&state, StorageFinalizeEvent::new("b", "sign.jpg"))
            .await
            .unwrap();

        assert_eq!(report.published, vec!["es", "ja"]);
        assert_eq!(report.failed, vec!["fr"]);
    }

    #[tokio::test]
    async fn require_all_fails_after_attempting_every_language() {
        let mut config = test_config(&["es", "fr", "ja"]);
        config.pipeline_config.fanout_policy = FanoutPolicy::RequireAll;
        let state = StateBuilder::new(config)
            .detector(detector_returning("gs://b/sign.jpg", &["STOP"]))
            .publisher(Arc::new(publisher_failing_for("es", 3)))
            .build();

        let err = handle_object_finalized(&state, StorageFinalizeEvent::new("b", "sign.jpg"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::PartialPublish { failed: 1, total: 3 }
        ));
    }

    #[tokio::test]
    async fn ocr_failure_publishes_nothing() {
        let mut detector = MockTextDetector::new();
        detector
            .expect_detect_texts()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("permission denied")));
        let state = StateBuilder::new(test_config(&["es"]))
            .detector(detector)
            .build();

        let err = handle_object_finalized(&state, StorageFinalizeEvent::new("b", "sign.jpg"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Collaborator { service: "vision", .. }
        ));
    }

    #[tokio::test]
    async fn undecodable_push_never_reaches_ocr() {
        let state = StateBuilder::new(test_config(&["es"])).build();

        let err = handle_object_finalized_push(&state, br#"{"bucket":"b"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));

        let err = handle_object_finalized_push(&state, b"<xml/>").await.unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
    }
}

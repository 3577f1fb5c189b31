use serde::{Deserialize, Deserializer, Serialize};

use crate::config_manager::utils::parse_language_list;

/// What Extract does when some of its per-language publishes fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanoutPolicy {
    /// Log the failure and keep going; the invocation still succeeds.
    #[default]
    BestEffort,
    /// Attempt every language, then fail the invocation if any publish failed.
    RequireAll,
}

/// Topics, bucket and languages the three stages work with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub project_id: String,

    /// Ordered list of short language codes Extract fans out to
    #[serde(default, deserialize_with = "deserialize_language_list")]
    pub target_languages: Vec<String>,

    /// Topic Extract publishes translation requests to
    #[serde(default)]
    pub request_topic: String,

    /// Topic Translate publishes translation results to
    #[serde(default)]
    pub result_topic: String,

    /// Bucket Save writes the translated text files into
    #[serde(default)]
    pub result_bucket: String,

    #[serde(default)]
    pub fanout_policy: FanoutPolicy,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LanguageList {
    Joined(String),
    Items(Vec<String>),
}

/// Accepts both `target_languages: "es,fr"` and `target_languages: [es, fr]`
fn deserialize_language_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let langs = match LanguageList::deserialize(deserializer)? {
        LanguageList::Joined(raw) => parse_language_list(&raw),
        LanguageList::Items(items) => parse_language_list(&items.join(",")),
    };
    Ok(langs)
}

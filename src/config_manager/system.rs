use serde::{Deserialize, Serialize};

/// One independently deployable step of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Extract,
    Translate,
    Save,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Extract, Stage::Translate, Stage::Save];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extract => "extract",
            Self::Translate => "translate",
            Self::Save => "save",
        }
    }

    /// Push endpoint the event infrastructure delivers to
    pub fn route(&self) -> &'static str {
        match self {
            Self::Extract => "/extract",
            Self::Translate => "/translate",
            Self::Save => "/save",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "extract" => Some(Self::Extract),
            "translate" => Some(Self::Translate),
            "save" => Some(Self::Save),
            _ => None,
        }
    }
}

/// System configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Stages served by this process. Everything not listed gets no route.
    #[serde(default = "default_stages")]
    pub stages: Vec<Stage>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_stages() -> Vec<Stage> {
    Stage::ALL.to_vec()
}

impl SystemConfig {
    pub fn is_enabled(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            stages: default_stages(),
        }
    }
}

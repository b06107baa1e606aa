use std::env;
use std::path::PathBuf;

use crate::ai::ModelConfig;

pub const DEFAULT_TOPIC_MODEL: &str = "google/gemma-2-9b-it";
pub const DEFAULT_QUIZ_MODEL: &str = "meta-llama/llama-3.1-8b-instruct";
pub const DEFAULT_QUESTION_COUNT: usize = 5;
pub const MAX_QUESTION_COUNT: usize = 20;
pub const DEFAULT_AUDIO_DIR: &str = "audio";
pub const DEFAULT_LOG_FILE: &str = "trivia_debug.log";

/// Models used for each kind of prompt.
#[derive(Debug, Clone)]
pub struct ModelSet {
    /// Wheel topics and custom-topic validation.
    pub topic_model: String,
    /// Questions, grading and explanations.
    pub quiz_model: String,
}

impl ModelSet {
    pub fn topics(&self) -> ModelConfig {
        ModelConfig::new(&self.topic_model)
    }

    pub fn validation(&self) -> ModelConfig {
        ModelConfig::new(&self.topic_model)
            .with_temperature(0.0)
            .with_max_tokens(10)
    }

    pub fn questions(&self) -> ModelConfig {
        ModelConfig::new(&self.quiz_model)
    }

    pub fn grading(&self) -> ModelConfig {
        ModelConfig::new(&self.quiz_model)
            .with_temperature(0.5)
            .with_max_tokens(1)
    }

    pub fn explanation(&self) -> ModelConfig {
        ModelConfig::new(&self.quiz_model)
    }
}

impl Default for ModelSet {
    fn default() -> Self {
        Self {
            topic_model: DEFAULT_TOPIC_MODEL.to_string(),
            quiz_model: DEFAULT_QUIZ_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub models: ModelSet,
    pub questions_per_session: usize,
    pub audio_dir: PathBuf,
    pub sound_enabled: bool,
    pub log_file: PathBuf,
    pub api_key_present: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            models: ModelSet::default(),
            questions_per_session: DEFAULT_QUESTION_COUNT,
            audio_dir: PathBuf::from(DEFAULT_AUDIO_DIR),
            sound_enabled: true,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            api_key_present: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let models = ModelSet {
            topic_model: get("TRIVIA_TOPIC_MODEL").unwrap_or(defaults.models.topic_model),
            quiz_model: get("TRIVIA_QUIZ_MODEL").unwrap_or(defaults.models.quiz_model),
        };

        let questions_per_session = get("TRIVIA_QUESTIONS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .map(|n| n.clamp(1, MAX_QUESTION_COUNT))
            .unwrap_or(DEFAULT_QUESTION_COUNT);

        let sound_enabled = !matches!(
            get("TRIVIA_MUTE").as_deref().map(str::trim),
            Some("1") | Some("true") | Some("yes")
        );

        Self {
            models,
            questions_per_session,
            audio_dir: get("TRIVIA_AUDIO_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.audio_dir),
            sound_enabled,
            log_file: get("TRIVIA_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            api_key_present: get("OPENROUTER_API_KEY").is_some(),
        }
    }
}

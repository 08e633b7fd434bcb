//! Translation of message text into English.
//!
//! Backed by the OpenAI provider from Rig. Any failure yields an empty string;
//! translation is a convenience and never interrupts polling.

use crate::settings::Settings;
use anyhow::Result;
use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers;

pub const DEFAULT_TRANSLATION_MODEL: &str = "gpt-4o-mini";

#[async_trait]
pub trait Translator: Send + Sync {
    /// English rendering of `text`, or an empty string when unavailable.
    async fn translate(&self, text: &str, settings: &Settings) -> String;
}

/// Human name of a language code as used in the prompt.
pub fn language_name(code: &str) -> &'static str {
    match code {
        "zh_CN" => "Mandarin",
        "zh_HK" => "Cantonese",
        _ => "English",
    }
}

/// Whether new messages should be sent for translation at all.
pub fn wants_translation(settings: &Settings) -> bool {
    !settings.openai_api_key.trim().is_empty() && settings.selected_language != "en"
}

fn translation_preamble(language_code: &str) -> String {
    format!(
        "Translate the given {} text into English. ONLY output the translation, no other text.",
        language_name(language_code)
    )
}

pub struct OpenAiTranslator {
    model: String,
}

impl Default for OpenAiTranslator {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSLATION_MODEL)
    }
}

impl OpenAiTranslator {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    async fn request(&self, api_key: &str, language: &str, text: &str) -> Result<String> {
        let client = providers::openai::Client::new(api_key);
        let agent = client
            .agent(&self.model)
            .preamble(&translation_preamble(language))
            .temperature(0.0)
            .build();

        let reply: String = agent.prompt(text).await?;
        Ok(reply.trim().to_string())
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(&self, text: &str, settings: &Settings) -> String {
        if settings.openai_api_key.trim().is_empty() {
            tracing::debug!("no OpenAI key configured, skipping translation");
            return String::new();
        }
        if text.trim().is_empty() {
            return String::new();
        }

        match self
            .request(&settings.openai_api_key, &settings.selected_language, text)
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!("translation failed: {}", err);
                String::new()
            }
        }
    }
}

//! Chat assistant that answers school-life questions through a hosted LLM.
//!
//! The assistant is stateless: each query is answered on its own. Failures
//! never propagate; they turn into a fixed apology.

pub mod gemini;
pub mod transcript;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::Instrument;

use crate::config::AssistantConfig;
use crate::locale;
use crate::secrets::resolve_secret;

pub use gemini::GeminiBackend;
pub use transcript::{ChatMessage, ChatTranscript, MessageSender};

/// Fixed instruction sent with every query.
pub const SYSTEM_INSTRUCTION: &str = "\
당신은 대한민국에 있는 한 고등학교의 교무실 AI 도우미입니다. 학생들의 질문에 항상 친절하고, 명확하고, 간결하게 한국어로 답변해주세요. 학교의 규칙이나 특정 정보에 대해 모를 경우, 교무실에 있는 선생님께 직접 여쭤보라고 안내해주세요.

예시 질문: \"오늘 급식 뭐예요?\"
예시 답변: \"오늘의 급식 메뉴는 학교 홈페이지나 급식 앱에서 확인하는 것이 가장 정확해요! 제가 알려드릴 수 있는 정보가 아니랍니다.\"

예시 질문: \"체육복 어디서 받아요?\"
예시 답변: \"체육복은 보통 1층 학생부실에서 담당 선생님께 받을 수 있어요. 만약 담당 선생님이 안 계시면 교무실에 문의해주세요.\"";

/// Errors from an answer backend.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Upstream response contained no text")]
    EmptyResponse,
}

/// A service that turns a query into free text.
#[async_trait]
pub trait AnswerBackend: Send + Sync {
    async fn generate(&self, system_instruction: &str, query: &str)
        -> Result<String, AssistantError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

#[derive(Clone)]
pub struct ChatAssistant {
    backend: Option<Arc<dyn AnswerBackend>>,
}

impl ChatAssistant {
    pub fn new(backend: Arc<dyn AnswerBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// An assistant with no backend; every answer is the "not configured" notice.
    pub fn unconfigured() -> Self {
        Self { backend: None }
    }

    /// Builds the assistant described by `config`.
    ///
    /// A disabled assistant or a missing API key yields an unconfigured
    /// assistant rather than an error.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, AssistantError> {
        if !config.enabled {
            log::info!("AI assistant disabled by configuration");
            return Ok(Self::unconfigured());
        }

        let api_key = match resolve_secret(
            config.api_key.as_deref(),
            config.api_key_file.as_deref(),
            Some(config.api_key_env.as_str()),
        ) {
            Ok(key) => key,
            Err(e) => {
                log::warn!("API key is not set ({}). AI assistant will not work.", e);
                return Ok(Self::unconfigured());
            }
        };

        let backend = GeminiBackend::new(
            api_key,
            &config.model,
            &config.base_url,
            config.timeout(),
        )?;
        Ok(Self::new(Arc::new(backend)))
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Answers one query. Never fails: problems become fixed messages.
    pub async fn answer(&self, query: &str) -> String {
        let Some(backend) = &self.backend else {
            return locale::ASSISTANT_NOT_CONFIGURED.to_string();
        };

        let span = tracing::info_span!("assistant.answer", backend = backend.name());
        match backend
            .generate(SYSTEM_INSTRUCTION, query)
            .instrument(span)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                log::error!("Error fetching answer from {}: {}", backend.name(), e);
                locale::ASSISTANT_APOLOGY.to_string()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend that returns a canned reply or fails, counting calls.
    pub(crate) struct StubBackend {
        pub reply: Option<String>,
        pub calls: AtomicUsize,
    }

    impl StubBackend {
        pub(crate) fn replying(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AnswerBackend for StubBackend {
        async fn generate(
            &self,
            system_instruction: &str,
            _query: &str,
        ) -> Result<String, AssistantError> {
            assert!(system_instruction.contains("교무실 AI 도우미"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().ok_or(AssistantError::EmptyResponse)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    #[tokio::test]
    async fn test_unconfigured_does_not_call_out() {
        let assistant = ChatAssistant::unconfigured();
        assert!(!assistant.is_configured());
        assert_eq!(
            assistant.answer("체육복 어디서 받아요?").await,
            locale::ASSISTANT_NOT_CONFIGURED
        );
    }

    #[tokio::test]
    async fn test_answer_passes_through() {
        let backend = Arc::new(StubBackend::replying("1층 학생부실이에요."));
        let assistant = ChatAssistant::new(backend.clone());
        assert_eq!(assistant.answer("체육복?").await, "1층 학생부실이에요.");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_becomes_apology_without_retry() {
        let backend = Arc::new(StubBackend::failing());
        let assistant = ChatAssistant::new(backend.clone());
        assert_eq!(assistant.answer("급식?").await, locale::ASSISTANT_APOLOGY);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disabled_config_is_unconfigured() {
        let config = AssistantConfig {
            enabled: false,
            ..AssistantConfig::default()
        };
        assert!(!ChatAssistant::from_config(&config).unwrap().is_configured());
    }

    #[test]
    fn test_direct_key_configures_backend() {
        let config = AssistantConfig {
            api_key: Some("test-key".to_string()),
            ..AssistantConfig::default()
        };
        assert!(ChatAssistant::from_config(&config).unwrap().is_configured());
    }
}

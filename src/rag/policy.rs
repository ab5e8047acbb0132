//! Response policy: grounded answer, small talk, or support fallback

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::matcher::MatchResult;
use crate::errors::Result;
use crate::llm::ChatMessage;
use crate::llm::LanguageModel;
use crate::llm::TenantPrompts;
use crate::tenant::Credential;
use crate::tenant::TenantConfig;

/// Minimum similarity for an answer to be grounded in the matched row
pub const SIM_THRESHOLD: f64 = 0.60;

fn greeting_regex() -> &'static Regex {
    static GREETING_RE: OnceLock<Regex> = OnceLock::new();
    GREETING_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(hi|hello|hey|howdy|good\s?(morning|afternoon|evening)|what'?s up)\b")
            .expect("greeting pattern is valid")
    })
}

/// Case-insensitive, word-bounded greeting detection
pub fn is_greeting(text: &str) -> bool {
    greeting_regex().is_match(text.trim())
}

/// Which of the three answer paths a question takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseBranch {
    Grounded,
    Greeting,
    Fallback,
}

/// Pick the branch. The similarity check always runs before greeting
/// detection.
pub fn choose_branch(score: f64, question: &str) -> ResponseBranch {
    if score >= SIM_THRESHOLD {
        ResponseBranch::Grounded
    } else if is_greeting(question) {
        ResponseBranch::Greeting
    } else {
        ResponseBranch::Fallback
    }
}

/// Single user message asking for an answer from `knowledge` only
pub fn grounded_messages(config: &TenantConfig, question: &str, knowledge: &str) -> Vec<ChatMessage> {
    let values = HashMap::from([
        ("bot_name", config.chatbot_name.as_str()),
        ("brand_name", config.brand_name.as_str()),
        ("knowledge", knowledge),
        ("question", question),
    ]);
    vec![ChatMessage::user(TenantPrompts::grounded().render(&values))]
}

/// Persona system message followed by the user's greeting
pub fn greeting_messages(config: &TenantConfig, question: &str) -> Vec<ChatMessage> {
    let values = HashMap::from([("bot_name", config.chatbot_name.as_str())]);
    vec![
        ChatMessage::system(TenantPrompts::greeting_persona().render(&values)),
        ChatMessage::user(question),
    ]
}

/// Fixed reply pointing at the tenant's support page
pub fn fallback_message(config: &TenantConfig) -> String {
    let values = HashMap::from([("support_url", config.support_url.as_str())]);
    TenantPrompts::fallback().render(&values)
}

/// Turns a match result into the final answer text
#[derive(Clone)]
pub struct ResponsePolicy {
    llm: Arc<dyn LanguageModel>,
}

impl ResponsePolicy {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// Produce the answer for `question`.
    ///
    /// Completion failures propagate; the fallback branch makes no model call.
    pub async fn answer(
        &self,
        credential: &Credential,
        question: &str,
        config: &TenantConfig,
        matched: &MatchResult,
    ) -> Result<(ResponseBranch, String)> {
        let branch = choose_branch(matched.score, question);
        debug!(
            "Client '{}': score {:.3} -> {:?}",
            config.client_id, matched.score, branch
        );

        let answer = match branch {
            ResponseBranch::Grounded => {
                let messages = grounded_messages(config, question, &matched.content);
                self.llm.complete(credential, &messages).await?.trim().to_string()
            }
            ResponseBranch::Greeting => {
                let messages = greeting_messages(config, question);
                self.llm.complete(credential, &messages).await?.trim().to_string()
            }
            ResponseBranch::Fallback => fallback_message(config),
        };

        Ok((branch, answer))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::errors::ConvoError;

    /// Records every completion request and answers with a canned reply
    struct RecordingModel {
        reply: String,
        calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl RecordingModel {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for RecordingModel {
        async fn embed(&self, _: &Credential, _: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0])
        }

        async fn complete(&self, _: &Credential, messages: &[ChatMessage]) -> Result<String> {
            self.calls.lock().unwrap().push(messages.to_vec());
            if self.reply == "<fail>" {
                return Err(ConvoError::LlmError("upstream down".to_string()));
            }
            Ok(self.reply.clone())
        }
    }

    fn acme() -> TenantConfig {
        TenantConfig {
            client_id: "acme".to_string(),
            chatbot_name: "Ava".to_string(),
            brand_name: "Acme".to_string(),
            support_url: "https://acme.test/support".to_string(),
        }
    }

    fn matched(score: f64) -> MatchResult {
        MatchResult {
            content: "Our return window is 30 days".to_string(),
            score,
        }
    }

    #[test]
    fn test_greeting_detection() {
        assert!(is_greeting("Hello there"));
        assert!(is_greeting("HOWDY"));
        assert!(is_greeting("hey there!"));
        assert!(is_greeting("  good morning team"));
        assert!(is_greeting("goodevening"));
        assert!(is_greeting("whats up?"));
        assert!(is_greeting("What's up"));
        assert!(is_greeting("oh hi"));
        assert!(!is_greeting("Hellothere"));
        assert!(!is_greeting("this is not a greeting"));
        assert!(!is_greeting("shipping costs"));
        assert!(!is_greeting(""));
    }

    #[test]
    fn test_branch_order() {
        assert_eq!(choose_branch(0.60, "anything"), ResponseBranch::Grounded);
        assert_eq!(choose_branch(0.95, "hello"), ResponseBranch::Grounded);
        assert_eq!(choose_branch(0.59, "hello"), ResponseBranch::Greeting);
        assert_eq!(choose_branch(0.59, "refund policy"), ResponseBranch::Fallback);
        assert_eq!(choose_branch(-1.0, "refund policy"), ResponseBranch::Fallback);
    }

    #[test]
    fn test_just_below_threshold_is_not_grounded() {
        // Rounds up to the threshold in single precision
        assert_eq!(
            choose_branch(0.599_999_999, "refund policy"),
            ResponseBranch::Fallback
        );
        assert_eq!(
            choose_branch(0.599_999_999, "hello"),
            ResponseBranch::Greeting
        );
    }

    #[test]
    fn test_grounded_prompt_contents() {
        let messages = grounded_messages(&acme(), "How long to return?", "30 days");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
        let prompt = &messages[0].content;
        assert!(prompt.starts_with("You are Ava, the AI assistant for Acme."));
        assert!(prompt.contains("ONLY"));
        assert!(prompt.contains("Knowledge:\n30 days"));
        assert!(prompt.ends_with("User Question: How long to return?\nAnswer:"));
    }

    #[tokio::test]
    async fn test_grounded_branch_trims_reply() {
        let model = RecordingModel::new("  You have 30 days.\n");
        let policy = ResponsePolicy::new(model.clone());

        let (branch, answer) = policy
            .answer(&Credential::new("k"), "returns?", &acme(), &matched(0.82))
            .await
            .unwrap();

        assert_eq!(branch, ResponseBranch::Grounded);
        assert_eq!(answer, "You have 30 days.");
        let calls = model.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0][0].content.contains("Our return window is 30 days"));
    }

    #[tokio::test]
    async fn test_greeting_branch_uses_persona() {
        let model = RecordingModel::new("Hi! How can I help?");
        let policy = ResponsePolicy::new(model.clone());

        let (branch, answer) = policy
            .answer(&Credential::new("k"), "hey there!", &acme(), &matched(0.1))
            .await
            .unwrap();

        assert_eq!(branch, ResponseBranch::Greeting);
        assert_eq!(answer, "Hi! How can I help?");
        let calls = model.calls.lock().unwrap();
        assert_eq!(calls[0][0], ChatMessage::system("You are Ava, a friendly assistant."));
        assert_eq!(calls[0][1], ChatMessage::user("hey there!"));
    }

    #[tokio::test]
    async fn test_fallback_makes_no_model_call() {
        let model = RecordingModel::new("unused");
        let policy = ResponsePolicy::new(model.clone());

        let (branch, answer) = policy
            .answer(
                &Credential::new("k"),
                "what is the meaning of life",
                &acme(),
                &MatchResult::none(),
            )
            .await
            .unwrap();

        assert_eq!(branch, ResponseBranch::Fallback);
        assert_eq!(
            answer,
            "Sorry, I couldn't find that in my knowledge base. Visit: https://acme.test/support"
        );
        assert!(model.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_completion_failure_propagates() {
        let policy = ResponsePolicy::new(RecordingModel::new("<fail>"));
        let err = policy
            .answer(&Credential::new("k"), "returns?", &acme(), &matched(0.9))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvoError::LlmError(_)));
    }
}

//! Render the two-message completion request for a validated contract.
//!
//! Pure and deterministic: the same text and variant always produce the same
//! messages. Truncation to the variant's prompt budget happens here, after
//! validation, so it never changes which validation outcome a text received.

use crate::pipeline::input::ExtractedText;
use crate::prompts::PromptVariant;
use serde::Serialize;
use tracing::debug;

/// Chat role of a request message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One chat message as sent to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Ordered (system, user) pair for one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequestMessages {
    system: Message,
    user: Message,
}

impl AnalysisRequestMessages {
    pub fn system(&self) -> &str {
        &self.system.content
    }

    pub fn user(&self) -> &str {
        &self.user.content
    }

    /// Messages in wire order.
    pub fn as_slice(&self) -> [&Message; 2] {
        [&self.system, &self.user]
    }
}

/// Build the request messages for `text` under `variant`.
pub fn build_messages(text: &ExtractedText, variant: PromptVariant) -> AnalysisRequestMessages {
    let body = match variant.max_prompt_chars() {
        Some(budget) => truncate_chars(text.as_str(), budget),
        None => text.as_str(),
    };

    if body.len() < text.as_str().len() {
        debug!(
            budget = ?variant.max_prompt_chars(),
            original_chars = text.char_count(),
            "contract text truncated for prompt"
        );
    }

    AnalysisRequestMessages {
        system: Message {
            role: Role::System,
            content: variant.system_prompt().to_string(),
        },
        user: Message {
            role: Role::User,
            content: format!("{}\n\n{}", variant.user_preamble(), body),
        },
    }
}

/// Longest prefix of `s` holding at most `max_chars` characters.
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::input::validate_text;

    fn extracted(text: &str) -> ExtractedText {
        validate_text(text.to_string()).unwrap()
    }

    #[test]
    fn construction_messages() {
        let text = extracted(&"The Subcontractor shall be paid within 30 days. ".repeat(3));
        let msgs = build_messages(&text, PromptVariant::ConstructionReview);
        assert!(msgs.system().starts_with("You are a construction industry expert"));
        assert!(msgs
            .user()
            .starts_with("Analyze this construction contract focusing on industry standards"));
        assert!(msgs.user().ends_with(text.as_str()));
    }

    #[test]
    fn wire_order_is_system_then_user() {
        let text = extracted(&"x".repeat(60));
        let msgs = build_messages(&text, PromptVariant::GeneralReview);
        let [first, second] = msgs.as_slice();
        assert_eq!(first.role, Role::System);
        assert_eq!(second.role, Role::User);
    }

    #[test]
    fn general_review_truncates_to_budget() {
        let text = extracted(&"b".repeat(30_000));
        let msgs = build_messages(&text, PromptVariant::GeneralReview);
        let body = msgs
            .user()
            .strip_prefix(PromptVariant::GeneralReview.user_preamble())
            .unwrap()
            .trim_start_matches('\n');
        assert_eq!(body.chars().count(), 20_000);
    }

    #[test]
    fn construction_review_sends_whole_text() {
        let text = extracted(&"c".repeat(45_000));
        let msgs = build_messages(&text, PromptVariant::ConstructionReview);
        assert!(msgs.user().ends_with(&"c".repeat(45_000)));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("ééé", 2), "éé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn deterministic() {
        let text = extracted(&"Payment is due upon completion of all work. ".repeat(2));
        assert_eq!(
            build_messages(&text, PromptVariant::ACTIVE),
            build_messages(&text, PromptVariant::ACTIVE)
        );
    }

    #[test]
    fn message_serialises_with_lowercase_role() {
        let m = Message {
            role: Role::System,
            content: "hi".into(),
        };
        assert_eq!(
            serde_json::to_value(&m).unwrap(),
            serde_json::json!({ "role": "system", "content": "hi" })
        );
    }
}

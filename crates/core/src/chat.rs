use crate::api::GrowApi;
use crate::domain::financial::FinancialRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Advisor conversation. The whole history, system context included, is
/// posted on every turn.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    pub error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Ignored,
    Replied,
    Failed,
}

impl Conversation {
    /// Conversation primed with the advisor role and the user's latest
    /// financial entry.
    pub fn seeded(latest: &FinancialRecord) -> anyhow::Result<Self> {
        Ok(Self {
            messages: vec![ChatMessage::new(Role::System, system_prompt(latest)?)],
            ..Default::default()
        })
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }

    pub async fn send(&mut self, api: &dyn GrowApi, input: &str) -> SendOutcome {
        if input.trim().is_empty() {
            return SendOutcome::Ignored;
        }

        self.messages.push(ChatMessage::new(Role::User, input));
        self.error = false;

        match api.chat(&self.messages).await {
            Ok(reply) => {
                self.messages.push(ChatMessage::new(Role::Assistant, reply));
                SendOutcome::Replied
            }
            Err(err) => {
                tracing::error!(error = %err, turns = self.messages.len(), "advisor chat request failed");
                self.error = true;
                SendOutcome::Failed
            }
        }
    }
}

fn system_prompt(latest: &FinancialRecord) -> anyhow::Result<String> {
    let data = serde_json::to_string_pretty(latest)?;
    Ok([
        "You are an expert Business Cost Planning and Financial Advisory Assistant.",
        "If the user just greets you, greet them back with a short introduction and nothing else.",
        "Respond strictly as a professional business consultant, focusing only on cost planning, budgeting, financial strategy, and optimization. Avoid unrelated discussions.",
        "",
        "Here is the user's financial data:",
        &data,
        "",
        "Analyze this data and provide actionable business advice on cost management, revenue optimization, and financial efficiency.",
    ]
    .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RevenuePrediction;
    use crate::domain::financial::UserRecord;
    use crate::report::ReportRequest;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedAdvisor {
        seen: Mutex<Vec<Vec<ChatMessage>>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl GrowApi for ScriptedAdvisor {
        async fn user_data(&self, _uid: &str) -> anyhow::Result<Vec<UserRecord>> {
            unreachable!()
        }

        async fn save_record(&self, _uid: &str, _record: &FinancialRecord) -> anyhow::Result<()> {
            unreachable!()
        }

        async fn predict_revenue(&self, _uid: &str) -> anyhow::Result<RevenuePrediction> {
            unreachable!()
        }

        async fn chat(&self, history: &[ChatMessage]) -> anyhow::Result<String> {
            self.seen.lock().unwrap().push(history.to_vec());
            if self.fail {
                anyhow::bail!("advisor offline");
            }
            Ok(format!("reply #{}", history.len()))
        }

        async fn request_report(&self, _request: &ReportRequest) -> anyhow::Result<()> {
            unreachable!()
        }
    }

    fn record() -> FinancialRecord {
        FinancialRecord {
            annual_revenue: 120000.0,
            monthly_budget: 8000.0,
            recurring_expenses: 3000.0,
            savings: 15000.0,
            timestamp: None,
            industry: None,
        }
    }

    #[test]
    fn seeded_context_embeds_financial_data() {
        let conv = Conversation::seeded(&record()).unwrap();
        assert_eq!(conv.messages().len(), 1);
        assert_eq!(conv.messages()[0].role, Role::System);
        assert!(conv.messages()[0].content.contains("\"annual_revenue\": 120000.0"));
    }

    #[tokio::test]
    async fn blank_input_makes_no_request() {
        let api = ScriptedAdvisor::default();
        let mut conv = Conversation::seeded(&record()).unwrap();
        assert_eq!(conv.send(&api, "   \n").await, SendOutcome::Ignored);
        assert!(api.seen.lock().unwrap().is_empty());
        assert_eq!(conv.messages().len(), 1);
    }

    #[tokio::test]
    async fn reply_is_appended_after_user_turn() {
        let api = ScriptedAdvisor::default();
        let mut conv = Conversation::seeded(&record()).unwrap();

        assert_eq!(conv.send(&api, "hello").await, SendOutcome::Replied);
        assert_eq!(conv.last_reply(), Some("reply #2"));
        assert_eq!(conv.send(&api, "cut costs?").await, SendOutcome::Replied);
        assert_eq!(conv.last_reply(), Some("reply #4"));

        let seen = api.seen.lock().unwrap();
        assert_eq!(seen[1].len(), 4);
        assert_eq!(seen[1][3], ChatMessage::new(Role::User, "cut costs?"));
    }

    #[tokio::test]
    async fn failure_keeps_user_message_and_sets_flag() {
        let api = ScriptedAdvisor {
            fail: true,
            ..Default::default()
        };
        let mut conv = Conversation::seeded(&record()).unwrap();
        assert_eq!(conv.send(&api, "hello").await, SendOutcome::Failed);
        assert!(conv.error);
        assert_eq!(conv.messages().last().map(|m| m.role), Some(Role::User));
        assert_eq!(conv.last_reply(), None);
    }
}

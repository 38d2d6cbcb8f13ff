use crate::api::http::JsonHttp;
use crate::api::{GrowApi, RevenuePrediction};
use crate::chat::ChatMessage;
use crate::config::Settings;
use crate::domain::financial::{FinancialRecord, UserRecord};
use crate::report::ReportRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct HttpGrowClient {
    http: JsonHttp,
}

impl HttpGrowClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(settings.require_api_url()?, settings)
    }

    pub fn new(base_url: &str, settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            http: JsonHttp::new(base_url, settings.http_timeout)?,
        })
    }
}

#[derive(Debug, Serialize)]
struct UidRequest<'a> {
    uid: &'a str,
}

/// `/login` body: the record's fields plus the owner, with the industry
/// cleared.
#[derive(Debug, Serialize)]
struct SaveRecordRequest<'a> {
    annual_revenue: f64,
    monthly_budget: f64,
    recurring_expenses: f64,
    savings: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
    uid: &'a str,
    industry: &'static str,
}

impl<'a> SaveRecordRequest<'a> {
    fn new(uid: &'a str, record: &FinancialRecord) -> Self {
        Self {
            annual_revenue: record.annual_revenue,
            monthly_budget: record.monthly_budget,
            recurring_expenses: record.recurring_expenses,
            savings: record.savings,
            timestamp: record.timestamp,
            uid,
            industry: "",
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserDataResponse {
    #[serde(default)]
    message: Option<Vec<UserRecord>>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    chat_history: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Ack {}

#[async_trait::async_trait]
impl GrowApi for HttpGrowClient {
    async fn user_data(&self, uid: &str) -> anyhow::Result<Vec<UserRecord>> {
        let res: UserDataResponse = self.http.post("/userData", &UidRequest { uid }).await?;
        Ok(res.message.unwrap_or_default())
    }

    async fn save_record(&self, uid: &str, record: &FinancialRecord) -> anyhow::Result<()> {
        let _: Ack = self
            .http
            .post("/login", &SaveRecordRequest::new(uid, record))
            .await?;
        tracing::info!(uid, "saved financial record");
        Ok(())
    }

    async fn predict_revenue(&self, uid: &str) -> anyhow::Result<RevenuePrediction> {
        self.http.post("/predictRevenue", &UidRequest { uid }).await
    }

    async fn chat(&self, history: &[ChatMessage]) -> anyhow::Result<String> {
        let res: ChatResponse = self
            .http
            .post(
                "/chatBot",
                &ChatRequest {
                    chat_history: history,
                },
            )
            .await?;
        Ok(res.message)
    }

    async fn request_report(&self, request: &ReportRequest) -> anyhow::Result<()> {
        let _: Ack = self.http.post("/pdfGenerator", request).await?;
        Ok(())
    }
}

pub mod build;
pub mod error;
pub mod grow;
pub mod http;

use crate::chat::ChatMessage;
use crate::domain::financial::{FinancialRecord, UserRecord};
use crate::domain::schedule::{MeetingConfirmation, Schedule, ScheduleForm};
use crate::domain::vc::VentureCapitalist;
use crate::report::ReportRequest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Revenue forecast as returned by `/predictRevenue`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenuePrediction {
    #[serde(default)]
    pub revenue: BTreeMap<String, f64>,
    #[serde(default)]
    pub profit_margin: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VcAvailability {
    pub vc_name: String,
    #[serde(default)]
    pub schedule: Schedule,
}

/// Per-user financial backend: records, forecasts, advisor chat, reports.
#[async_trait::async_trait]
pub trait GrowApi: Send + Sync {
    async fn user_data(&self, uid: &str) -> anyhow::Result<Vec<UserRecord>>;

    /// Appends a financial entry for `uid`.
    async fn save_record(&self, uid: &str, record: &FinancialRecord) -> anyhow::Result<()>;

    async fn predict_revenue(&self, uid: &str) -> anyhow::Result<RevenuePrediction>;

    async fn chat(&self, history: &[ChatMessage]) -> anyhow::Result<String>;

    async fn request_report(&self, request: &ReportRequest) -> anyhow::Result<()>;
}

/// Founder-facing backend: VC directory, meeting booking, market research.
#[async_trait::async_trait]
pub trait BuildApi: Send + Sync {
    async fn list_vcs(&self) -> anyhow::Result<Vec<VentureCapitalist>>;

    async fn get_vc(&self, id: u64) -> anyhow::Result<VentureCapitalist>;

    async fn availability(&self, id: u64) -> anyhow::Result<VcAvailability>;

    async fn schedule_meeting(
        &self,
        id: u64,
        form: &ScheduleForm,
    ) -> anyhow::Result<MeetingConfirmation>;

    async fn market_research(&self, input: &str) -> anyhow::Result<String>;
}

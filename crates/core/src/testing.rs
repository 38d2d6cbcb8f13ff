//! In-memory API doubles for unit tests.

use crate::api::{BuildApi, GrowApi, RevenuePrediction, VcAvailability};
use crate::chat::ChatMessage;
use crate::domain::financial::{FinancialRecord, UserRecord};
use crate::domain::schedule::{MeetingConfirmation, ScheduleForm};
use crate::domain::vc::VentureCapitalist;
use crate::report::ReportRequest;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct FakeBuildApi {
    pub vcs: Vec<VentureCapitalist>,
    pub fail: bool,
    pub research_calls: AtomicUsize,
    pub research_reply: Option<String>,
}

impl FakeBuildApi {
    pub fn with_directory() -> Self {
        let vcs = serde_json::from_str(
            r#"[
                {"id": 1, "name": "Asha Rao", "company": "Blume", "photo": "", "experience": "12 years",
                 "domain": ["Fintech", "SaaS"], "bio": "",
                 "schedule": {"2025-03-12": {"10:00": true, "11:00": false}, "2025-03-10": {"09:00": true}}},
                {"id": 2, "name": "Vikram Shah", "company": "Accel", "photo": "", "experience": "8 years",
                 "domain": ["HealthTech"], "bio": "",
                 "schedule": {"2025-04-01": {"16:00": true}}}
            ]"#,
        )
        .expect("fixture parses");
        Self {
            vcs,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn find(&self, id: u64) -> anyhow::Result<&VentureCapitalist> {
        anyhow::ensure!(!self.fail, "directory offline");
        self.vcs
            .iter()
            .find(|vc| vc.id == id)
            .ok_or_else(|| anyhow::anyhow!("VC not found"))
    }
}

#[async_trait::async_trait]
impl BuildApi for FakeBuildApi {
    async fn list_vcs(&self) -> anyhow::Result<Vec<VentureCapitalist>> {
        anyhow::ensure!(!self.fail, "directory offline");
        // Listings carry no schedules.
        Ok(self
            .vcs
            .iter()
            .cloned()
            .map(|mut vc| {
                vc.schedule = Default::default();
                vc
            })
            .collect())
    }

    async fn get_vc(&self, id: u64) -> anyhow::Result<VentureCapitalist> {
        self.find(id).cloned()
    }

    async fn availability(&self, id: u64) -> anyhow::Result<VcAvailability> {
        let vc = self.find(id)?;
        Ok(VcAvailability {
            vc_name: vc.name.clone(),
            schedule: vc.schedule.clone(),
        })
    }

    async fn schedule_meeting(
        &self,
        id: u64,
        form: &ScheduleForm,
    ) -> anyhow::Result<MeetingConfirmation> {
        let vc = self.find(id)?;
        anyhow::ensure!(id != 2, "Selected time slot is not available");
        Ok(MeetingConfirmation {
            meeting_id: format!(
                "MTG_{id}_{}_{}",
                form.date.replace('-', ""),
                form.time_slot.replace(':', "")
            ),
            vc_name: vc.name.clone(),
            date: form.date.clone(),
            time_slot: form.time_slot.clone(),
            startup_name: form.startup_name.clone(),
            founder_name: form.founder_name.clone(),
            email: form.email.clone(),
            pitch_summary: form.pitch_summary.clone(),
        })
    }

    async fn market_research(&self, _input: &str) -> anyhow::Result<String> {
        self.research_calls.fetch_add(1, Ordering::SeqCst);
        anyhow::ensure!(!self.fail, "research offline");
        Ok(self.research_reply.clone().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeGrowApi {
    pub records: serde_json::Value,
    pub prediction: Option<RevenuePrediction>,
    pub fail: bool,
    pub saves: AtomicUsize,
    pub reports: AtomicUsize,
}

impl FakeGrowApi {
    pub fn with_history() -> Self {
        Self {
            records: json!([
                {"industry": "Retail"},
                {"annual_revenue": 100000, "monthly_budget": 6000, "recurring_expenses": 2500, "savings": 9000, "timestamp": 1704067200},
                {"annual_revenue": 120000, "monthly_budget": 7000, "recurring_expenses": 2600, "savings": 12000, "timestamp": 1735689600}
            ]),
            prediction: Some(RevenuePrediction {
                revenue: [("2026", 120000.0), ("2025", 100000.0), ("2027", 150000.0)]
                    .into_iter()
                    .map(|(y, r)| (y.to_string(), r))
                    .collect(),
                profit_margin: Some(18.5),
            }),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait::async_trait]
impl GrowApi for FakeGrowApi {
    async fn user_data(&self, _uid: &str) -> anyhow::Result<Vec<UserRecord>> {
        anyhow::ensure!(!self.fail, "backend offline");
        if self.records.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(self.records.clone())?)
    }

    async fn save_record(&self, _uid: &str, _record: &FinancialRecord) -> anyhow::Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        anyhow::ensure!(!self.fail, "backend offline");
        Ok(())
    }

    async fn predict_revenue(&self, _uid: &str) -> anyhow::Result<RevenuePrediction> {
        anyhow::ensure!(!self.fail, "backend offline");
        Ok(self.prediction.clone().unwrap_or_default())
    }

    async fn chat(&self, history: &[ChatMessage]) -> anyhow::Result<String> {
        anyhow::ensure!(!self.fail, "backend offline");
        Ok(format!("{} messages received", history.len()))
    }

    async fn request_report(&self, _request: &ReportRequest) -> anyhow::Result<()> {
        anyhow::ensure!(!self.fail, "backend offline");
        self.reports.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

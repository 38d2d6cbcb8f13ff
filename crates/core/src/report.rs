use crate::api::GrowApi;
use crate::chat::{ChatMessage, Role};
use crate::domain::financial::{select_snapshot, FinancialRecord};
use crate::session::CurrentUser;
use anyhow::Context;
use serde::Serialize;

/// Body of a `/pdfGenerator` call. The service renders the PDF and mails it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRequest {
    pub mail: Option<String>,
    pub prompt: Vec<ChatMessage>,
    pub uname: Option<String>,
}

impl ReportRequest {
    pub fn new(
        session: &dyn CurrentUser,
        latest: Option<&FinancialRecord>,
        prompt: &str,
    ) -> anyhow::Result<Self> {
        let Some(user) = session.current_user() else {
            anyhow::bail!("user not authenticated");
        };

        Ok(Self {
            mail: user.email,
            prompt: vec![
                ChatMessage::new(Role::System, report_template(latest)),
                ChatMessage::new(Role::User, prompt),
            ],
            uname: user.display_name,
        })
    }
}

pub async fn request_report(
    api: &dyn GrowApi,
    session: &dyn CurrentUser,
    latest: Option<&FinancialRecord>,
    prompt: &str,
) -> anyhow::Result<()> {
    let request = ReportRequest::new(session, latest, prompt)?;
    api.request_report(&request).await?;
    tracing::info!(mail = ?request.mail, "report generation requested");
    Ok(())
}

/// Requests a report on the user's latest stored entry. A failed record fetch
/// aborts; no report is requested with an empty overview.
pub async fn report_latest(
    api: &dyn GrowApi,
    session: &dyn CurrentUser,
    prompt: &str,
) -> anyhow::Result<()> {
    let Some(user) = session.current_user() else {
        anyhow::bail!("user not authenticated");
    };
    let records = api
        .user_data(&user.id)
        .await
        .context("failed to load financial data for the report")?;
    let snapshot = select_snapshot(&records);
    request_report(api, session, snapshot.latest.as_ref(), prompt).await
}

fn report_template(latest: Option<&FinancialRecord>) -> String {
    let cell = |value: Option<f64>| match value {
        Some(v) if v != 0.0 => format!("{v}"),
        _ => "N/A".to_string(),
    };

    let revenue = cell(latest.map(|r| r.annual_revenue));
    let expenses = cell(latest.map(|r| r.recurring_expenses));
    let budget = cell(latest.map(|r| r.monthly_budget));
    let savings = cell(latest.map(|r| r.savings));

    format!(
        "Do not give anything except the report data. You are Arthashastra, an AI-driven Business Cost Planner.\n\
Generate a structured, professional financial report from the user's financial data, formatted for direct conversion into a PDF.\n\
\n\
# Business Financial Report\n\
\n\
## Financial Overview\n\
\n\
| Metric | Value ($) |\n\
|---|---|\n\
| Annual Revenue | {revenue} |\n\
| Recurring Expenses | {expenses} |\n\
| Monthly Budget | {budget} |\n\
| Savings | {savings} |\n\
\n\
## Cost Optimization Strategies\n\
## Profitability Forecast\n\
## Risk Management Insights\n\
## Actionable Recommendations\n\
## Final Notes\n"
    )
}

use crate::api::GrowApi;
use crate::chat::Conversation;
use crate::domain::financial::{industry_of, select_snapshot, FinancialRecord, FinancialSnapshot};
use crate::domain::metrics::{
    classify_margin, growth, margin_split, revenue_series, Growth, MarginClass, RevenuePoint,
    Trend,
};
use crate::session::CurrentUser;
use serde::Serialize;
use std::future::Future;
use tokio::sync::watch;

const UNSPECIFIED_INDUSTRY: &str = "Not Specified";

/// Owner side of a view's lifetime. Dropping it tears the view down.
#[derive(Debug)]
pub struct Scope {
    tx: watch::Sender<bool>,
}

/// Observer side handed to loaders.
#[derive(Debug, Clone)]
pub struct Teardown {
    rx: watch::Receiver<bool>,
}

impl Scope {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn teardown(&self) -> Teardown {
        Teardown {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.tx.send_replace(true);
    }
}

impl Teardown {
    pub fn is_torn_down(&self) -> bool {
        *self.rx.borrow()
    }

    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        // A closed channel means the scope is gone too.
        let _ = rx.wait_for(|down| *down).await;
    }
}

/// Runs `fut` unless the owning view is torn down first.
pub async fn guarded<F: Future>(teardown: Option<&Teardown>, fut: F) -> Option<F::Output> {
    let Some(teardown) = teardown else {
        return Some(fut.await);
    };
    if teardown.is_torn_down() {
        return None;
    }
    tokio::select! {
        out = fut => Some(out),
        _ = teardown.wait() => {
            tracing::debug!("view torn down; dropping in-flight request");
            None
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardView {
    pub signed_in: bool,
    pub error: bool,
    pub snapshot: FinancialSnapshot,
    pub industry: String,
}

impl DashboardView {
    pub fn has_data(&self) -> bool {
        self.snapshot.has_data()
    }
}

pub async fn load_dashboard(
    api: &dyn GrowApi,
    session: &dyn CurrentUser,
    teardown: Option<&Teardown>,
) -> Option<DashboardView> {
    let Some(user) = session.current_user() else {
        return Some(DashboardView::default());
    };

    let result = guarded(teardown, api.user_data(&user.id)).await?;
    let mut view = DashboardView {
        signed_in: true,
        ..Default::default()
    };

    match result {
        Ok(records) => {
            view.snapshot = select_snapshot(&records);
            view.industry = industry_of(&records)
                .unwrap_or(UNSPECIFIED_INDUSTRY)
                .to_string();
            if !view.has_data() {
                tracing::info!(uid = %user.id, records = records.len(), "no financial data for user");
            }
        }
        Err(err) => {
            tracing::error!(uid = %user.id, error = %err, "failed to load user data");
            view.error = true;
        }
    }

    Some(view)
}

/// Profile page state: the latest entry as an editable draft, plus the
/// older entries newest first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileView {
    pub signed_in: bool,
    pub error: bool,
    pub draft: Option<FinancialRecord>,
    pub history: Vec<FinancialRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSave {
    /// No signed-in user or nothing to save; no request was made.
    Incomplete,
    Saved,
    Failed,
}

pub async fn load_profile(
    api: &dyn GrowApi,
    session: &dyn CurrentUser,
    teardown: Option<&Teardown>,
) -> Option<ProfileView> {
    let Some(user) = session.current_user() else {
        return Some(ProfileView::default());
    };

    let result = guarded(teardown, api.user_data(&user.id)).await?;
    let mut view = ProfileView {
        signed_in: true,
        ..Default::default()
    };

    match result {
        Ok(records) => {
            let snapshot = select_snapshot(&records);
            view.draft = snapshot.latest;
            view.history = snapshot.history;
        }
        Err(err) => {
            tracing::error!(uid = %user.id, error = %err, "failed to load profile data");
            view.error = true;
        }
    }

    Some(view)
}

/// Posts the edited draft as a new entry. On success the draft is also
/// prepended to the history.
pub async fn save_profile(
    api: &dyn GrowApi,
    session: &dyn CurrentUser,
    view: &mut ProfileView,
) -> ProfileSave {
    let (Some(user), Some(draft)) = (session.current_user(), view.draft.as_ref()) else {
        tracing::debug!("profile save skipped; user or draft missing");
        return ProfileSave::Incomplete;
    };

    match api.save_record(&user.id, draft).await {
        Ok(()) => {
            view.error = false;
            view.history.insert(0, draft.clone());
            ProfileSave::Saved
        }
        Err(err) => {
            tracing::error!(uid = %user.id, error = %err, "failed to save profile data");
            view.error = true;
            ProfileSave::Failed
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsView {
    pub signed_in: bool,
    pub error: bool,
    pub series: Vec<RevenuePoint>,
    pub growth: Growth,
    pub trend: Option<Trend>,
    pub profit_margin: Option<f64>,
    pub margin_class: MarginClass,
    pub margin_split: Option<(f64, f64)>,
}

impl Default for AnalyticsView {
    fn default() -> Self {
        Self {
            signed_in: false,
            error: false,
            series: Vec::new(),
            growth: Growth::Percent(0.0),
            trend: None,
            profit_margin: None,
            margin_class: MarginClass::NotAvailable,
            margin_split: None,
        }
    }
}

pub async fn load_analytics(
    api: &dyn GrowApi,
    session: &dyn CurrentUser,
    teardown: Option<&Teardown>,
) -> Option<AnalyticsView> {
    let Some(user) = session.current_user() else {
        return Some(AnalyticsView::default());
    };

    let result = guarded(teardown, api.predict_revenue(&user.id)).await?;
    let mut view = AnalyticsView {
        signed_in: true,
        ..Default::default()
    };

    match result {
        Ok(prediction) => {
            view.series = revenue_series(&prediction.revenue);
            view.growth = growth(&view.series);
            view.trend = view.growth.trend();
            view.profit_margin = prediction.profit_margin;
            view.margin_class = classify_margin(prediction.profit_margin);
            view.margin_split = prediction.profit_margin.map(margin_split);
            if view.growth == Growth::Indeterminate {
                tracing::warn!(uid = %user.id, "first forecast year has zero revenue; growth indeterminate");
            }
        }
        Err(err) => {
            tracing::error!(uid = %user.id, error = %err, "failed to load revenue prediction");
            view.error = true;
        }
    }

    Some(view)
}

/// Advisor page state: the conversation exists only once the user has
/// financial data to seed it with.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdvisorView {
    pub signed_in: bool,
    pub error: bool,
    pub conversation: Option<Conversation>,
}

pub async fn load_advisor(
    api: &dyn GrowApi,
    session: &dyn CurrentUser,
    teardown: Option<&Teardown>,
) -> Option<AdvisorView> {
    let Some(user) = session.current_user() else {
        return Some(AdvisorView::default());
    };

    let result = guarded(teardown, api.user_data(&user.id)).await?;
    let mut view = AdvisorView {
        signed_in: true,
        ..Default::default()
    };

    let seeded = result.and_then(|records| match select_snapshot(&records).latest {
        Some(latest) => Conversation::seeded(&latest).map(Some),
        None => Ok(None),
    });
    match seeded {
        Ok(conversation) => view.conversation = conversation,
        Err(err) => {
            tracing::error!(uid = %user.id, error = %err, "failed to prepare advisor context");
            view.error = true;
        }
    }

    Some(view)
}

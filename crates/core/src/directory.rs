use crate::api::BuildApi;
use crate::domain::schedule::{
    flatten_available_slots, AvailableSlot, MeetingConfirmation, ScheduleForm,
};
use crate::domain::vc::{self, VentureCapitalist};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DirectoryState {
    Listing,
    Detail {
        vc: VentureCapitalist,
    },
    Scheduling {
        vc: VentureCapitalist,
        form: ScheduleForm,
    },
}

/// VC directory page: listing, one selected VC, and the booking draft over
/// that VC. The listing survives navigation into and out of the detail.
pub struct Directory<C> {
    api: C,
    vcs: Vec<VentureCapitalist>,
    state: DirectoryState,
    loading: bool,
    error: bool,
}

impl<C: BuildApi> Directory<C> {
    pub fn new(api: C) -> Self {
        Self {
            api,
            vcs: Vec::new(),
            state: DirectoryState::Listing,
            loading: false,
            error: false,
        }
    }

    pub fn state(&self) -> &DirectoryState {
        &self.state
    }

    pub fn vcs(&self) -> &[VentureCapitalist] {
        &self.vcs
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn selected(&self) -> Option<&VentureCapitalist> {
        match &self.state {
            DirectoryState::Listing => None,
            DirectoryState::Detail { vc } | DirectoryState::Scheduling { vc, .. } => Some(vc),
        }
    }

    /// Available slots of the selected VC, in schedule order.
    pub fn available_slots(&self) -> Vec<AvailableSlot> {
        self.selected()
            .map(|vc| flatten_available_slots(&vc.schedule))
            .unwrap_or_default()
    }

    pub fn draft_mut(&mut self) -> Option<&mut ScheduleForm> {
        match &mut self.state {
            DirectoryState::Scheduling { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn filter_by_domain(&self, domain: &str) -> Vec<&VentureCapitalist> {
        vc::filter_by_domain(&self.vcs, domain)
    }

    pub fn search(&self, query: &str) -> Vec<&VentureCapitalist> {
        vc::search(&self.vcs, query)
    }

    pub fn domains(&self) -> BTreeSet<String> {
        vc::domains(&self.vcs)
    }

    /// Fetches the listing. On failure the listing is emptied and the page
    /// stays in `Listing`.
    pub async fn load(&mut self) {
        self.loading = true;
        self.error = false;

        match self.api.list_vcs().await {
            Ok(vcs) => {
                tracing::debug!(count = vcs.len(), "vc directory loaded");
                self.vcs = vcs;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load vc directory");
                self.vcs = Vec::new();
                self.state = DirectoryState::Listing;
                self.error = true;
            }
        }

        self.loading = false;
    }

    /// Listing -> Detail once the VC has been fetched by id.
    pub async fn select(&mut self, id: u64) -> bool {
        if !matches!(self.state, DirectoryState::Listing) {
            tracing::debug!(id, "select ignored outside listing");
            return false;
        }

        self.loading = true;
        self.error = false;
        let selected = match self.api.get_vc(id).await {
            Ok(vc) => {
                self.state = DirectoryState::Detail { vc };
                true
            }
            Err(err) => {
                tracing::error!(id, error = %err, "failed to load vc details");
                self.error = true;
                false
            }
        };
        self.loading = false;
        selected
    }

    /// Detail -> Listing.
    pub fn back(&mut self) -> bool {
        if matches!(self.state, DirectoryState::Detail { .. }) {
            self.state = DirectoryState::Listing;
            self.error = false;
            true
        } else {
            tracing::debug!("back ignored outside detail");
            false
        }
    }

    /// Detail -> Scheduling with the slot pre-filled into a fresh draft.
    pub fn open_scheduling(&mut self, slot: &AvailableSlot) -> bool {
        let state = std::mem::replace(&mut self.state, DirectoryState::Listing);
        match state {
            DirectoryState::Detail { vc } => {
                self.state = DirectoryState::Scheduling {
                    vc,
                    form: ScheduleForm::for_slot(slot),
                };
                true
            }
            other => {
                tracing::debug!("open_scheduling ignored outside detail");
                self.state = other;
                false
            }
        }
    }

    /// Scheduling -> Detail, discarding the draft.
    pub fn cancel(&mut self) -> bool {
        let state = std::mem::replace(&mut self.state, DirectoryState::Listing);
        match state {
            DirectoryState::Scheduling { vc, .. } => {
                self.state = DirectoryState::Detail { vc };
                self.error = false;
                true
            }
            other => {
                tracing::debug!("cancel ignored outside scheduling");
                self.state = other;
                false
            }
        }
    }

    /// Sends the draft. Success returns to Detail; failure keeps the draft.
    pub async fn submit(&mut self) -> Option<MeetingConfirmation> {
        let (id, form) = match &self.state {
            DirectoryState::Scheduling { vc, form } => (vc.id, form.clone()),
            _ => {
                tracing::debug!("submit ignored outside scheduling");
                return None;
            }
        };

        self.loading = true;
        self.error = false;
        let result = self.api.schedule_meeting(id, &form).await;
        self.loading = false;

        match result {
            Ok(confirmation) => {
                tracing::info!(vc_id = id, meeting_id = %confirmation.meeting_id, "meeting scheduled");
                self.cancel();
                Some(confirmation)
            }
            Err(err) => {
                tracing::error!(vc_id = id, error = %err, "failed to schedule meeting");
                self.error = true;
                None
            }
        }
    }
}

use serde::{Deserialize, Serialize};

/// Identity of the signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Source of the signed-in user. Authentication itself happens elsewhere.
pub trait CurrentUser: Send + Sync {
    fn current_user(&self) -> Option<UserProfile>;
}

/// A fixed session, e.g. from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct StaticSession(pub Option<UserProfile>);

impl StaticSession {
    pub fn signed_in(id: impl Into<String>) -> Self {
        Self(Some(UserProfile {
            id: id.into(),
            email: None,
            display_name: None,
        }))
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        if let Some(profile) = self.0.as_mut() {
            profile.email = Some(email.into());
        }
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        if let Some(profile) = self.0.as_mut() {
            profile.display_name = Some(name.into());
        }
        self
    }
}

impl CurrentUser for StaticSession {
    fn current_user(&self) -> Option<UserProfile> {
        self.0.clone()
    }
}

//! Process-wide access credential, modeled as an explicit injectable session
//! context instead of an ambient singleton.
//!
//! The sign-in flow is an external collaborator: it hands a bearer token to
//! this service, which only ever reads it. Store code snapshots the
//! credential once at request start and never assumes it is stable for the
//! request's duration.

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::{Arc, RwLock};

/// Bearer token for the spreadsheet API. Debug output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Credential lifecycle: `Unset → Pending → Active → Expired`.
#[derive(Clone, Debug, PartialEq)]
enum CredentialState {
    Unset,
    Pending,
    Active {
        token: AccessToken,
        expires_at: Option<DateTime<Utc>>,
    },
    Expired,
}

/// Reported lifecycle phase, with expiry already applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CredentialPhase {
    Unset,
    Pending,
    Active,
    Expired,
}

#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<RwLock<CredentialState>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(CredentialState::Unset)),
        }
    }

    /// Marks a sign-in as in flight. Requests issued now still see no
    /// credential.
    pub fn begin_sign_in(&self) {
        *self.inner.write().expect("session lock poisoned") = CredentialState::Pending;
    }

    /// Installs a fresh credential, optionally with a lifetime in seconds.
    pub fn activate(&self, token: AccessToken, expires_in_secs: Option<i64>) {
        let expires_at = expires_in_secs.map(|secs| Utc::now() + Duration::seconds(secs));
        *self.inner.write().expect("session lock poisoned") =
            CredentialState::Active { token, expires_at };
    }

    pub fn expire(&self) {
        *self.inner.write().expect("session lock poisoned") = CredentialState::Expired;
    }

    pub fn clear(&self) {
        *self.inner.write().expect("session lock poisoned") = CredentialState::Unset;
    }

    /// Credential snapshot for one request. An `Active` credential past its
    /// expiry snapshots as absent; the stored state flips to `Expired` on the
    /// next mutation or phase report, not here.
    pub fn snapshot(&self) -> Option<AccessToken> {
        match &*self.inner.read().expect("session lock poisoned") {
            CredentialState::Active { token, expires_at } => match expires_at {
                Some(when) if *when <= Utc::now() => None,
                _ => Some(token.clone()),
            },
            _ => None,
        }
    }

    pub fn phase(&self) -> CredentialPhase {
        let mut state = self.inner.write().expect("session lock poisoned");
        if let CredentialState::Active {
            expires_at: Some(when),
            ..
        } = &*state
        {
            if *when <= Utc::now() {
                *state = CredentialState::Expired;
            }
        }
        match &*state {
            CredentialState::Unset => CredentialPhase::Unset,
            CredentialState::Pending => CredentialPhase::Pending,
            CredentialState::Active { .. } => CredentialPhase::Active,
            CredentialState::Expired => CredentialPhase::Expired,
        }
    }
}

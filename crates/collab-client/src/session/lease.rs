//! Reference-counted session ownership

use super::RealtimeSession;

/// Keeps the shared connection open
///
/// Obtained from `RealtimeSession::acquire`. The connection closes when the
/// last lease is dropped.
#[must_use = "the connection closes when the last lease is dropped"]
pub struct SessionLease {
    session: RealtimeSession,
}

impl SessionLease {
    pub(super) fn new(session: RealtimeSession) -> Self {
        Self { session }
    }

    /// The leased session
    pub fn session(&self) -> &RealtimeSession {
        &self.session
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        self.session.release_lease();
    }
}

impl std::fmt::Debug for SessionLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLease")
            .field("leases", &self.session.lease_count())
            .finish()
    }
}

//! Bearer credentials presented at connect time and on REST calls

/// Bearer token
///
/// The token is never printed; `Debug` shows a redacted placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    /// Wrap a raw token, accepting an optional `Bearer ` prefix
    ///
    /// Returns `None` for an empty token.
    pub fn new(token: impl AsRef<str>) -> Option<Self> {
        let raw = token.as_ref().trim();
        let token = raw
            .strip_prefix("Bearer ")
            .or_else(|| raw.strip_prefix("bearer "))
            .unwrap_or(raw)
            .trim();

        if token.is_empty() {
            return None;
        }

        Some(Self {
            token: token.to_string(),
        })
    }

    /// The raw token, as sent in the handshake
    #[inline]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Value for an `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

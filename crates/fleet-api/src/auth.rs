//! Optional admin header check for mutating routes.
//!
//! This mirrors the reference board's client-side admin toggle. It is a
//! convenience gate, not a security boundary: the token travels in plain
//! headers and read routes stay open.

use axum::http::HeaderMap;

pub const ADMIN_HEADER: &str = "x-admin-token";

/// Gate configuration. With no token configured every request passes.
#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    token: Option<String>,
}

impl AdminGate {
    /// Read `FLEET_ADMIN_TOKEN`; unset or empty disables the gate.
    pub fn from_env() -> Self {
        let token = std::env::var("FLEET_ADMIN_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        if token.is_some() {
            tracing::info!("admin gate enabled for mutating routes");
        }
        Self { token }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { token: None }
    }

    /// True when the request may mutate the board.
    pub fn allows(&self, headers: &HeaderMap) -> bool {
        match &self.token {
            None => true,
            Some(expected) => headers
                .get(ADMIN_HEADER)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|got| got == expected),
        }
    }
}

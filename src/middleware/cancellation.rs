//! Per-request cancellation
//!
//! Each handler that extracts [`RequestCancellation`] gets a token that is
//! cancelled when the handler future is dropped, which is what happens when
//! the client disconnects mid-request. Server shutdown does not cancel it:
//! graceful shutdown lets in-flight requests finish, and only long-lived
//! streams watch the [`ShutdownToken`].

use std::convert::Infallible;
use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Server-wide shutdown signal, shared through request extensions.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken(pub CancellationToken);

pub struct RequestCancellation {
    token: CancellationToken,
    _guard: DropGuard,
}

impl RequestCancellation {
    pub fn new() -> Self {
        let token = CancellationToken::new();
        let guard = token.clone().drop_guard();
        Self {
            token,
            _guard: guard,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Default for RequestCancellation {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for RequestCancellation {
    type Target = CancellationToken;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl<S> FromRequestParts<S> for RequestCancellation
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::new())
    }
}

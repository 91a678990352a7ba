/// Listener identity
///
/// Identity issuance lives outside this server; a fronting proxy or client
/// states who is acting through the `x-soundroom-user` header.
use crate::error::ServerError;
use axum::{extract::FromRequestParts, http::request::Parts};
use soundroom_core::VoterId;

pub const USER_HEADER: &str = "x-soundroom-user";

/// The listener making the request
/// Can be used as an extractor in handlers
#[derive(Debug, Clone)]
pub struct CurrentUser(pub VoterId);

impl CurrentUser {
    pub fn voter_id(&self) -> &VoterId {
        &self.0
    }

    pub fn into_voter_id(self) -> VoterId {
        self.0
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ServerError::Auth(format!("Missing {} header", USER_HEADER)))?;

        Ok(Self(VoterId::new(user)))
    }
}

use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::db::models::Profile;
use crate::db::types::ProfileRole;
use crate::repositories;

pub(crate) const ACTOR_ID_HEADER: &str = "x-actor-id";
pub(crate) const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// The acting profile, as asserted by the upstream identity gateway through
/// the actor headers. Authentication itself happens upstream; this extractor
/// verifies that the asserted profile exists, is active, and actually holds
/// the asserted role, so handlers always work with an explicit actor instead
/// of ambient session state.
pub(crate) struct Actor(pub(crate) Profile);

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let actor_id = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::Unauthorized("Missing actor identity"))?;

        let asserted_role = parts
            .headers
            .get(ACTOR_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(ProfileRole::parse)
            .ok_or(ApiError::Unauthorized("Missing or unknown actor role"))?;

        let profile = repositories::profiles::find_by_id(app_state.db(), actor_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load actor profile"))?;

        let Some(profile) = profile else {
            return Err(ApiError::Unauthorized("Unknown actor"));
        };

        if !profile.is_active {
            return Err(ApiError::Unauthorized("Actor profile is inactive"));
        }

        if profile.role != asserted_role {
            return Err(ApiError::Forbidden("Asserted role does not match the profile"));
        }

        Ok(Actor(profile))
    }
}

pub(crate) fn require_role(actor: &Profile, role: ProfileRole) -> Result<(), ApiError> {
    if actor.role == role {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Not enough permissions for this operation"))
    }
}

pub(crate) fn require_any_role(actor: &Profile, roles: &[ProfileRole]) -> Result<(), ApiError> {
    if roles.contains(&actor.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Not enough permissions for this operation"))
    }
}

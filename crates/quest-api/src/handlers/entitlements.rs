//! Entitlement handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use quest_entitlements::{
    evaluate, ActionRequirements, EntitlementResolver, EntitlementSummary, NavState,
};
use quest_models::{BusinessSnapshot, Role};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics::{record_gating_decision, sources};
use crate::state::AppState;

/// Most actions accepted in one evaluate request.
const MAX_ACTIONS: usize = 100;

/// Action descriptor to gate.
#[derive(Debug, Deserialize)]
pub struct ActionDescriptor {
    pub id: String,
    #[serde(flatten)]
    pub requirements: ActionRequirements,
}

/// Evaluate request body.
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    /// Business data; absent means not yet loaded.
    #[serde(default)]
    pub snapshot: Option<BusinessSnapshot>,
    pub role: Role,
    #[serde(default)]
    pub actions: Vec<ActionDescriptor>,
}

/// Gating decision for one action.
#[derive(Debug, Serialize)]
pub struct ActionDecision {
    pub id: String,
    #[serde(flatten)]
    pub state: NavState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_path: Option<&'static str>,
}

/// Evaluate response.
#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub summary: EntitlementSummary,
    pub actions: Vec<ActionDecision>,
}

/// Resolve entitlements for a caller-supplied snapshot.
pub async fn evaluate_entitlements(
    Json(request): Json<EvaluateRequest>,
) -> ApiResult<Json<EvaluateResponse>> {
    if request.actions.len() > MAX_ACTIONS {
        return Err(ApiError::bad_request(format!(
            "At most {} actions per request",
            MAX_ACTIONS
        )));
    }

    let resolver = EntitlementResolver::new(request.snapshot.as_ref(), &request.role);
    let actions = decide_actions(&resolver, request.actions);

    Ok(Json(EvaluateResponse {
        summary: resolver.summary(),
        actions,
    }))
}

fn decide_actions(
    resolver: &EntitlementResolver<'_>,
    actions: Vec<ActionDescriptor>,
) -> Vec<ActionDecision> {
    actions
        .into_iter()
        .map(|action| {
            let state = evaluate(resolver, &action.requirements);
            record_gating_decision(sources::EVALUATE, &state);
            ActionDecision {
                redirect_path: state.redirect_path(),
                id: action.id,
                state,
            }
        })
        .collect()
}

/// Fetch a business's snapshot from the backend with the caller's token.
pub(crate) async fn load_snapshot(
    state: &AppState,
    user: &AuthUser,
    business_id: &str,
) -> ApiResult<BusinessSnapshot> {
    user.require_business_access(business_id).map_err(|e| {
        warn!(
            user_id = %user.session.user_id,
            business_id = %business_id,
            "Cross-business access denied"
        );
        e
    })?;

    let snapshot = state.upstream.fetch_snapshot(&user.session, business_id).await?;
    Ok(snapshot)
}

/// Resolved entitlements for one business.
pub async fn get_business_entitlements(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
    user: AuthUser,
) -> ApiResult<Json<EntitlementSummary>> {
    let snapshot = load_snapshot(&state, &user, &business_id).await?;
    let summary = EntitlementResolver::new(Some(&snapshot), user.role()).summary();

    info!(
        business_id = %business_id,
        role = %user.role(),
        can_create_quests = summary.can_create_quests,
        "Resolved business entitlements"
    );

    Ok(Json(summary))
}

//! Sidebar navigation handler.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use quest_entitlements::{sidebar, EntitlementResolver, SidebarEntry};
use quest_models::Role;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::handlers::entitlements::load_snapshot;
use crate::metrics::{record_gating_decision, sources};
use crate::state::AppState;

/// Sidebar for one caller and business.
#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    pub business_id: String,
    pub role: Role,
    pub items: Vec<SidebarEntry>,
}

pub async fn get_navigation(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
    user: AuthUser,
) -> ApiResult<Json<NavigationResponse>> {
    let snapshot = load_snapshot(&state, &user, &business_id).await?;
    let resolver = EntitlementResolver::new(Some(&snapshot), user.role());

    let items = sidebar(&resolver);
    for item in &items {
        record_gating_decision(sources::NAVIGATION, &item.state);
    }

    Ok(Json(NavigationResponse {
        business_id,
        role: user.role().clone(),
        items,
    }))
}

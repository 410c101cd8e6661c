//! Dashboard endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::DashboardStats;
use crate::routes::auth::CurrentUser;
use crate::AppState;

/// GET /api/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<DashboardStats>> {
    let stats = state.db.get_dashboard_stats(&user.user_id).await?;
    Ok(Json(stats))
}

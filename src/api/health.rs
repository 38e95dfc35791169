use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::api::response::ApiResult;
use crate::api::AppState;

pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let store = state.db.store().await?;
    store.ping().await?;

    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

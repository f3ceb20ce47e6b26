use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::{
    errors::AppResult,
    event::{ApiRequest, ApiResponse, SuccessResponse},
    settings::dto::{SettingEntry, SettingsResponse},
    state::AppState,
};

/// GET ?action=settings
#[instrument(skip_all)]
pub async fn list_settings(state: &AppState, req: &ApiRequest) -> AppResult<ApiResponse> {
    state.authorizer.authorize(req).await?;

    let rows = state.settings.list().await?;
    let settings: SettingsResponse = rows
        .into_iter()
        .map(|s| {
            (
                s.setting_key,
                SettingEntry {
                    value: s.setting_value,
                    kind: s.setting_type,
                },
            )
        })
        .collect();
    debug!(count = settings.len(), "settings listed");
    Ok(ApiResponse::json(200, &settings))
}

/// PUT ?action=settings with a `{key: value}` body. Unknown keys are ignored.
#[instrument(skip_all)]
pub async fn update_settings(state: &AppState, req: &ApiRequest) -> AppResult<ApiResponse> {
    state.authorizer.authorize(req).await?;

    let data: Map<String, Value> = req.json()?;
    let mut touched = 0u64;
    for (key, value) in &data {
        let stored = setting_text(value);
        touched += state.settings.update_value(key, stored.as_deref()).await?;
    }

    info!(requested = data.len(), touched, "settings updated");
    Ok(ApiResponse::json(200, &SuccessResponse::ok()))
}

/// Strings are stored verbatim, `null` clears the value, anything else is
/// kept as its JSON text.
fn setting_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

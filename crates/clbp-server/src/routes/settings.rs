use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{Map, Value};

use clbp_core::keys;
use clbp_core::models::setting::{self, Setting};
use clbp_storage::documents;
use clbp_storage::error::StorageError;
use clbp_storage::store::DocumentStore;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSettingRequest {
    #[serde(default)]
    pub value: Option<Value>,
}

/// Every setting as one flat `{key: value}` object.
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let settings: Vec<Setting> = documents::load_all(&state.store, keys::SETTINGS_PREFIX).await?;

    let map: Map<String, Value> = settings.into_iter().map(|s| (s.key, s.value)).collect();
    Ok(Json(Value::Object(map)))
}

/// Create or replace one setting. Admin only.
pub async fn put_setting(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(key): Path<String>,
    ApiJson(req): ApiJson<UpdateSettingRequest>,
) -> Result<Json<Setting>, ApiError> {
    caller.require_admin()?;

    let key = setting::normalize_key(&key)?;
    let value = req
        .value
        .filter(|v| !v.is_null())
        .ok_or_else(|| ApiError::BadRequest("value is required".to_string()))?;

    let doc_key = keys::setting(&key);
    let now = jiff::Timestamp::now();
    let setting = match documents::load_optional::<Setting>(&state.store, &doc_key).await? {
        Some(existing) => Setting {
            value,
            updated_at: now,
            ..existing
        },
        None => Setting {
            key: key.clone(),
            value,
            created_at: now,
            updated_at: now,
        },
    };
    documents::save(&state.store, &doc_key, &setting).await?;

    tracing::info!(resource = "setting", key = %key, "setting saved");
    Ok(Json(setting))
}

/// Write default settings that are not present yet. Existing values are
/// left alone.
pub async fn seed_defaults(store: &DocumentStore) -> Result<usize, StorageError> {
    let mut seeded = 0;
    for (key, value) in setting::defaults() {
        let doc_key = keys::setting(key);
        if documents::exists(store, &doc_key).await? {
            continue;
        }
        let now = jiff::Timestamp::now();
        let setting = Setting {
            key: key.to_string(),
            value,
            created_at: now,
            updated_at: now,
        };
        documents::save(store, &doc_key, &setting).await?;
        seeded += 1;
    }

    if seeded > 0 {
        tracing::info!(count = seeded, "seeded default settings");
    }
    Ok(seeded)
}

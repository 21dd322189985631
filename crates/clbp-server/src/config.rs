use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use clbp_storage::settings::StoreSettings;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_PREDICT_DELAY_MS: u64 = 1500;
pub const DEFAULT_CONFIG_PATH: &str = "clbp.json";
const DEFAULT_REGION: &str = "us-east-1";

/// Signing secret used when neither the config file nor the environment
/// provides one. Only suitable for local development.
const DEV_FALLBACK_SECRET: &str = "dev-fallback-secret";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,
    #[serde(default)]
    pub log_json: bool,
    #[serde(default = "default_predict_delay_ms")]
    pub predict_delay_ms: u64,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_predict_delay_ms() -> u64 {
    DEFAULT_PREDICT_DELAY_MS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            port: DEFAULT_PORT,
            store: StoreSettings::default(),
            jwt_secret: None,
            log_json: false,
            predict_delay_ms: DEFAULT_PREDICT_DELAY_MS,
        }
    }
}

impl ServerConfig {
    /// The HS256 secret for session tokens.
    pub fn signing_secret(&self) -> &str {
        match self.jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => secret,
            _ => DEV_FALLBACK_SECRET,
        }
    }

    pub fn has_secret(&self) -> bool {
        self.jwt_secret.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Redacted config info safe to return from the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInfo {
    pub config_version: u32,
    pub config_path: String,
    pub port: u16,
    pub store_backend: String,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub jwt_secret_hint: Option<String>,
    pub log_json: bool,
    pub predict_delay_ms: u64,
}

/// Config file location: `CLBP_CONFIG`, else `clbp.json` in the working
/// directory.
pub fn config_path(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    lookup("CLBP_CONFIG")
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Read the config file, or return defaults if it does not exist yet.
pub fn load_config(path: &Path) -> eyre::Result<ServerConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no config file, using defaults");
        return Ok(ServerConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    parse_config(&contents)
}

/// Parse config JSON, running migrations before deserializing.
pub fn parse_config(contents: &str) -> eyre::Result<ServerConfig> {
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: ServerConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update the server."
        ));
    }

    // v0 → v1: the secret was called session_secret
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(secret) = obj.remove("session_secret") {
            obj.entry("jwt_secret").or_insert(secret);
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (renamed session_secret)");
    }

    Ok(json)
}

/// Apply environment overrides on top of the file config.
///
/// `lookup` is `std::env::var` in production; tests pass a map.
pub fn apply_env_overrides(
    config: &mut ServerConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> eyre::Result<()> {
    if let Some(port) = lookup("PORT") {
        config.port = port
            .trim()
            .parse()
            .map_err(|e| eyre::eyre!("invalid PORT {port:?}: {e}"))?;
    }

    if let Some(bucket) = lookup("CLBP_BUCKET").filter(|b| !b.trim().is_empty()) {
        let (region, endpoint_url) = match &config.store {
            StoreSettings::S3 {
                region,
                endpoint_url,
                ..
            } => (region.clone(), endpoint_url.clone()),
            StoreSettings::Memory => (DEFAULT_REGION.to_string(), None),
        };
        config.store = StoreSettings::S3 {
            bucket,
            region,
            endpoint_url,
        };
    }

    if let StoreSettings::S3 {
        region,
        endpoint_url,
        ..
    } = &mut config.store
    {
        if let Some(r) = lookup("AWS_REGION").filter(|r| !r.trim().is_empty()) {
            *region = r;
        }
        if let Some(url) = lookup("CLBP_S3_ENDPOINT").filter(|u| !u.trim().is_empty()) {
            *endpoint_url = Some(url);
        }
    }

    if let Some(secret) = lookup("CLBP_JWT_SECRET").filter(|s| !s.is_empty()) {
        config.jwt_secret = Some(secret);
    }

    if let Some(flag) = lookup("CLBP_LOG_JSON") {
        config.log_json = matches!(flag.trim(), "1" | "true" | "yes" | "on");
    }

    if let Some(delay) = lookup("CLBP_PREDICT_DELAY_MS") {
        config.predict_delay_ms = delay
            .trim()
            .parse()
            .map_err(|e| eyre::eyre!("invalid CLBP_PREDICT_DELAY_MS {delay:?}: {e}"))?;
    }

    Ok(())
}

pub fn save_config(path: &Path, config: &ServerConfig) -> eyre::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| eyre::eyre!("config path {} has no file name", path.display()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = dir.join(tmp_name);
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

pub fn config_info(config: &ServerConfig, path: &Path) -> ConfigInfo {
    let (bucket, region, endpoint_url) = match &config.store {
        StoreSettings::S3 {
            bucket,
            region,
            endpoint_url,
        } => (Some(bucket.clone()), Some(region.clone()), endpoint_url.clone()),
        StoreSettings::Memory => (None, None, None),
    };

    ConfigInfo {
        config_version: config.config_version,
        config_path: path.display().to_string(),
        port: config.port,
        store_backend: config.store.backend_name().to_string(),
        bucket,
        region,
        endpoint_url,
        jwt_secret_hint: config.jwt_secret.as_deref().map(redact_secret),
        log_json: config.log_json,
        predict_delay_ms: config.predict_delay_ms,
    }
}

fn redact_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let prefix: String = chars[..2].iter().collect();
    let suffix: String = chars[chars.len() - 2..].iter().collect();
    format!("{prefix}...{suffix}")
}

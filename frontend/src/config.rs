use std::{
    collections::{BTreeMap, BTreeSet},
    sync::OnceLock,
};

use anyhow::{bail, Context};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SESSION_TIMEOUT_MS: i64 = 30 * 60 * 1000;
pub const DEFAULT_CHECK_INTERVAL_MS: u32 = 30_000;
pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

const ADMIN_ROUTES: &[&str] = &[
    "/add-section-officer",
    "/add-office",
    "/add/officer",
    "/add-post",
    "/lists",
];
const AIS_OFFICER_ROUTES: &[&str] = &[
    "/dashboard",
    "/er-profile",
    "/documents",
    "/reports",
    "/services",
];
const SECTION_OFFICER_ROUTES: &[&str] = &["/master", "/master-controls", "/officer-profile"];
const PUBLIC_ROUTES: &[&str] = &[
    "/",
    "/login",
    "/faqs",
    "/user-agreement",
    "/privacy-policy",
    "/cookie-policy",
    "/official/",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid access config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("session_timeout_ms must be positive")]
    InvalidTimeout,
    #[error("check_interval_ms must be positive")]
    InvalidInterval,
    #[error("route `{path}` for {scope} must be a non-empty path starting with `/`")]
    InvalidPath { scope: String, path: String },
}

/// Route permissions and session timing used by the access guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub session_timeout_ms: i64,
    pub check_interval_ms: u32,
    /// Role id to allowed path prefixes, checked in order.
    pub role_routes: BTreeMap<String, Vec<String>>,
    /// Paths reachable without a session, matched exactly.
    pub public_routes: BTreeSet<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        let owned = |routes: &[&str]| routes.iter().map(|r| r.to_string()).collect::<Vec<_>>();
        let role_routes = BTreeMap::from([
            ("1".to_string(), owned(ADMIN_ROUTES)),
            ("2".to_string(), owned(AIS_OFFICER_ROUTES)),
            ("3".to_string(), owned(SECTION_OFFICER_ROUTES)),
        ]);
        Self {
            session_timeout_ms: SESSION_TIMEOUT_MS,
            check_interval_ms: DEFAULT_CHECK_INTERVAL_MS,
            role_routes,
            public_routes: PUBLIC_ROUTES.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl AccessConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_timeout_ms <= 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.check_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        // An empty prefix would match every path.
        let invalid = |path: &str| !path.starts_with('/');
        for (role, prefixes) in &self.role_routes {
            if let Some(path) = prefixes.iter().find(|p| invalid(p.as_str())) {
                return Err(ConfigError::InvalidPath {
                    scope: format!("role {role}"),
                    path: path.clone(),
                });
            }
        }
        if let Some(path) = self.public_routes.iter().find(|p| invalid(p.as_str())) {
            return Err(ConfigError::InvalidPath {
                scope: "public routes".into(),
                path: path.clone(),
            });
        }
        Ok(())
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_routes.contains(path)
    }

    /// `None` when the role has no table entry, which leaves it unrestricted.
    pub fn allowed_prefixes(&self, role_id: &str) -> Option<&[String]> {
        self.role_routes.get(role_id).map(Vec::as_slice)
    }
}

static ACCESS_CONFIG: OnceLock<AccessConfig> = OnceLock::new();

/// The resolved config, or the built-in defaults before [`init`] completes.
pub fn access_config() -> AccessConfig {
    ACCESS_CONFIG.get().cloned().unwrap_or_default()
}

fn cache_config(config: AccessConfig) -> AccessConfig {
    let _ = ACCESS_CONFIG.set(config);
    access_config()
}

fn config_from_globals() -> Option<String> {
    // Optional global object: window.__AIS_PORTAL_CONFIG = { role_routes: {...}, ... }
    let w = web_sys::window()?;
    let any = js_sys::Reflect::get(&w, &"__AIS_PORTAL_CONFIG".into()).ok()?;
    if any.is_undefined() || any.is_null() {
        return None;
    }
    js_sys::JSON::stringify(&any).ok().map(String::from)
}

async fn fetch_runtime_config() -> anyhow::Result<Option<String>> {
    let origin = match web_sys::window() {
        Some(w) => w.location().origin().ok(),
        None => None,
    };
    let Some(origin) = origin else {
        bail!("no window origin to resolve config.json against");
    };
    let resp = reqwest::get(format!("{origin}/config.json"))
        .await
        .context("requesting config.json")?;
    if resp.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !resp.status().is_success() {
        bail!("config.json responded with {}", resp.status());
    }
    let body = resp.text().await.context("reading config.json body")?;
    Ok(Some(body))
}

/// Resolves the access config once: `window.__AIS_PORTAL_CONFIG` first,
/// then `./config.json`, then the built-in defaults.
pub async fn init() -> AccessConfig {
    if let Some(cached) = ACCESS_CONFIG.get() {
        return cached.clone();
    }
    if let Some(raw) = config_from_globals() {
        match AccessConfig::from_json(&raw) {
            Ok(config) => {
                info!("Access config loaded from window globals");
                return cache_config(config);
            }
            Err(err) => warn!("Ignoring window access config: {}", err),
        }
    }
    match fetch_runtime_config().await {
        Ok(Some(raw)) => match AccessConfig::from_json(&raw) {
            Ok(config) => {
                info!("Access config loaded from config.json");
                return cache_config(config);
            }
            Err(err) => warn!("Ignoring config.json: {}", err),
        },
        Ok(None) => debug!("No config.json found, using built-in access rules"),
        Err(err) => warn!("Failed to load config.json: {:#}", err),
    }
    cache_config(AccessConfig::default())
}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 5000;

/// Route paths, in either express (`/person/:cpf`) or axum (`/person/{cpf}`) form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    pub person_post: String,
    pub person_get: String,
    pub relationship: String,
    pub clean: String,
    pub recommendations: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            person_post: "/person".to_string(),
            person_get: "/person/:identifier".to_string(),
            relationship: "/relationship".to_string(),
            clean: "/clean".to_string(),
            recommendations: "/recommendations/:identifier".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub routes: RouteConfig,
    pub port: u16,
    pub database: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            routes: RouteConfig::default(),
            port: DEFAULT_PORT,
            database: default_database_path(),
        }
    }
}

impl Config {
    /// Overlay values from environment-style keys.
    ///
    /// `lookup` is `std::env::var(..).ok()` in production. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("ROUTE_PERSON_POST") {
            self.routes.person_post = v;
        }
        if let Some(v) = get("ROUTE_PERSON_GET") {
            self.routes.person_get = v;
        }
        if let Some(v) = get("ROUTE_RELATIONSHIP") {
            self.routes.relationship = v;
        }
        if let Some(v) = get("ROUTE_CLEAN") {
            self.routes.clean = v;
        }
        if let Some(v) = get("ROUTE_RECOMMENDATIONS") {
            self.routes.recommendations = v;
        }
        if let Some(v) = get("PORT") {
            self.port = v
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a number between 0 and 65535, got {:?}", v))?;
        }
        if let Some(v) = get("DATABASE_PATH") {
            self.database = PathBuf::from(v);
        }
        Ok(())
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("kinship.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("db").join("kinship.db")
}

/// Load the TOML file if present, falling back to defaults when it is missing
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

/// Name every route parameter is rewritten to
pub const ROUTE_PARAM: &str = "{identifier}";

/// Rewrite `:param` and `{param}` segments into axum's `{identifier}`.
///
/// Routes only ever capture the person identifier, and axum rejects
/// two parameters at the same position under different names.
pub fn normalize_route(route: &str) -> String {
    let normalized: Vec<&str> = route
        .split('/')
        .map(|segment| {
            let express = segment.len() > 1 && segment.starts_with(':');
            let braced = segment.len() > 2
                && segment.starts_with('{')
                && segment.ends_with('}')
                && !segment.starts_with("{*")
                && !segment.starts_with("{{");
            if express || braced { ROUTE_PARAM } else { segment }
        })
        .collect();

    let joined = normalized.join("/");
    if joined.starts_with('/') {
        joined
    } else {
        format!("/{}", joined)
    }
}

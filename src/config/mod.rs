use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::access::{MembershipTier, Role};

/// Who is signed in, until the profile collaborator answers. Role and
/// membership here are fallbacks for a first run with an empty member
/// database.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileConfig {
    pub name: Option<String>,
    pub role: Option<String>,
    pub membership: Option<String>,
}

impl ProfileConfig {
    pub fn login(&self) -> String {
        self.name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "trader".to_string())
    }

    pub fn fallback_role(&self) -> Role {
        self.role
            .as_deref()
            .and_then(Role::parse)
            .unwrap_or(Role::User)
    }

    pub fn fallback_tier(&self) -> MembershipTier {
        self.membership
            .as_deref()
            .and_then(MembershipTier::parse)
            .unwrap_or(MembershipTier::Free)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profile: ProfileConfig,

    /// Directory of course .toml files. Defaults to <data dir>/courses.
    #[serde(default)]
    pub courses_dir: Option<String>,

    /// Symbols seeded into the portfolio watchlist on first run.
    #[serde(default)]
    pub watchlist: Vec<String>,
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    toml::from_str::<Config>(&content).unwrap_or_default()
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("TRADEROOM_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("traderoom").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("traderoom").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "traderoom", "traderoom")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("traderoom"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("traderoom"));
    }
    directories::ProjectDirs::from("io", "traderoom", "traderoom")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn session_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("session.sqlite3"))
}

pub fn progress_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("progress.sqlite3"))
}

pub fn portfolio_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("portfolio.sqlite3"))
}

pub fn members_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("members.sqlite3"))
}

pub fn default_courses_dir() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("courses"))
}

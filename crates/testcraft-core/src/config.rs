//! testcraft configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// An account created when the auth service starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSeed {
    pub username: String,
    pub email: String,
    pub name: String,
}

impl UserSeed {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            name: name.into(),
        }
    }
}

/// Top-level testcraft configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestcraftConfig {
    /// Directory searched for test-set files.
    #[serde(default = "default_test_sets_dir")]
    pub test_sets_dir: PathBuf,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Hours before a login session expires.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: i64,
    /// Number of recent tests shown in the completions chart.
    #[serde(default = "default_recent_tests")]
    pub recent_tests_limit: usize,
    /// Accounts seeded into the auth service.
    #[serde(default = "default_users")]
    pub users: Vec<UserSeed>,
}

fn default_test_sets_dir() -> PathBuf {
    PathBuf::from("./test-sets")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./testcraft-reports")
}
fn default_session_ttl() -> i64 {
    24
}
fn default_recent_tests() -> usize {
    10
}
fn default_users() -> Vec<UserSeed> {
    vec![
        UserSeed::new("testuser", "test@example.com", "Test User"),
        UserSeed::new("adminuser", "admin@example.com", "Admin User"),
    ]
}

impl Default for TestcraftConfig {
    fn default() -> Self {
        Self {
            test_sets_dir: default_test_sets_dir(),
            output_dir: default_output_dir(),
            session_ttl_hours: default_session_ttl(),
            recent_tests_limit: default_recent_tests(),
            users: default_users(),
        }
    }
}

/// Longest session lifetime a config may ask for: one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

impl TestcraftConfig {
    /// Reject settings the rest of the system cannot honour.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours) {
            anyhow::bail!(
                "session_ttl_hours must be between 1 and {MAX_SESSION_TTL_HOURS}, got {}",
                self.session_ttl_hours
            );
        }
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let value = std::env::var(&result[start + 2..start + end]).unwrap_or_default();
        result.replace_range(start..start + end + 1, &value);
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
pub fn load_config() -> Result<TestcraftConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `testcraft.toml` in the current directory
/// 2. `~/.config/testcraft/config.toml`
///
/// `TESTCRAFT_OUTPUT_DIR` overrides `output_dir`.
pub fn load_config_from(path: Option<&Path>) -> Result<TestcraftConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("testcraft.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => parse_config_file(&path)?,
        None => TestcraftConfig::default(),
    };

    if let Ok(dir) = std::env::var("TESTCRAFT_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    config.test_sets_dir = resolve_path(&config.test_sets_dir);
    config.output_dir = resolve_path(&config.output_dir);

    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<TestcraftConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config = toml::from_str::<TestcraftConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("testcraft"))
}

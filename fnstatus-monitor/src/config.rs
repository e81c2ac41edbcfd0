use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH: &str = "config.toml";

pub static CONFIG: OnceLock<MonitorConfig> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for data fetches
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout for the HEAD health probes
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Poll interval used when none is given on the command line
    #[serde(default = "default_interval_secs")]
    pub default_interval_secs: u64,

    #[serde(default)]
    pub endpoints: Endpoints,

    /// Rows of the system status section, in display order
    #[serde(default = "default_services")]
    pub services: Vec<TrackedService>,

    #[serde(default)]
    pub anticheat: AntiCheatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_summary_url")]
    pub summary: String,
    #[serde(default = "default_status_url")]
    pub status: String,
    #[serde(default = "default_incidents_url")]
    pub incidents: String,
    #[serde(default = "default_components_url")]
    pub components: String,
    #[serde(default = "default_free_games_url")]
    pub free_games: String,
}

/// A labelled service row, matched against component names by keyword
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedService {
    pub label: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntiCheatConfig {
    #[serde(default = "default_anticheat_label")]
    pub label: String,
    /// Keywords locating the anti-cheat component
    #[serde(default = "default_anticheat_component_keywords")]
    pub component_keywords: Vec<String>,
    /// Keywords flagging related incidents
    #[serde(default = "default_anticheat_incident_keywords")]
    pub incident_keywords: Vec<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_user_agent() -> String {
    "EpicGamesStatusChecker/Pro 3.0 (Enhanced Status Monitor)".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_probe_timeout_secs() -> u64 {
    10
}

fn default_interval_secs() -> u64 {
    300
}

fn default_summary_url() -> String {
    "https://status.epicgames.com/api/v2/summary.json".to_string()
}

fn default_status_url() -> String {
    "https://status.epicgames.com/api/v2/status.json".to_string()
}

fn default_incidents_url() -> String {
    "https://status.epicgames.com/api/v2/incidents.json".to_string()
}

fn default_components_url() -> String {
    "https://status.epicgames.com/api/v2/components.json".to_string()
}

fn default_free_games_url() -> String {
    "https://store-site-backend-static.ak.epicgames.com/freeGamesPromotions".to_string()
}

fn service(label: &str, keywords: &[&str]) -> TrackedService {
    TrackedService {
        label: label.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn default_services() -> Vec<TrackedService> {
    vec![
        service("Fortnite", &["fortnite"]),
        service("Epic Games Store", &["store", "epic games store"]),
        service("Login/Authentication", &["login", "account", "authentication", "auth"]),
        service("Matchmaking", &["matchmaking", "game services", "lobby"]),
        service("Friends & Social", &["friends", "social"]),
        service("Cloud Save", &["cloud save", "save"]),
        service("Downloads", &["download", "launcher"]),
        service("Payment Processing", &["payment", "purchase"]),
        service("Support System", &["support", "help"]),
        service("Rocket League", &["rocket league"]),
        service("Fall Guys", &["fall guys"]),
    ]
}

fn default_anticheat_label() -> String {
    "Easy Anti-Cheat".to_string()
}

fn default_anticheat_component_keywords() -> Vec<String> {
    ["anti", "cheat", "eac", "easy anti", "anticheat"]
        .iter()
        .map(|k| k.to_string())
        .collect()
}

fn default_anticheat_incident_keywords() -> Vec<String> {
    ["anti", "cheat", "eac", "anticheat"]
        .iter()
        .map(|k| k.to_string())
        .collect()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            summary: default_summary_url(),
            status: default_status_url(),
            incidents: default_incidents_url(),
            components: default_components_url(),
            free_games: default_free_games_url(),
        }
    }
}

impl Default for AntiCheatConfig {
    fn default() -> Self {
        Self {
            label: default_anticheat_label(),
            component_keywords: default_anticheat_component_keywords(),
            incident_keywords: default_anticheat_incident_keywords(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            default_interval_secs: default_interval_secs(),
            endpoints: Endpoints::default(),
            services: default_services(),
            anticheat: AntiCheatConfig::default(),
        }
    }
}

impl MonitorConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: MonitorConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// `(name, url)` of every endpoint, in report order
    pub fn endpoint_list(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Summary API", self.endpoints.summary.as_str()),
            ("Status API", self.endpoints.status.as_str()),
            ("Incidents API", self.endpoints.incidents.as_str()),
            ("Components API", self.endpoints.components.as_str()),
            ("Free Games API", self.endpoints.free_games.as_str()),
        ]
    }
}

/// Load [`CONFIG_PATH`] into [`CONFIG`] and return it.
pub fn read_config() -> anyhow::Result<&'static MonitorConfig> {
    let config = MonitorConfig::load_or_default(CONFIG_PATH)?;
    Ok(CONFIG.get_or_init(|| config))
}

//! Credential file loading
//!
//! Accounts live in an INI file with one `[ACCOUNT_<n>]` section per service
//! principal. The file is looked up in a fixed order: the system-wide path
//! first, then a file of a fixed name beside the executable.

pub mod endpoints;

pub use endpoints::CloudEndpoints;

use ini::{Ini, ParseOption};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// System-wide credential file, checked first
pub const SYSTEM_CONFIG_PATH: &str = "/config/azure.conf";

/// Credential file name looked up beside the executable
pub const LOCAL_CONFIG_FILE: &str = "my_azure_creds.conf";

/// Sections whose name starts with this prefix describe an account
pub const ACCOUNT_SECTION_PREFIX: &str = "ACCOUNT_";

/// Section whose keys every account inherits
pub const DEFAULT_SECTION: &str = "DEFAULT";

pub mod keys {
    pub const ACCOUNT_NAME: &str = "az_account_name";
    pub const APP_ID: &str = "az_app_id";
    pub const TENANT_ID: &str = "az_tenant_id";
    pub const PASSWORD: &str = "az_password";
    pub const SUBSCRIPTION_ID: &str = "az_subscription_id";
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file '{file}' not found (looked in: {searched})", file = LOCAL_CONFIG_FILE)]
    NotFound { searched: String },

    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ini::ParseError,
    },

    #[error("No valid accounts found in {path:?} (expected sections like [ACCOUNT_1])")]
    NoAccounts { path: PathBuf },

    #[error("Account section [{section}] is missing required key '{key}'")]
    MissingKey { section: String, key: &'static str },
}

/// One `[ACCOUNT_*]` section, keys lowercased
#[derive(Debug, Clone, PartialEq)]
pub struct AccountProfile {
    pub section: String,
    values: BTreeMap<String, String>,
}

impl AccountProfile {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_lowercase(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Label shown in the account menu
    pub fn display_name(&self) -> String {
        match self.get(keys::ACCOUNT_NAME) {
            Some(name) => name.to_string(),
            None => format!(
                "Subscription ID: {}",
                self.get(keys::SUBSCRIPTION_ID).unwrap_or("unknown")
            ),
        }
    }

    /// Extract the service principal credentials of this account
    pub fn credential(&self) -> Result<AccountCredential, ConfigError> {
        let require = |key: &'static str| {
            self.get(key)
                .map(str::to_string)
                .ok_or_else(|| ConfigError::MissingKey {
                    section: self.section.clone(),
                    key,
                })
        };

        Ok(AccountCredential {
            display_name: self.display_name(),
            tenant_id: require(keys::TENANT_ID)?,
            app_id: require(keys::APP_ID)?,
            secret: require(keys::PASSWORD)?,
            subscription_id: require(keys::SUBSCRIPTION_ID)?,
        })
    }
}

/// Service principal credentials for one subscription
#[derive(Clone, PartialEq)]
pub struct AccountCredential {
    pub display_name: String,
    pub tenant_id: String,
    pub app_id: String,
    pub secret: String,
    pub subscription_id: String,
}

impl fmt::Debug for AccountCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredential")
            .field("display_name", &self.display_name)
            .field("tenant_id", &self.tenant_id)
            .field("app_id", &self.app_id)
            .field("secret", &"<redacted>")
            .field("subscription_id", &self.subscription_id)
            .finish()
    }
}

/// Loaded credential file
#[derive(Debug, Clone)]
pub struct Config {
    pub path: PathBuf,
    pub accounts: Vec<AccountProfile>,
}

impl Config {
    /// Candidate credential files in priority order
    pub fn lookup_paths() -> Vec<PathBuf> {
        let local_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_default();

        vec![
            PathBuf::from(SYSTEM_CONFIG_PATH),
            local_dir.join(LOCAL_CONFIG_FILE),
        ]
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::lookup_paths())
    }

    /// Load the first existing file among `paths`
    pub fn load_from(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        let path = paths
            .iter()
            .find(|p| p.is_file())
            .cloned()
            .ok_or_else(|| ConfigError::NotFound {
                searched: paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;

        info!("Loading config from: {:?}", path);
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        let accounts = parse_accounts(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        if accounts.is_empty() {
            return Err(ConfigError::NoAccounts { path });
        }

        debug!("Loaded {} account(s) from {:?}", accounts.len(), path);
        Ok(Self { path, accounts })
    }
}

/// Parse INI text into one profile per account section, in file order
///
/// Values are kept verbatim: backslashes and quotes are part of the value.
/// Keys in a `[DEFAULT]` section apply to every account that does not set
/// them itself.
pub fn parse_accounts(content: &str) -> Result<Vec<AccountProfile>, ini::ParseError> {
    let options = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..Default::default()
    };
    let ini = Ini::load_from_str_opt(content.trim_start_matches('\u{feff}'), options)?;
    let defaults = ini.section(Some(DEFAULT_SECTION));

    let accounts = ini
        .iter()
        .filter_map(|(section, properties)| {
            let section = section?;
            if !section.starts_with(ACCOUNT_SECTION_PREFIX) {
                return None;
            }
            let inherited = defaults.into_iter().flat_map(|d| d.iter());
            let profile = inherited
                .chain(properties.iter())
                .fold(AccountProfile::new(section), |profile, (key, value)| {
                    profile.with_value(key, value)
                });
            Some(profile)
        })
        .collect();

    Ok(accounts)
}

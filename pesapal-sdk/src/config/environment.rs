use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Pesapal deployment to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Sandbox,
    Live,
}

impl Environment {
    pub const SANDBOX_BASE_URL: &str = "https://cybqa.pesapal.com/pesapalv3";
    pub const LIVE_BASE_URL: &str = "https://pay.pesapal.com/v3";

    /// Base URL of the v3 API for this environment.
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Sandbox => Self::SANDBOX_BASE_URL,
            Environment::Live => Self::LIVE_BASE_URL,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Live => "live",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("environment must be either 'sandbox' or 'live', got '{0}'")]
pub struct UnknownEnvironment(pub String);

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sandbox" => Ok(Environment::Sandbox),
            "live" => Ok(Environment::Live),
            other => Err(UnknownEnvironment(other.to_string())),
        }
    }
}

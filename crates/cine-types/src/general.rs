use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Deployment environment the server runs in, reported by the health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use clap::ValueEnum as _;

    use super::*;

    #[test]
    fn test_environment_names() {
        assert_eq!("staging", Environment::Staging.to_string());
        assert_eq!(
            Environment::Production,
            Environment::from_str("production", true).unwrap()
        );
        assert_eq!(
            "\"development\"",
            serde_json::to_string(&Environment::default()).unwrap()
        );
    }
}

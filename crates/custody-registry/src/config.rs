//! Configuration for the custody registries

use serde::{Deserialize, Serialize};

/// The standard investigative stages, in order.
pub const DEFAULT_CASE_STAGES: [&str; 7] = [
    "Identification",
    "Collection",
    "Acquisition",
    "Preservation",
    "Analysis",
    "Presentation",
    "Archiving",
];

/// Registry configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Stage catalog given to cases deployed without explicit stages
    pub case_stages: Vec<String>,
    /// Pre-authorize the deploying identity in each new case
    pub authorize_deployer: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            case_stages: DEFAULT_CASE_STAGES.iter().map(|s| s.to_string()).collect(),
            authorize_deployer: true,
        }
    }
}

impl RegistryConfig {
    /// Small catalog for unit tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            case_stages: vec![
                "Identification".to_string(),
                "Collection".to_string(),
                "Analysis".to_string(),
            ],
            authorize_deployer: true,
        }
    }
}

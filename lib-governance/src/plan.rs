//! Deployment Plans
//!
//! A plan bundles everything one template deployment needs: the management
//! unit and its voting settings, the departments with their shared voting
//! settings, and the identifier the finished DAO is registered under.
//!
//! # Layout on disk
//!
//! ```toml
//! id = "usa-federal-government"
//! token_index = 0
//!
//! [management]
//! name = "Executive"
//! symbol = "EXEC"
//! members = ["0x27644a3F5D51dEA8705DC7FB1CD67100D73273B1"]
//! stakes = ["100000e18"]
//!
//! [management_voting]
//! support_required = "50e16"
//! min_acceptance_quorum = "40e16"
//! vote_duration = 604800
//!
//! [department_voting]
//! support_required = "50e16"
//! min_acceptance_quorum = "5e16"
//! vote_duration = 604800
//!
//! [[departments]]
//! name = "Department of the Interior"
//! symbol = "INT"
//! members = ["0x27644a3F5D51dEA8705DC7FB1CD67100D73273B1"]
//! stakes = ["100000e18"]
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{GovernanceError, GovernanceResult};
use crate::lint::{lint_plan, PlanWarning};
use crate::unit::UnitDescriptor;
use crate::voting::VotingSettings;

fn default_true() -> bool {
    true
}

/// Name the finished DAO is registered under
///
/// Must be unique per deployment attempt; the registry rejects reuse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeploymentId(String);

impl DeploymentId {
    /// Validate a registry label: non-empty, no dots, no whitespace
    pub fn new(id: impl Into<String>) -> GovernanceResult<Self> {
        let id = id.into();
        let reason = if id.is_empty() {
            Some("cannot be empty")
        } else if id.contains('.') {
            Some("must be a single label without '.'")
        } else if id.chars().any(char::is_whitespace) {
            Some("cannot contain whitespace")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(GovernanceError::InvalidDeploymentId {
                id,
                reason: reason.to_string(),
            }),
            None => Ok(DeploymentId(id)),
        }
    }

    /// Fresh id for repeated test deployments: `<prefix>-<8 hex digits>`
    pub fn randomized(prefix: &str) -> GovernanceResult<Self> {
        Self::new(format!("{}-{:08x}", prefix, rand::random::<u32>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeploymentId {
    type Error = GovernanceError;

    fn try_from(value: String) -> GovernanceResult<Self> {
        DeploymentId::new(value)
    }
}

impl From<DeploymentId> for String {
    fn from(id: DeploymentId) -> Self {
        id.0
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Complete input of one template deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentPlan {
    pub id: DeploymentId,
    /// Token index argument passed to prepare, install and finalize
    #[serde(default)]
    pub token_index: u64,
    /// Final flag of `finalizeInstance`
    #[serde(default = "default_true")]
    pub use_agent_as_vault: bool,
    pub management: UnitDescriptor,
    pub management_voting: VotingSettings,
    pub department_voting: VotingSettings,
    #[serde(default)]
    pub departments: Vec<UnitDescriptor>,
}

impl DeploymentPlan {
    pub fn new(
        id: DeploymentId,
        management: UnitDescriptor,
        management_voting: VotingSettings,
        department_voting: VotingSettings,
    ) -> Self {
        Self {
            id,
            token_index: 0,
            use_agent_as_vault: true,
            management,
            management_voting,
            department_voting,
            departments: Vec::new(),
        }
    }

    pub fn with_department(mut self, department: UnitDescriptor) -> Self {
        self.departments.push(department);
        self
    }

    pub fn with_id(mut self, id: DeploymentId) -> Self {
        self.id = id;
        self
    }

    /// Number of template transactions the plan issues
    pub fn transaction_count(&self) -> usize {
        2 + 2 * self.departments.len()
    }

    /// Non-blocking consistency checks. The remote template stays the
    /// authority; warnings are reported, never used to alter the plan.
    pub fn lint(&self) -> Vec<PlanWarning> {
        lint_plan(self)
    }

    pub fn from_toml_str(raw: &str) -> GovernanceResult<Self> {
        toml::from_str(raw).map_err(|e| GovernanceError::PlanParse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> GovernanceResult<String> {
        toml::to_string_pretty(self).map_err(|e| GovernanceError::PlanSerialize(e.to_string()))
    }
}

/// Load a plan from a TOML file
pub fn load_plan(path: &Path) -> GovernanceResult<DeploymentPlan> {
    let raw = fs::read_to_string(path).map_err(|e| GovernanceError::PlanRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let plan = DeploymentPlan::from_toml_str(&raw)?;
    debug!(
        "Loaded plan '{}' with {} department(s) from {}",
        plan.id,
        plan.departments.len(),
        path.display()
    );
    Ok(plan)
}

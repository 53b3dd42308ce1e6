//! Liquid Democracy Governance - Deployment Plans
//!
//! This crate describes what a liquid democracy DAO looks like before it is
//! deployed: the management unit, its departments, the voting settings of
//! each body and the identifier the DAO is registered under.
//!
//! # Key Principles
//!
//! 1. **Remote authority**: the template contract decides what is valid
//! 2. **Lint, never rewrite**: plan checks produce warnings and leave lists untouched
//! 3. **Fixed-point fractions**: support and quorum are scaled by `PCT_BASE`
//!
//! # Usage
//!
//! ```ignore
//! use lib_governance::{load_plan, DeploymentId};
//!
//! let plan = load_plan(Path::new("plan.toml"))?
//!     .with_id(DeploymentId::randomized("liquid-democracy")?);
//! for warning in plan.lint() {
//!     tracing::warn!("{}", warning);
//! }
//! ```

pub mod errors;
pub mod lint;
pub mod plan;
pub mod presets;
pub mod unit;
pub mod voting;

pub use errors::{GovernanceError, GovernanceResult};
pub use lint::{lint_plan, PlanWarning};
pub use plan::{load_plan, DeploymentId, DeploymentPlan};
pub use presets::{federal_government, preset, test_fixture, PRESETS};
pub use unit::UnitDescriptor;
pub use voting::{VotingSettings, DAYS, HOURS, MINUTES, ONE_PERCENT, PCT_BASE, WEEKS};

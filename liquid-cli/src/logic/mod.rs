//! Pure functional business logic
//!
//! Everything here is deterministic: step planning, call argument
//! construction and the app id tables. No I/O and no printing; the
//! imperative shell in `commands/` and `deployment` composes these.

pub mod apps;
pub mod calls;
pub mod steps;

pub use apps::{app_name, group_installed_apps, known_app_ids, KNOWN_APPS};
pub use calls::{distribution_args, finalize_args, unit_setup_args};
pub use steps::{plan_steps, DeployStep};

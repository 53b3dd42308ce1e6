//! Deployment step planning
//!
//! A plan always expands to prepare, then one install/distribute pair per
//! department in plan order, then finalize. Each department's tokens are
//! distributed right after its install, before the next department.

use std::fmt;

use lib_governance::DeploymentPlan;

use super::calls::{DISTRIBUTE_DEPARTMENT_TOKENS, FINALIZE_INSTANCE, INSTALL_DEPARTMENT, PREPARE_INSTANCE};

/// One template transaction of a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeployStep {
    Prepare,
    /// Install department `i` (zero-based)
    Install(usize),
    /// Distribute department `i`'s tokens
    Distribute(usize),
    Finalize,
}

impl DeployStep {
    /// Template function this step calls
    pub fn function_name(&self) -> &'static str {
        match self {
            DeployStep::Prepare => PREPARE_INSTANCE,
            DeployStep::Install(_) => INSTALL_DEPARTMENT,
            DeployStep::Distribute(_) => DISTRIBUTE_DEPARTMENT_TOKENS,
            DeployStep::Finalize => FINALIZE_INSTANCE,
        }
    }

    pub fn department(&self) -> Option<usize> {
        match self {
            DeployStep::Install(i) | DeployStep::Distribute(i) => Some(*i),
            _ => None,
        }
    }

    /// Label naming the unit involved, e.g. `installDepartment #1 (Department of the Interior)`
    pub fn describe(&self, plan: &DeploymentPlan) -> String {
        match self.department() {
            Some(i) => {
                let name = plan
                    .departments
                    .get(i)
                    .map(|d| d.name.as_str())
                    .unwrap_or("?");
                format!("{} ({})", self, name)
            }
            None if *self == DeployStep::Prepare => format!("{} ({})", self, plan.management.name),
            None => format!("{} ({})", self, plan.id),
        }
    }
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.department() {
            Some(i) => write!(f, "{} #{}", self.function_name(), i + 1),
            None => f.write_str(self.function_name()),
        }
    }
}

/// Expand a plan into its ordered transactions
pub fn plan_steps(plan: &DeploymentPlan) -> Vec<DeployStep> {
    let mut steps = Vec::with_capacity(plan.transaction_count());
    steps.push(DeployStep::Prepare);
    for i in 0..plan.departments.len() {
        steps.push(DeployStep::Install(i));
        steps.push(DeployStep::Distribute(i));
    }
    steps.push(DeployStep::Finalize);
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_governance::{federal_government, DeploymentId, UnitDescriptor, VotingSettings, WEEKS};

    fn plan(departments: usize) -> DeploymentPlan {
        let mut plan = DeploymentPlan::new(
            DeploymentId::new("steps").unwrap(),
            UnitDescriptor::new("Management Token", "MGMT"),
            VotingSettings::from_percentages(50, 20, 60),
            VotingSettings::from_percentages(50, 5, WEEKS),
        );
        for i in 0..departments {
            plan = plan.with_department(UnitDescriptor::new(
                format!("Department {} Token", i + 1),
                format!("DEPT{}", i + 1),
            ));
        }
        plan
    }

    #[test]
    fn test_departments_are_interleaved() {
        assert_eq!(
            plan_steps(&plan(2)),
            vec![
                DeployStep::Prepare,
                DeployStep::Install(0),
                DeployStep::Distribute(0),
                DeployStep::Install(1),
                DeployStep::Distribute(1),
                DeployStep::Finalize,
            ]
        );
    }

    #[test]
    fn test_no_departments() {
        assert_eq!(plan_steps(&plan(0)), vec![DeployStep::Prepare, DeployStep::Finalize]);
    }

    #[test]
    fn test_step_count_matches_plan() {
        let federal = federal_government().unwrap();
        assert_eq!(plan_steps(&federal).len(), federal.transaction_count());
    }

    #[test]
    fn test_labels() {
        let plan = plan(2);
        assert_eq!(DeployStep::Distribute(1).to_string(), "distributeDepartmentTokens #2");
        assert_eq!(
            DeployStep::Install(0).describe(&plan),
            "installDepartment #1 (Department 1 Token)"
        );
        assert_eq!(DeployStep::Prepare.describe(&plan), "prepareInstance (Management Token)");
        assert_eq!(DeployStep::Finalize.describe(&plan), "finalizeInstance (steps)");
    }
}

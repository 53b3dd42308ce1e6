//! Template call arguments
//!
//! Builds the argument tokens of each template function from plan values.
//! Member and stake lists are copied through as they are; the template
//! decides whether mismatched lengths are acceptable.

use lib_abi::{Token, Uint256};
use lib_governance::{DeploymentId, UnitDescriptor, VotingSettings};

pub const PREPARE_INSTANCE: &str = "prepareInstance";
pub const INSTALL_DEPARTMENT: &str = "installDepartment";
pub const DISTRIBUTE_DEPARTMENT_TOKENS: &str = "distributeDepartmentTokens";
pub const FINALIZE_INSTANCE: &str = "finalizeInstance";

/// `(name, symbol, decimals, transferable, delegable, uint64[3] voting, tokenIndex)`
///
/// Shared by `prepareInstance` and `installDepartment`.
pub fn unit_setup_args(unit: &UnitDescriptor, voting: &VotingSettings, token_index: u64) -> Vec<Token> {
    vec![
        Token::from(unit.name.as_str()),
        Token::from(unit.symbol.as_str()),
        Token::Uint(Uint256::from_u64(u64::from(unit.decimals))),
        Token::from(unit.transferable),
        Token::from(unit.delegable),
        voting.to_token(),
        Token::from(token_index),
    ]
}

/// `(address[] holders, uint256[] stakes)`
pub fn distribution_args(unit: &UnitDescriptor) -> Vec<Token> {
    vec![unit.members_token(), unit.stakes_token()]
}

/// `(id, address[] holders, uint256[] stakes, tokenIndex, useAgentAsVault)`
pub fn finalize_args(
    id: &DeploymentId,
    management: &UnitDescriptor,
    token_index: u64,
    use_agent_as_vault: bool,
) -> Vec<Token> {
    vec![
        Token::from(id.as_str()),
        management.members_token(),
        management.stakes_token(),
        Token::from(token_index),
        Token::from(use_agent_as_vault),
    ]
}

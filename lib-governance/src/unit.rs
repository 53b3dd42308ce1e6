//! Unit Descriptors
//!
//! A unit is one organizational body of the DAO: the management body or a
//! department. Each unit gets its own token and voting app.

use lib_abi::{Address, Token, Uint256};
use serde::{Deserialize, Serialize};

fn default_decimals() -> u8 {
    18
}

fn default_true() -> bool {
    true
}

/// Token and membership description of one unit
///
/// `members` and `stakes` are parallel lists: `stakes[i]` is the initial
/// balance of `members[i]`. They are sent to the template as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDescriptor {
    /// Display name, also the token name
    pub name: String,
    /// Token ticker
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    #[serde(default)]
    pub members: Vec<Address>,
    #[serde(default)]
    pub stakes: Vec<Uint256>,
    #[serde(default)]
    pub transferable: bool,
    #[serde(default = "default_true")]
    pub delegable: bool,
}

impl UnitDescriptor {
    /// Non-transferable, delegable unit with 18 decimals and no members
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: default_decimals(),
            members: Vec::new(),
            stakes: Vec::new(),
            transferable: false,
            delegable: true,
        }
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_transferable(mut self, transferable: bool) -> Self {
        self.transferable = transferable;
        self
    }

    pub fn with_delegable(mut self, delegable: bool) -> Self {
        self.delegable = delegable;
        self
    }

    /// Append one member with its stake
    pub fn with_member(mut self, member: Address, stake: Uint256) -> Self {
        self.members.push(member);
        self.stakes.push(stake);
        self
    }

    /// Append members that all receive the same stake
    pub fn with_equal_stakes(mut self, members: impl IntoIterator<Item = Address>, stake: Uint256) -> Self {
        for member in members {
            self.members.push(member);
            self.stakes.push(stake);
        }
        self
    }

    /// Whether every member has exactly one stake
    pub fn is_balanced(&self) -> bool {
        self.members.len() == self.stakes.len()
    }

    /// `address[]` argument token
    pub fn members_token(&self) -> Token {
        Token::array(self.members.iter().copied())
    }

    /// `uint256[]` argument token
    pub fn stakes_token(&self) -> Token {
        Token::array(self.stakes.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn test_defaults() {
        let unit = UnitDescriptor::new("Executive", "EXEC");
        assert_eq!(unit.decimals, 18);
        assert!(!unit.transferable);
        assert!(unit.delegable);
        assert!(unit.members.is_empty());
    }

    #[test]
    fn test_equal_stakes_keep_lists_parallel() {
        let stake = Uint256::parse_amount("100000e18").unwrap();
        let unit = UnitDescriptor::new("Department of the Interior", "INT").with_equal_stakes(
            vec![
                addr("0x27644a3f5d51dea8705dc7fb1cd67100d73273b1"),
                addr("0xa52422bb8c29e4d55243d310fb6bae793162452e"),
            ],
            stake,
        );
        assert!(unit.is_balanced());
        assert_eq!(unit.stakes, vec![stake, stake]);
    }

    #[test]
    fn test_argument_tokens_preserve_lists() {
        let member = addr("0x04eceb77965bb426c54ee70d7fceb2a9bdbdafed");
        let mut unit = UnitDescriptor::new("EPA", "EPA").with_member(member, Uint256::from_u64(1));
        unit.stakes.push(Uint256::from_u64(2));
        assert!(!unit.is_balanced());
        assert_eq!(unit.members_token().as_array().map(|a| a.len()), Some(1));
        assert_eq!(unit.stakes_token().as_array().map(|a| a.len()), Some(2));
    }
}

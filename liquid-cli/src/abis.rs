//! Contract interfaces bundled with the binary

use lib_abi::Interface;

use crate::error::CliResult;

/// `LiquidDemocracyTemplate`: constructor plus the four deployment steps
pub const TEMPLATE_ABI: &str = include_str!("../abis/LiquidDemocracyTemplate.json");

/// `DAOFactory`: emits `DeployDAO(address dao)` while preparing an instance
pub const DAO_FACTORY_ABI: &str = include_str!("../abis/DAOFactory.json");

/// `Kernel`: emits `NewAppProxy` for every installed app
pub const KERNEL_ABI: &str = include_str!("../abis/Kernel.json");

pub fn template_interface() -> CliResult<Interface> {
    Ok(Interface::from_json(TEMPLATE_ABI)?)
}

pub fn dao_factory_interface() -> CliResult<Interface> {
    Ok(Interface::from_json(DAO_FACTORY_ABI)?)
}

pub fn kernel_interface() -> CliResult<Interface> {
    Ok(Interface::from_json(KERNEL_ABI)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_interfaces_parse() {
        let template = template_interface().unwrap();
        assert_eq!(template.functions.len(), 4);
        assert!(template.constructor.is_some());

        let factory = dao_factory_interface().unwrap();
        assert_eq!(
            factory.event("DeployDAO").unwrap().signature().unwrap(),
            "DeployDAO(address)"
        );

        let kernel = kernel_interface().unwrap();
        assert_eq!(
            kernel.event("NewAppProxy").unwrap().signature().unwrap(),
            "NewAppProxy(address,bool,bytes32)"
        );
    }

    #[test]
    fn test_template_signatures() {
        let template = template_interface().unwrap();
        assert_eq!(
            template.function("prepareInstance").unwrap().signature().unwrap(),
            "prepareInstance(string,string,uint8,bool,bool,uint64[3],uint256)"
        );
        assert_eq!(
            template.function("finalizeInstance").unwrap().signature().unwrap(),
            "finalizeInstance(string,address[],uint256[],uint256,bool)"
        );
    }
}

pub mod networks {
    pub const MAINNET: u64 = 1;
    pub const OPTIMISM: u64 = 10;
    pub const ZKSYNC_SEPOLIA: u64 = 300;
    pub const ZKSYNC: u64 = 324;
    pub const BASE: u64 = 8453;
    pub const ANVIL: u64 = 31337;
    pub const ARBITRUM_ONE: u64 = 42161;
    pub const SEPOLIA: u64 = 11155111;
}

crate::bindings!(ERC20);

crate::bindings!(
    TSender,
    maplit::hashmap! {
        // First contract deployed by the default anvil account.
        ANVIL => address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
    }
);

#[macro_export]
macro_rules! bindings {
    ($contract:ident $(, $deployment_info:expr)? $(,)?) => {
        paste::paste! {
            // Generate the main bindings in a private module. That allows
            // us to re-export all items in our own module while also adding
            // some items ourselves.
            #[allow(non_snake_case)]
            mod [<$contract Private>] {
                alloy::sol!(
                    #[allow(missing_docs)]
                    #[sol(rpc)]
                    $contract,
                    concat!("./artifacts/", stringify!($contract), ".json"),
                );
            }

            #[allow(non_snake_case)]
            pub mod $contract {
                use alloy::providers::DynProvider;

                pub use super::[<$contract Private>]::*;
                pub type Instance = $contract::[<$contract Instance>]<DynProvider>;

                $(
                use {
                    std::{sync::LazyLock, collections::HashMap},
                    alloy::primitives::{address, Address},
                    $crate::alloy::networks::*,
                };

                /// Known deployments of the contract, keyed by chain id.
                pub static DEPLOYMENT_INFO: LazyLock<HashMap<u64, Address>> = LazyLock::new(|| {
                    $deployment_info
                });

                /// Returns the deployment address for the given chain, if any.
                pub fn deployment_address(chain_id: u64) -> Option<Address> {
                    DEPLOYMENT_INFO.get(&chain_id).copied()
                }
                )*
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use {
        super::{networks::*, *},
        alloy::primitives::address,
    };

    #[test]
    fn tsender_is_deployed_on_anvil() {
        assert_eq!(
            TSender::deployment_address(ANVIL),
            Some(address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"))
        );
        assert_eq!(TSender::deployment_address(ZKSYNC_SEPOLIA), None);
    }
}

use alloy::{
    contract::{ContractInstance, Interface},
    json_abi::JsonAbi,
    primitives::Address,
};

use std::include_bytes;

macro_rules! include_abi {
    ($path:expr) => {{
        const ABI_BYTES: &[u8] = include_bytes!($path);
        ABI_BYTES
    }};
}

/// Dynamic-ABI contract handle. ABI artifacts are embedded at compile time
/// and selected by file name so bindings never depend on the filesystem at
/// runtime.
#[derive(Clone)]
pub struct Contract<P: alloy_provider::Provider> {
    instance: ContractInstance<P>,
}

impl<P: alloy_provider::Provider> Contract<P> {
    pub fn new(address: Address, provider: P, abi_file_path: &str) -> Self {
        let instance = Self::parse_abi(abi_file_path, provider, address);
        Self { instance }
    }

    fn parse_abi(path: &str, provider: P, address: Address) -> ContractInstance<P> {
        let artifact = match path {
            "erc20.json" => include_abi!("../../../../artifacts/abi/erc20.json"),
            "pooled_staking.json" => {
                include_abi!("../../../../artifacts/abi/pooled_staking.json")
            }
            "master.json" => include_abi!("../../../../artifacts/abi/master.json"),
            _ => panic!("Unknown ABI file: {path}"),
        };

        let abi: JsonAbi =
            serde_json::from_slice(artifact).expect("Failed to parse ABI from artifact");

        ContractInstance::new(address, provider, Interface::new(abi))
    }

    pub fn instance(&self) -> &ContractInstance<P> {
        &self.instance
    }

    pub fn provider(&self) -> &P {
        self.instance.provider()
    }
}

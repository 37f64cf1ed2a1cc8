use alloy::{
    network::EthereumWallet,
    primitives::{Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use url::Url;

/// Provider handed to contract bindings. Erased so call sites stay
/// independent of the concrete filler stack.
pub type WalletProvider = DynProvider;

/// Signing wallet for the service's custody account plus the provider all
/// chain access goes through.
#[derive(Clone)]
pub struct Wallet {
    pub wallet: EthereumWallet,
    pub signer: PrivateKeySigner,
    pub provider: WalletProvider,
}

impl Wallet {
    pub fn new(private_key: &str, provider_url: Url) -> Result<Self, Box<dyn std::error::Error>> {
        let signer: PrivateKeySigner = private_key.parse()?;
        let signer_clone = signer.clone();
        let wallet = EthereumWallet::from(signer);

        let wallet_clone = wallet.clone();
        let provider = ProviderBuilder::new()
            .wallet(wallet_clone)
            .on_http(provider_url)
            .erased();

        Ok(Self {
            wallet,
            signer: signer_clone,
            provider,
        })
    }

    pub fn address(&self) -> Address {
        self.wallet.default_signer().address()
    }

    pub async fn get_balance(&self) -> Result<U256, Box<dyn std::error::Error>> {
        let address = self.address();
        let balance = self.provider.get_balance(address).await?;

        Ok(balance)
    }
}

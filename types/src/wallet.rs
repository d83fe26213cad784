use {
    crate::{EvmAddress, Secret},
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
};

/// Handle the coin factory signs creation transactions with: the account
/// paying for the deployment and the session token authorising the factory
/// to sign on its behalf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WalletHandle {
    pub account: EvmAddress,
    pub session: Secret<String>,
}

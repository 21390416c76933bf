use serde::Serialize;

use crate::TokenStandard;

/// One item of an NFT inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NftItem {
    pub contract_address_hash: String,
    pub token_id: String,
    pub standard: TokenStandard,
    pub owner: Option<String>,
    /// 1 for ERC-721
    pub quantity: String,
    pub token_uri: Option<String>,
    pub name: Option<String>,
    /// image url, already resolved through the IPFS gateway
    pub image: Option<String>,
}

/// Rewrite `ipfs://` (and `ipfs://ipfs/`) uris onto an http gateway. Other
/// uris are returned unchanged.
pub fn resolve_ipfs_uri(uri: &str, gateway: &str) -> String {
    let Some(path) = uri.strip_prefix("ipfs://") else {
        return uri.to_owned();
    };
    let path = path.strip_prefix("ipfs/").unwrap_or(path);
    let gateway = gateway.trim_end_matches('/');
    format!("{gateway}/{path}")
}

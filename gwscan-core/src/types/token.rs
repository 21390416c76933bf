use serde::Serialize;
use strum::{Display, EnumString};

/// Where a token was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum TokenOrigin {
    /// relayed in from another chain
    Bridge,
    /// issued on this chain
    Native,
}

/// Token standard as seen from the EVM side.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum TokenStandard {
    #[default]
    Erc20,
    Erc721,
    Erc1155,
}

impl TokenStandard {
    /// ERC-721 and ERC-1155 tokens are listed as collections.
    pub fn is_nft(&self) -> bool {
        matches!(self, TokenStandard::Erc721 | TokenStandard::Erc1155)
    }
}

/// A user defined token, fungible or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Udt {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    /// zero for collections
    pub decimal: u32,
    pub standard: TokenStandard,
    pub origin: Option<TokenOrigin>,
    pub supply: String,
    pub holders_count: u64,
    pub transfer_count: u64,
    pub contract_address_hash: Option<String>,
    pub script_hash: Option<String>,
    pub bridge_account_id: Option<u64>,
    pub icon: Option<String>,
    pub official_site: Option<String>,
    pub description: Option<String>,
    pub minted_count: Option<u64>,
}

impl Udt {
    /// Name to show, falling back to the symbol then the contract address.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.symbol.as_deref())
            .or(self.contract_address_hash.as_deref())
    }
}

use eyre::eyre;
use gwscan_core::config::*;
use gwscan_core::pagination::PaginationRules;
use serde::Deserialize;
use url::Url;

/// Gateway used for `ipfs://` uris when none is configured.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// The chain's native token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeToken {
    /// ticker
    pub symbol: String,
    /// decimal places of the smallest unit
    pub decimals: u32,
}

impl Default for NativeToken {
    fn default() -> Self {
        Self {
            symbol: "pCKB".to_owned(),
            decimals: 18,
        }
    }
}

/// The chain being explored and where its data comes from.
#[derive(Debug, Clone)]
pub struct ChainConf {
    /// Chain name, for logs
    pub name: String,
    /// Native token used for values and fees
    pub native_token: NativeToken,
    /// GraphQL endpoint of the explorer backend
    pub graphql_url: Option<Url>,
    /// REST endpoint of the explorer backend
    pub rest_url: Option<Url>,
    /// JSON-RPC endpoint of a node
    pub rpc_url: Option<Url>,
    /// websocket endpoint pushing refresh topics
    pub ws_url: Option<Url>,
    /// http gateway that `ipfs://` uris are rewritten onto
    pub ipfs_gateway: String,
}

impl Default for ChainConf {
    fn default() -> Self {
        Self {
            name: "godwoken".to_owned(),
            native_token: NativeToken::default(),
            graphql_url: None,
            rest_url: None,
            rpc_url: None,
            ws_url: None,
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.to_owned(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawChainConf {
    name: Option<String>,
    #[serde(default)]
    nativetoken: RawNativeTokenConf,
    graphqlurl: Option<String>,
    resturl: Option<String>,
    rpcurl: Option<String>,
    wsurl: Option<String>,
    ipfsgateway: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawNativeTokenConf {
    symbol: Option<String>,
    decimals: Option<StrOrInt>,
}

fn parse_url(
    raw: Option<String>,
    err: &mut ConfigParsingError,
    path: impl FnOnce() -> ConfigPath,
) -> Option<Url> {
    raw.filter(|url| !url.trim().is_empty())
        .and_then(|url| Url::parse(url.trim()).take_err(err, path))
}

impl FromRawConf<'_, RawChainConf> for ChainConf {
    fn from_config(raw: RawChainConf, cwp: &ConfigPath) -> ConfigResult<Self> {
        let mut err = ConfigParsingError::default();
        let defaults = ChainConf::default();

        let token_path = cwp.join("nativetoken");
        let decimals = raw
            .nativetoken
            .decimals
            .and_then(|d| u32::try_from(d).take_err(&mut err, || &token_path + "decimals"))
            .unwrap_or(defaults.native_token.decimals);
        let symbol = raw
            .nativetoken
            .symbol
            .unwrap_or(defaults.native_token.symbol);

        let graphql_url = parse_url(raw.graphqlurl, &mut err, || cwp + "graphqlurl");
        let rest_url = parse_url(raw.resturl, &mut err, || cwp + "resturl");
        let rpc_url = parse_url(raw.rpcurl, &mut err, || cwp + "rpcurl");
        let ws_url = parse_url(raw.wsurl, &mut err, || cwp + "wsurl");

        let ipfs_gateway = match raw.ipfsgateway {
            Some(gateway) => parse_url(Some(gateway), &mut err, || cwp + "ipfsgateway")
                .map(String::from)
                .unwrap_or(defaults.ipfs_gateway),
            None => defaults.ipfs_gateway,
        };

        err.into_result()?;
        Ok(Self {
            name: raw.name.unwrap_or(defaults.name),
            native_token: NativeToken { symbol, decimals },
            graphql_url,
            rest_url,
            rpc_url,
            ws_url,
            ipfs_gateway,
        })
    }
}

/// Page sizes arrive as a list in JSON and as `10,20,50` from env vars.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawPageSizes {
    List(Vec<StrOrInt>),
    Csv(String),
}

impl RawPageSizes {
    fn into_items(self) -> Vec<StrOrInt> {
        match self {
            RawPageSizes::List(items) => items,
            RawPageSizes::Csv(csv) => csv
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(StrOrInt::from)
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPaginationConf {
    defaultpagesize: Option<StrOrInt>,
    allowedpagesizes: Option<RawPageSizes>,
    window: Option<StrOrInt>,
}

impl FromRawConf<'_, RawPaginationConf> for PaginationRules {
    fn from_config(raw: RawPaginationConf, cwp: &ConfigPath) -> ConfigResult<Self> {
        let mut err = ConfigParsingError::default();
        let defaults = PaginationRules::default();

        let default_page_size = raw
            .defaultpagesize
            .and_then(|size| u64::try_from(size).take_err(&mut err, || cwp + "defaultpagesize"))
            .unwrap_or(defaults.default_page_size);

        let sizes_path = cwp + "allowedpagesizes";
        let allowed_page_sizes = match raw.allowedpagesizes {
            Some(sizes) => sizes
                .into_items()
                .iter()
                .enumerate()
                .filter_map(|(i, size)| {
                    u64::try_from(size)
                        .ok()
                        .filter(|size| *size > 0)
                        .ok_or_else(|| eyre!("Page sizes must be positive integers, got {size}"))
                        .take_err(&mut err, || &sizes_path + i.to_string())
                })
                .collect(),
            None => defaults.allowed_page_sizes,
        };
        if allowed_page_sizes.is_empty() {
            let report = eyre!("At least one page size must be allowed");
            err.push(sizes_path.clone(), report);
        } else if !allowed_page_sizes.contains(&default_page_size) {
            err.push(
                cwp + "defaultpagesize",
                eyre!("Default page size {default_page_size} is not allowed"),
            );
        }

        let window = raw
            .window
            .and_then(|window| {
                u64::try_from(window)
                    .ok()
                    .filter(|window| *window > 0)
                    .ok_or_else(|| eyre!("Page window must be a positive integer"))
                    .take_err(&mut err, || cwp + "window")
            })
            .unwrap_or(defaults.window);

        err.into_result()?;
        Ok(Self {
            default_page_size,
            allowed_page_sizes,
            window,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<'de, R, T>(raw: serde_json::Value) -> ConfigResult<T>
    where
        R: Deserialize<'de> + std::fmt::Debug,
        T: FromRawConf<'de, R>,
    {
        let raw: R = R::deserialize(raw).expect("raw config deserializes");
        raw.parse_config(&ConfigPath::default())
    }

    #[test]
    fn chain_defaults() {
        let chain: ChainConf = parse::<RawChainConf, _>(serde_json::json!({})).unwrap();
        assert_eq!(chain.native_token, NativeToken::default());
        assert_eq!(chain.ipfs_gateway, DEFAULT_IPFS_GATEWAY);
        assert!(chain.graphql_url.is_none());
    }

    #[test]
    fn chain_reports_every_bad_field() {
        let err = parse::<RawChainConf, ChainConf>(serde_json::json!({
            "nativetoken": { "decimals": "many" },
            "graphqlurl": "not a url",
            "resturl": "https://api.gwscan.com/api/",
        }))
        .unwrap_err();
        let paths: Vec<String> = err.paths().map(ToString::to_string).collect();
        assert_eq!(paths, ["nativetoken.decimals", "graphqlurl"]);
    }

    #[test]
    fn page_sizes_from_csv() {
        let rules: PaginationRules = parse::<RawPaginationConf, _>(serde_json::json!({
            "allowedpagesizes": "25, 50",
            "defaultpagesize": "25",
            "window": 3,
        }))
        .unwrap();
        assert_eq!(rules.allowed_page_sizes, vec![25, 50]);
        assert_eq!(rules.default_page_size, 25);
        assert_eq!(rules.window, 3);
    }

    #[test]
    fn default_size_must_be_allowed() {
        let err = parse::<RawPaginationConf, PaginationRules>(serde_json::json!({
            "allowedpagesizes": [10, 50],
        }))
        .unwrap_err();
        let paths: Vec<String> = err.paths().map(ToString::to_string).collect();
        assert_eq!(paths, ["defaultpagesize"]);
    }
}

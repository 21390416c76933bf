use std::fs;
use std::path::Path;

use eyre::{Result, WrapErr};
use gwscan_base::settings::Settings;
use gwscan_base::Normalizer;
use gwscan_core::amount::AmountFormat;
use gwscan_core::dispatch::dispatch;
use gwscan_core::log_decoder::LogDecoder;
use gwscan_core::pagination::{CursorLinks, NumericPagination, PageRequest, PaginationRules};
use gwscan_core::query::ListQuery;
use gwscan_core::{ExplorerError, ExplorerResult, PageMetadata};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::cli::args::*;
use crate::cli::output::json::JsonOutput;
use crate::cli::output::table::{CursorLinksTable, LogTable, NumericPaginationTable};
use crate::cli::output::{redirect_notice, OutputWriter};

pub trait ExecuteCliCmd {
    fn execute(&self, settings: &Settings) -> Result<()>;
}

impl ExecuteCliCmd for Commands {
    fn execute(&self, settings: &Settings) -> Result<()> {
        match self {
            Commands::Normalize(cmd) => cmd.execute(settings),
            Commands::DecodeLog(cmd) => cmd.execute(settings),
            Commands::FormatAmount(cmd) => cmd.execute(settings),
            Commands::Paginate(cmd) => cmd.execute(settings),
        }
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).wrap_err_with(|| format!("Failed to read {path:?}"))?;
    serde_json::from_str(&text).wrap_err_with(|| format!("{path:?} is not valid JSON"))
}

fn read_decoder(abi: Option<&Path>) -> Result<LogDecoder> {
    Ok(match abi {
        Some(path) => LogDecoder::from_abi_json(&read_json(path)?),
        None => LogDecoder::default(),
    })
}

/// The page-level outcome: a view to render or a redirect to follow.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectOutcome {
    pub error: String,
    pub redirect: String,
}

impl From<&ExplorerError> for RedirectOutcome {
    fn from(err: &ExplorerError) -> Self {
        Self {
            error: err.to_string(),
            redirect: err.redirect().to_string(),
        }
    }
}

fn print_outcome(outcome: ExplorerResult<Value>) -> Result<()> {
    match outcome {
        Ok(value) => JsonOutput { value }.print(),
        Err(err) => {
            debug!(%err, "Payload resolved to a redirect");
            JsonOutput {
                value: RedirectOutcome::from(&err),
            }
            .print()
        }
    }
}

fn to_value(view: impl Serialize) -> ExplorerResult<Value> {
    Ok(serde_json::to_value(view)?)
}

impl NormalizeArgs {
    /// The JSON view of `payload`. Accounts also carry the selected
    /// rendering branch and its follow-up work.
    pub fn view(
        &self,
        normalizer: &Normalizer,
        decoder: &LogDecoder,
        payload: &Value,
    ) -> ExplorerResult<Value> {
        let source = self.source;
        match self.kind {
            PayloadKind::Block => to_value(normalizer.block(source, payload)?),
            PayloadKind::Transaction => {
                let requested = self.hash.as_deref();
                to_value(normalizer.transaction(source, payload, requested)?)
            }
            PayloadKind::Account => {
                let account = normalizer.account(source, payload)?;
                let view = dispatch(&account);
                Ok(json!({
                    "account": to_value(&account)?,
                    "view": to_value(&view)?,
                    "followUps": to_value(view.follow_ups())?,
                }))
            }
            PayloadKind::Token => to_value(normalizer.token(source, payload)?),
            PayloadKind::Transfer => to_value(normalizer.transfers(source, payload)?),
            PayloadKind::Bridged => to_value(normalizer.bridged_records(source, payload)?),
            PayloadKind::DailyStats => to_value(normalizer.daily_stats(source, payload)?),
            PayloadKind::Home => to_value(normalizer.home(source, payload)?),
            PayloadKind::Search => {
                let target = normalizer.search(source, payload)?;
                Ok(json!({
                    "target": to_value(&target)?,
                    "redirect": target.redirect().to_string(),
                }))
            }
            PayloadKind::Logs => to_value(normalizer.event_logs(source, payload, decoder)?),
            PayloadKind::Nft => to_value(normalizer.nft_items(source, payload)?),
        }
    }
}

impl ExecuteCliCmd for NormalizeArgs {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let payload = read_json(&self.file)?;
        let decoder = read_decoder(self.abi.as_deref())?;
        let normalizer = Normalizer::from_chain(&settings.chain);
        print_outcome(self.view(&normalizer, &decoder, &payload))
    }
}

impl ExecuteCliCmd for DecodeLogArgs {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let decoder = read_decoder(self.abi.as_deref())?;
        let payload = read_json(&self.log)?;
        let normalizer = Normalizer::from_chain(&settings.chain);
        let log = match normalizer.event_log(self.source, &payload, &decoder) {
            Ok(log) => log,
            Err(err) => return print_outcome(Err(err)),
        };
        if self.json {
            JsonOutput { value: log }.print()
        } else {
            LogTable { log: &log }.print()
        }
    }
}

impl FormatAmountArgs {
    /// Formatting options, falling back to the native token.
    pub fn format(&self, settings: &Settings) -> AmountFormat {
        let native = &settings.chain.native_token;
        let mut format = AmountFormat::new(self.decimals.unwrap_or(native.decimals));
        if self.native {
            format = format.with_symbol(native.symbol.clone());
        } else if let Some(symbol) = &self.symbol {
            format = format.with_symbol(symbol.clone());
        }
        if let Some(digits) = self.max_fraction_digits {
            format = format.with_max_fraction_digits(digits);
        }
        if self.plain {
            format = format.plain();
        }
        format
    }
}

impl ExecuteCliCmd for FormatAmountArgs {
    fn execute(&self, settings: &Settings) -> Result<()> {
        println!("{}", self.format(settings).format(self.amount.as_deref()));
        Ok(())
    }
}

/// Result of `paginate`, cursor or numeric depending on the arguments.
#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum PaginationOutcome {
    Cursor(CursorLinks),
    Numeric(NumericPagination),
}

impl PaginateArgs {
    fn list_query(&self) -> ListQuery {
        let mut query = ListQuery::parse(&self.query);
        if self.page.is_some() {
            query.page = self.page.clone();
        }
        if self.page_size.is_some() {
            query.page_size = self.page_size.clone();
        }
        query
    }

    /// Cursor links when a cursor token was given, numeric pages otherwise.
    pub fn paginate(&self, rules: &PaginationRules) -> ExplorerResult<PaginationOutcome> {
        let query = self.list_query();
        if self.before.is_some() || self.after.is_some() {
            let metadata = PageMetadata {
                total_count: self.total,
                before: self.before.clone(),
                after: self.after.clone(),
                ..Default::default()
            };
            return Ok(PaginationOutcome::Cursor(CursorLinks::new(
                &self.path, &query, &metadata,
            )));
        }
        let request = PageRequest::from_query(&self.path, &query, rules)?;
        request.check_overflow(&self.path, &query, self.total)?;
        Ok(PaginationOutcome::Numeric(NumericPagination::new(
            &self.path,
            &query,
            request,
            self.total,
            rules.window,
        )))
    }
}

impl ExecuteCliCmd for PaginateArgs {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let outcome = match self.paginate(&settings.pagination) {
            Ok(outcome) => outcome,
            Err(err) if self.json => return print_outcome(Err(err)),
            Err(err) => {
                println!("{}", redirect_notice(&err.to_string(), &err.redirect()));
                return Ok(());
            }
        };
        match (&outcome, self.json) {
            (_, true) => JsonOutput { value: &outcome }.print(),
            (PaginationOutcome::Cursor(links), false) => CursorLinksTable { links }.print(),
            (PaginationOutcome::Numeric(pagination), false) => {
                NumericPaginationTable { pagination }.print()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paginate_args(total: u64) -> PaginateArgs {
        PaginateArgs {
            total,
            path: "/txs".into(),
            query: String::new(),
            page: None,
            page_size: None,
            before: None,
            after: None,
            json: true,
        }
    }

    #[test]
    fn cursor_mode_when_tokens_given() {
        let args = PaginateArgs {
            after: Some("abc".into()),
            ..paginate_args(40)
        };
        match args.paginate(&PaginationRules::default()).unwrap() {
            PaginationOutcome::Cursor(links) => {
                assert!(links.prev.is_none());
                assert_eq!(links.next.unwrap().href(), "/txs?after=abc");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn numeric_mode_validates() {
        let args = PaginateArgs {
            page: Some("9".into()),
            ..paginate_args(40)
        };
        let err = args.paginate(&PaginationRules::default()).unwrap_err();
        assert!(matches!(err, ExplorerError::PageOverflow { last: 2, .. }));
    }

    #[test]
    fn native_amount_format() {
        let args = FormatAmountArgs {
            amount: Some("1234500000000000000000".into()),
            decimals: None,
            symbol: None,
            native: true,
            max_fraction_digits: None,
            plain: false,
        };
        let settings = Settings::default();
        assert_eq!(
            args.format(&settings).format(args.amount.as_deref()),
            "1,234.5 pCKB"
        );
    }
}

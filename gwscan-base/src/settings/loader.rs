use std::collections::HashMap;
use std::path::Path;

use config::{Config, ConfigError, Environment, File, Map, Source, Value, ValueKind};
use convert_case::{Case, Casing};
use derive_new::new;
use eyre::{Context, Result};
use gwscan_core::config::{ConfigPath, IntoParsedConf, ENV_PREFIX};
use itertools::Itertools;

use crate::settings::{RawSettings, Settings};

/// Load the settings for `app` from the json files in `config_dir`, the
/// files named by `CONFIG_FILES` and the `GWSCAN_BASE`/`GWSCAN_<APP>`
/// variables of `env`.
pub(crate) fn load_settings_object(
    app: &str,
    config_dir: impl AsRef<Path>,
    env: &HashMap<String, String>,
) -> Result<Settings> {
    let app_prefix = format!("{ENV_PREFIX}_{app}").to_ascii_uppercase();
    let base_prefix = format!("{ENV_PREFIX}_BASE");

    let mut config_sources = vec![];
    let mut builder = Config::builder();

    // The default config files, skipped when the directory is absent
    let config_dir = config_dir.as_ref();
    if config_dir.is_dir() {
        let entries = config_dir
            .read_dir()
            .with_context(|| format!("Failed to open config directory {config_dir:?}"))?;
        for entry in entries.sorted_by_key(|entry| entry.as_ref().ok().map(|e| e.path())) {
            let path = entry?.path();
            if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
                config_sources.push(format!("{path:?}"));
                builder = builder.add_source(CaseAdapter::new(File::from(path), Case::Flat));
            }
        }
    }

    // Additional user specified config files
    let config_file_paths: Vec<String> = env
        .get("CONFIG_FILES")
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default();
    for path in &config_file_paths {
        builder = builder.add_source(CaseAdapter::new(File::with_name(path), Case::Flat));
    }
    config_sources.extend(config_file_paths);

    let config = builder
        .add_source(CaseAdapter::new(
            Environment::with_prefix(&base_prefix)
                .separator("_")
                .source(Some(env.clone())),
            Case::Flat,
        ))
        .add_source(CaseAdapter::new(
            Environment::with_prefix(&app_prefix)
                .separator("_")
                .source(Some(env.clone())),
            Case::Flat,
        ))
        .build()
        .context("Failed to read config sources")?;

    let raw: RawSettings = match config.try_deserialize() {
        Ok(raw) => raw,
        Err(err) => {
            let mut err = Err(err).context("Config deserialization error");
            for source in &config_sources {
                err = err.with_context(|| format!("Config loaded: {source}"));
            }
            return err;
        }
    };

    raw.parse_config(&ConfigPath::default())
        .context("Invalid settings")
}

/// Recases every key component of a source, including keys of nested
/// tables, so files and env vars address the same paths.
#[derive(Clone, Debug, new)]
pub struct CaseAdapter<S> {
    inner: S,
    casing: Case,
}

impl<S> Source for CaseAdapter<S>
where
    S: Source + Clone + Send + Sync + 'static,
{
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, ConfigError> {
        self.inner
            .collect()
            .map(|config| recase_table(config, self.casing))
    }
}

fn recase_table(table: Map<String, Value>, casing: Case) -> Map<String, Value> {
    table
        .into_iter()
        .map(|(k, v)| (split_and_recase_key(".", casing, &k), recase_value(v, casing)))
        .collect()
}

fn recase_value(mut value: Value, casing: Case) -> Value {
    match value.kind {
        ValueKind::Table(ref mut table) => {
            *table = recase_table(std::mem::take(table), casing);
        }
        ValueKind::Array(ref mut items) => {
            *items = std::mem::take(items)
                .into_iter()
                .map(|item| recase_value(item, casing))
                .collect();
        }
        _ => {}
    }
    value
}

/// Recase each component of a `sep` separated key and re-join the components
/// with the standard `config` crate separator `.`.
fn split_and_recase_key(sep: &str, casing: Case, key: &str) -> String {
    key.split(sep).map(|s| s.to_case(casing)).join(".")
}

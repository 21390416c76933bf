//! A set of traits and types to make configuration parsing easier. The main
//! flow is to define a config struct and then a raw config struct which mirrors
//! it but is more forgiving for the deserialization, and then to implement
//! `FromRawConf` which will allow for better error messages.

use std::fmt::{Debug, Display, Formatter};
use std::num::{ParseIntError, TryFromIntError};
use std::ops::Add;
use std::sync::Arc;

use convert_case::{Case, Casing};
use eyre::Report;
use itertools::Itertools;
use serde::Deserialize;
use thiserror::Error;

/// Prefix for every environment variable read by gwscan.
pub const ENV_PREFIX: &str = "GWSCAN";

/// Extension trait to better support ConfigResults with non-ConfigParsingError
/// results.
pub trait ConfigErrResultExt<T> {
    /// Convert a result into a ConfigResult, using the given path for the
    /// error.
    fn into_config_result(self, path: impl FnOnce() -> ConfigPath) -> ConfigResult<T>;

    /// Take the error from a result and merge it into the given
    /// ConfigParsingError.
    fn take_err(self, err: &mut ConfigParsingError, path: impl FnOnce() -> ConfigPath)
        -> Option<T>;
}

impl<T, E> ConfigErrResultExt<T> for Result<T, E>
where
    E: Into<Report>,
{
    fn into_config_result(self, path: impl FnOnce() -> ConfigPath) -> ConfigResult<T> {
        self.map_err(|e| ConfigParsingError(vec![(path(), e.into())]))
    }

    fn take_err(
        self,
        err: &mut ConfigParsingError,
        path: impl FnOnce() -> ConfigPath,
    ) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                err.merge(ConfigParsingError(vec![(path(), e.into())]));
                None
            }
        }
    }
}

/// Extension trait to better support ConfigResults.
pub trait ConfigResultExt<T> {
    /// Take the error from a result and merge it into the given
    /// ConfigParsingError.
    fn take_config_err(self, err: &mut ConfigParsingError) -> Option<T>;
}

impl<T> ConfigResultExt<T> for ConfigResult<T> {
    fn take_config_err(self, err: &mut ConfigParsingError) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                err.merge(e);
                None
            }
        }
    }
}

/// Path within a config tree.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct ConfigPath(Vec<Arc<String>>);

impl Display for ConfigPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.json_name())
    }
}

impl<S: Into<String>> Add<S> for &ConfigPath {
    type Output = ConfigPath;

    fn add(self, rhs: S) -> Self::Output {
        self.join(rhs)
    }
}

impl ConfigPath {
    /// Add a new part to the path.
    pub fn join(&self, part: impl Into<String>) -> Self {
        let part = part.into();
        debug_assert!(!part.contains('.'));
        let mut new = self.clone();
        new.0.push(Arc::new(part));
        new
    }

    /// Get the JSON formatted path.
    pub fn json_name(&self) -> String {
        self.0
            .iter()
            .map(|s| s.as_str().to_case(Case::Camel))
            .join(".")
    }

    /// Get the environment variable formatted path. Key components are
    /// flattened since `_` separates them.
    pub fn env_name(&self) -> String {
        [ENV_PREFIX, "BASE"]
            .into_iter()
            .chain(self.0.iter().map(|s| s.as_str()))
            .map(|s| s.to_case(Case::UpperFlat))
            .join("_")
    }
}

/// A composite error type that allows for compiling multiple errors into a
/// single result. Use `default()` to create an empty error and then take other
/// errors using the extension traits or directly push them.
#[must_use]
#[derive(Debug, Default)]
pub struct ConfigParsingError(Vec<(ConfigPath, Report)>);

impl ConfigParsingError {
    /// Add a new error to the list.
    pub fn push(&mut self, conf_path: ConfigPath, report: Report) {
        self.0.push((conf_path, report));
    }

    /// Merge all the individual errors from two `ConfigParsingErrors`.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Convert this error into a result, returning `Ok(())` if there are no
    /// errors.
    pub fn into_result(self) -> ConfigResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// The paths that failed to parse.
    pub fn paths(&self) -> impl Iterator<Item = &ConfigPath> {
        self.0.iter().map(|(path, _)| path)
    }
}

/// A result type that is used for config parsing and may contain multiple
/// errors.
pub type ConfigResult<T> = Result<T, ConfigParsingError>;

impl FromIterator<ConfigParsingError> for ConfigParsingError {
    fn from_iter<T: IntoIterator<Item = ConfigParsingError>>(iter: T) -> Self {
        Self(iter.into_iter().flat_map(|e| e.0).collect())
    }
}

impl Display for ConfigParsingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ParsingError")?;
        for (path, report) in &self.0 {
            writeln!(f, "\n#####\n")?;
            writeln!(f, "config_path: `{path}`")?;
            writeln!(f, "env_path: `{}`", path.env_name())?;
            writeln!(f, "error: {report:?}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigParsingError {}

/// A trait that allows for constructing `Self` from a raw config type.
pub trait FromRawConf<'de, T>: Sized
where
    // technically we don't need this bound but it enforces
    // the correct usage.
    T: Debug + Deserialize<'de>,
{
    /// Construct `Self` from a raw config type.
    /// - `raw` is the raw config value
    /// - `cwp` is the current working path
    fn from_config(raw: T, cwp: &ConfigPath) -> ConfigResult<Self>;
}

/// A trait that allows for converting a raw config type into a "parsed" type.
pub trait IntoParsedConf<'de>: Debug + Deserialize<'de> {
    /// Parse the config.
    fn parse_config<O: FromRawConf<'de, Self>>(self, cwp: &ConfigPath) -> ConfigResult<O>;
}

impl<'de, S> IntoParsedConf<'de> for S
where
    S: Deserialize<'de> + Debug,
{
    fn parse_config<O: FromRawConf<'de, S>>(self, cwp: &ConfigPath) -> ConfigResult<O> {
        O::from_config(self, cwp)
    }
}

/// An error when parsing a StrOrInt type as an integer value.
#[derive(Error, Debug)]
pub enum StrOrIntParseError {
    /// The string is not a valid integer
    #[error("Invalid integer provided as a string: {0}")]
    StrParse(#[from] ParseIntError),
    /// The provided integer does not match the type requirements.
    #[error("Provided number is an invalid integer: {0}")]
    InvalidInt(#[from] TryFromIntError),
}

/// A type which can be used for parsing values that may be provided as a
/// string or an integer but will ultimately be read as an integer. E.g. where
/// `"pageSize": "20"` and `"pageSize": 20` should both be considered valid.
/// Explorer payloads are just as inconsistent, so the normalizers use it too.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StrOrInt {
    /// The parsed type is a string
    Str(String),
    /// The parsed type is an integer
    Int(i64),
}

impl Debug for StrOrInt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StrOrInt::Str(v) => write!(f, "\"{v}\""),
            StrOrInt::Int(v) => write!(f, "{}", *v),
        }
    }
}

impl Display for StrOrInt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StrOrInt::Str(v) => f.write_str(v),
            StrOrInt::Int(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for StrOrInt {
    fn from(value: i64) -> Self {
        StrOrInt::Int(value)
    }
}

impl From<String> for StrOrInt {
    fn from(value: String) -> Self {
        StrOrInt::Str(value)
    }
}

impl From<&str> for StrOrInt {
    fn from(value: &str) -> Self {
        StrOrInt::Str(value.to_owned())
    }
}

macro_rules! convert_to {
    ($t:ty) => {
        impl TryFrom<StrOrInt> for $t {
            type Error = StrOrIntParseError;

            fn try_from(v: StrOrInt) -> Result<Self, Self::Error> {
                (&v).try_into()
            }
        }

        impl TryFrom<&StrOrInt> for $t {
            type Error = StrOrIntParseError;

            fn try_from(v: &StrOrInt) -> Result<Self, Self::Error> {
                Ok(match v {
                    StrOrInt::Str(s) => s.trim().parse()?,
                    StrOrInt::Int(i) => (*i).try_into()?,
                })
            }
        }
    };
}

convert_to!(u16);
convert_to!(u32);
convert_to!(u64);

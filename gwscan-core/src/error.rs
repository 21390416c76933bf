use std::any::Any;
use std::error::Error as StdError;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;

use url::form_urlencoded;

/// The result of shaping or validating explorer data.
pub type ExplorerResult<T> = Result<T, ExplorerError>;

/// An "Any"-typed error.
pub trait ExplorerCustomError: StdError + Send + Sync + Any {}

impl<E: StdError + Send + Sync + Any> ExplorerCustomError for E {}

/// Thin wrapper around a boxed ExplorerCustomError. Basically a trait-object
/// adaptor.
#[repr(transparent)]
pub struct ExplorerCustomErrorWrapper(Box<dyn ExplorerCustomError>);

impl Debug for ExplorerCustomErrorWrapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", AsRef::<dyn ExplorerCustomError>::as_ref(&self))
    }
}

impl Display for ExplorerCustomErrorWrapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", AsRef::<dyn ExplorerCustomError>::as_ref(&self))
    }
}

impl StdError for ExplorerCustomErrorWrapper {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl AsRef<dyn ExplorerCustomError> for ExplorerCustomErrorWrapper {
    fn as_ref(&self) -> &dyn ExplorerCustomError {
        self.0.as_ref()
    }
}

impl Deref for ExplorerCustomErrorWrapper {
    type Target = Box<dyn ExplorerCustomError>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A page-level redirect target, path plus optional query string.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Redirect(String);

impl Redirect {
    /// Redirect to `path` with the given query pairs, percent encoded.
    pub fn new<'a>(path: &str, query: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.extend_pairs(query);
        let query = serializer.finish();
        if query.is_empty() {
            Self(path.to_owned())
        } else {
            Self(format!("{path}?{query}"))
        }
    }

    /// Redirect to a bare path.
    pub fn path(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The full href.
    pub fn href(&self) -> &str {
        &self.0
    }
}

impl Display for Redirect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors surfaced to the page level. Every variant maps onto a redirect via
/// [`ExplorerError::redirect`].
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    /// The requested resource does not exist
    #[error("Resource not found")]
    NotFound,
    /// A godwoken transaction hash was used where the eth hash is expected
    #[error("{hash} is a godwoken transaction hash, the transaction is indexed by its eth hash")]
    GwHash {
        /// the hash that was requested
        hash: String,
        /// the eth hash of the same transaction, when the backend reported it
        eth_hash: Option<String>,
    },
    /// `page` was zero, negative or not a number
    #[error("Page must be a positive integer, got {page:?}")]
    PageNonPositive {
        /// the offending raw value
        page: String,
        /// corrected url
        redirect: Redirect,
    },
    /// `page_size` was not one of the allowed sizes
    #[error("Page size {size:?} is not allowed")]
    PageSize {
        /// the offending raw value
        size: String,
        /// corrected url
        redirect: Redirect,
    },
    /// `page` is past the last page
    #[error("Page {page} is past the last page {last}")]
    PageOverflow {
        /// requested page
        page: u64,
        /// last available page
        last: u64,
        /// corrected url
        redirect: Redirect,
    },
    /// Any other error; does not implement `From` to prevent
    /// conflicting/absorbing other errors.
    #[error(transparent)]
    Other(ExplorerCustomErrorWrapper),
}

impl ExplorerError {
    /// Create an explorer error from any other existing error
    pub fn from_other<E: ExplorerCustomError>(err: E) -> Self {
        Self::Other(ExplorerCustomErrorWrapper(Box::new(err)))
    }

    /// Create an explorer error from any other existing boxed error
    pub fn from_other_boxed<E: ExplorerCustomError>(err: Box<E>) -> Self {
        Self::Other(ExplorerCustomErrorWrapper(err))
    }

    /// Creates an explorer error of the other variant from a message
    pub fn from_other_str(err: impl Into<String>) -> Self {
        #[derive(Debug)]
        #[repr(transparent)]
        struct StringError(String);
        impl Display for StringError {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
        impl StdError for StringError {}

        Self::from_other(StringError(err.into()))
    }

    /// Where the page should send the visitor instead of rendering.
    pub fn redirect(&self) -> Redirect {
        match self {
            ExplorerError::NotFound => Redirect::path("/404"),
            ExplorerError::GwHash {
                eth_hash: Some(eth_hash),
                ..
            } => Redirect::path(format!("/tx/{eth_hash}")),
            ExplorerError::GwHash {
                hash,
                eth_hash: None,
            } => Redirect::new("/404", [("hash", hash.as_str()), ("type", "gw")]),
            ExplorerError::PageNonPositive { redirect, .. }
            | ExplorerError::PageSize { redirect, .. }
            | ExplorerError::PageOverflow { redirect, .. } => redirect.clone(),
            ExplorerError::Other(err) => {
                Redirect::new("/500", [("message", err.to_string().as_str())])
            }
        }
    }
}

impl From<serde_json::Error> for ExplorerError {
    fn from(err: serde_json::Error) -> Self {
        Self::from_other(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_encodes_message() {
        let err = ExplorerError::from_other_str("bad gateway & more");
        assert_eq!(
            err.redirect().href(),
            "/500?message=bad+gateway+%26+more"
        );
    }

    #[test]
    fn gw_hash_redirects_to_eth_hash() {
        let err = ExplorerError::GwHash {
            hash: "0xaa".into(),
            eth_hash: Some("0xbb".into()),
        };
        assert_eq!(err.redirect().href(), "/tx/0xbb");

        let err = ExplorerError::GwHash {
            hash: "0xaa".into(),
            eth_hash: None,
        };
        assert_eq!(err.redirect().href(), "/404?hash=0xaa&type=gw");
    }

    #[test]
    fn not_found_redirect() {
        assert_eq!(ExplorerError::NotFound.redirect().href(), "/404");
    }
}

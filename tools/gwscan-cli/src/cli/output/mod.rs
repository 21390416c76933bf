use gwscan_core::Redirect;

pub trait OutputWriter {
    fn print(&self) -> eyre::Result<()>;
}

/// A redirect a page would have answered with.
pub fn redirect_notice(reason: &str, redirect: &Redirect) -> String {
    format!("{reason}\nRedirect: {redirect}")
}

pub mod json;
pub mod table;

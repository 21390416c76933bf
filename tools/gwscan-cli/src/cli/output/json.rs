use eyre::WrapErr;
use serde::Serialize;

use crate::cli::output::OutputWriter;

pub struct JsonOutput<T> {
    pub value: T,
}

impl<T: Serialize> OutputWriter for JsonOutput<T> {
    fn print(&self) -> eyre::Result<()> {
        let json = serde_json::to_string_pretty(&self.value).wrap_err("Failed to serialize")?;
        println!("{json}");
        Ok(())
    }
}

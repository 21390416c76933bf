use cli_table::{print_stdout, Cell, CellStruct, Style, Table};
use colored::*;
use eyre::WrapErr;
use gwscan_core::pagination::{CursorLinks, NumericPagination, PageItem};
use gwscan_core::ParsedEventLog;

use crate::cli::output::OutputWriter;

const DISABLED: &str = "-";

fn link_row(label: &str, href: Option<String>) -> Vec<CellStruct> {
    vec![label.cell(), href.unwrap_or_else(|| DISABLED.to_owned()).cell()]
}

pub struct LogTable<'a> {
    pub log: &'a ParsedEventLog,
}

impl OutputWriter for LogTable<'_> {
    fn print(&self) -> eyre::Result<()> {
        match &self.log.parsed_log {
            Some(parsed) => println!("{} {}", parsed.signature.green().bold(), parsed.topic),
            None => println!("{}", "Not decoded, showing raw values".yellow()),
        }
        let rows = self.log.slots.iter().map(|slot| {
            vec![
                slot.position.cell(),
                slot.name.as_deref().unwrap_or(DISABLED).cell(),
                slot.kind.as_deref().unwrap_or(DISABLED).cell(),
                if slot.indexed { "yes" } else { "no" }.cell(),
                slot.value.display().cell(),
            ]
        });
        let table = rows.table().title(vec![
            "#".cell().bold(true),
            "Name".cell().bold(true),
            "Type".cell().bold(true),
            "Indexed".cell().bold(true),
            "Value".cell().bold(true),
        ]);
        print_stdout(table).wrap_err("Failed to print log table")
    }
}

pub struct NumericPaginationTable<'a> {
    pub pagination: &'a NumericPagination,
}

impl OutputWriter for NumericPaginationTable<'_> {
    fn print(&self) -> eyre::Result<()> {
        let p = self.pagination;
        println!("Page {} of {}", p.current, p.last);
        let prev = p.prev.as_ref().map(ToString::to_string);
        let next = p.next.as_ref().map(ToString::to_string);
        let mut rows = vec![link_row("prev", prev), link_row("next", next)];
        rows.extend(p.items.iter().map(|item| match item {
            PageItem::Page {
                number,
                href,
                current,
            } => {
                let label = if *current {
                    format!("[{number}]")
                } else {
                    number.to_string()
                };
                vec![label.cell(), href.to_string().cell()]
            }
            PageItem::Gap => vec!["…".cell(), "".cell()],
        }));
        let table = rows
            .table()
            .title(vec!["Page".cell().bold(true), "Link".cell().bold(true)]);
        print_stdout(table).wrap_err("Failed to print pagination table")
    }
}

pub struct CursorLinksTable<'a> {
    pub links: &'a CursorLinks,
}

impl OutputWriter for CursorLinksTable<'_> {
    fn print(&self) -> eyre::Result<()> {
        let prev = self.links.prev.as_ref().map(ToString::to_string);
        let next = self.links.next.as_ref().map(ToString::to_string);
        let table = vec![link_row("prev", prev), link_row("next", next)]
            .table()
            .title(vec!["Direction".cell().bold(true), "Link".cell().bold(true)]);
        print_stdout(table).wrap_err("Failed to print pagination table")
    }
}

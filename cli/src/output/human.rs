//! Human-readable terminal renderer.

use linodectl_common::InstanceStatus;
use owo_colors::OwoColorize as _;
use serde_json::Value;

use crate::application::ports::{Catalog, CatalogRow};
use crate::domain::Operation;
use crate::output::OutputContext;

/// Renders catalogs and usage as aligned text tables using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    pub fn render_version(&self, version: &str) {
        if !self.ctx.quiet {
            println!("linodectl {version}");
        }
    }

    /// Render a catalog listing as a table. Tables are data, so `quiet`
    /// does not suppress them.
    pub fn render_catalog(&self, catalog: Catalog, rows: &[CatalogRow]) {
        if rows.is_empty() {
            self.ctx.warn(&format!("No {} found.", catalog.name()));
            return;
        }
        let columns = catalog_columns(catalog);
        let headers: Vec<&str> = columns.iter().map(|(header, _)| *header).collect();
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| columns.iter().map(|(_, key)| cell(row, key)).collect())
            .collect();
        let widths = column_widths(&headers, &cells);

        let header_line = pad_row(headers.iter().map(|h| (*h).to_string()), &widths);
        println!("  {}", header_line.style(self.ctx.styles.header));
        for row in cells {
            println!("  {}", pad_row(row.into_iter(), &widths));
        }
    }

    pub fn render_signatures(&self, ops: &[Operation]) {
        for op in ops {
            println!("  {}", op.signature());
        }
    }
}

/// `(header, provider field)` pairs shown for each catalog.
#[must_use]
pub fn catalog_columns(catalog: Catalog) -> &'static [(&'static str, &'static str)] {
    match catalog {
        Catalog::Datacenters => &[("ID", "DATACENTERID"), ("SLUG", "ABBR"), ("LOCATION", "LOCATION")],
        Catalog::Distributions => &[
            ("ID", "DISTRIBUTIONID"),
            ("LABEL", "LABEL"),
            ("64BIT", "IS64BIT"),
            ("MIN MB", "MINIMAGESIZE"),
        ],
        Catalog::Kernels => &[("ID", "KERNELID"), ("LABEL", "LABEL"), ("PVOPS", "ISPVOPS")],
        Catalog::Linodes => &[
            ("ID", "LINODEID"),
            ("LABEL", "LABEL"),
            ("STATUS", "STATUS"),
            ("DATACENTER", "DATACENTERID"),
            ("PLAN", "PLANID"),
        ],
        Catalog::Plans => &[
            ("ID", "PLANID"),
            ("LABEL", "LABEL"),
            ("RAM", "RAM"),
            ("DISK", "DISK"),
            ("PRICE", "PRICE"),
        ],
    }
}

/// Display text of one cell. `STATUS` codes are shown by name.
#[must_use]
pub fn cell(row: &CatalogRow, key: &str) -> String {
    match row.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(v) if key == "STATUS" => v
            .as_i64()
            .map_or_else(|| v.to_string(), |code| InstanceStatus::from_code(code).to_string()),
        Some(v) => v.to_string(),
    }
}

fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or_default()
        })
        .collect()
}

fn pad_row(cells: impl Iterator<Item = String>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(c, w)| format!("{c:<w$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

//! Catalog listings: `datacenters`, `distributions`, `kernels`, `linodes`, `plans`.
//!
//! Read-only provider calls that bypass the workflow engine entirely.

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::ports::{Catalog, CatalogReader, CatalogRow};

/// Fetch and render one catalog.
///
/// # Errors
///
/// Returns an error if the credential is missing or the provider call fails.
pub async fn run(catalog: Catalog, app: &AppContext) -> Result<()> {
    let provider = app.provider()?;
    let rows = list(&provider, catalog).await?;
    app.renderer().render_catalog(catalog, &rows)
}

/// Fetch one catalog through any `CatalogReader`.
///
/// # Errors
///
/// Returns the reader's error with the catalog name attached.
pub async fn list(reader: &impl CatalogReader, catalog: Catalog) -> Result<Vec<CatalogRow>> {
    let rows = reader
        .catalog(catalog)
        .await
        .with_context(|| format!("listing {}", catalog.name()))?;
    tracing::debug!(catalog = catalog.name(), rows = rows.len(), "catalog fetched");
    Ok(rows)
}

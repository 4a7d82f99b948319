//! `linodectl signatures`: one-line usage of every operation.

use anyhow::Result;

use crate::app::AppContext;
use crate::domain::Operation;

/// Print every operation signature.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<()> {
    app.renderer().render_signatures(&Operation::ALL)
}

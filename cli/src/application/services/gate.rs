//! Destructive action gate.

use anyhow::Result;

use crate::application::ports::Confirmer;

pub const DESTROY_PROMPT: &str = "Do you really want to destroy this linode? [Y/n]";

/// Whether an answer to a `[Y/n]` prompt declines.
///
/// Only an explicit `n`/`N` declines. Everything else, including an empty
/// answer, proceeds.
#[must_use]
pub fn answer_declines(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("n")
}

/// Ask before destroying, unless `force` is set.
///
/// Returns `true` to proceed.
///
/// # Errors
///
/// Returns an error if the prompt cannot be shown or read.
pub fn confirm_destroy(confirmer: &impl Confirmer, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }
    let answer = confirmer.ask(DESTROY_PROMPT)?;
    Ok(!answer_declines(&answer))
}

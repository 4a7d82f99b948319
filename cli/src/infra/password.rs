//! Root password generation for new linodes.

use rand::Rng;
use rand::distr::Alphanumeric;

pub const PASSWORD_LEN: usize = 32;

/// A random alphanumeric root password.
#[must_use]
pub fn generate_root_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(PASSWORD_LEN)
        .map(char::from)
        .collect()
}

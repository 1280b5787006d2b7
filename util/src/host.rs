//! Host platform utility functions

use std::path::PathBuf;

/// Environment variable holding the software root directory.
pub const SW_ROOT_ENV_VAR: &str = "KIN_SW_ROOT";

/// Get the software root directory, which contains the `params` directory and
/// is where sessions are created.
pub fn get_sw_root() -> Result<PathBuf, std::env::VarError> {
    std::env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}

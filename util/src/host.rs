//! Host platform utility functions

use std::path::PathBuf;

/// Environment variable giving the root of the software installation.
///
/// Parameter files, route files and session directories are all located
/// relative to this root.
pub const SW_ROOT_ENV_VAR: &str = "SHUTTLE_SW_ROOT";

/// Get the path to the software root directory.
///
/// Returns `Err` if the root environment variable is not set.
pub fn get_shuttle_sw_root() -> Result<PathBuf, std::env::VarError> {
    std::env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}

//! Docker config file: location, atomic JSON I/O and the credHelpers merge.
pub mod path;
pub mod io;
pub mod merge;
pub mod updater;

pub use path::{config_path, config_path_for_home, expand_user_path};
pub use io::{load, save, write_atomic};
pub use merge::{ensure_cred_helpers, CRED_HELPERS};
pub use updater::Updater;

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// `~/.docker/config.json` for the current user.
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_default();
    config_path_for_home(&home)
}

pub fn config_path_for_home(home: &Path) -> Result<PathBuf> {
    let home = normalize(home);
    if is_unusable_home(&home) {
        return Err(Error::InvalidHomeDirectory(home));
    }
    Ok(home.join(".docker").join("config.json"))
}

/// Expand a leading `~` in a user supplied path (`--config ~/x.json`).
pub fn expand_user_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Lexical clean-up: drops `.` and folds `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` above the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            _ => out.push(comp),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

fn is_unusable_home(home: &Path) -> bool {
    home.as_os_str().is_empty()
        || home == Path::new(".")
        || home
            .components()
            .all(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
}

use tracing::{debug, info};

use crate::config::Updater;
use crate::error::{Error, Result};
use crate::identity::{EndpointResolver, IdentityResolver};

pub const DEFAULT_HELPER: &str = "ecr-login";

#[derive(Debug, Clone)]
pub struct EnableOptions {
    pub helper: String,
    /// Appended after the resolved registries.
    pub extra_registries: Vec<String>,
    pub dry_run: bool,
}

impl Default for EnableOptions {
    fn default() -> Self {
        Self { helper: DEFAULT_HELPER.to_string(), extra_registries: Vec::new(), dry_run: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    Unchanged,
    WouldUpdate,
    NoRegistries,
}

/// Resolve identity, derive registries and merge them into the config file.
pub fn run<I, E>(updater: &Updater, identity: &I, endpoints: &E, opts: &EnableOptions) -> Result<Outcome>
where
    I: IdentityResolver + ?Sized,
    E: EndpointResolver + ?Sized,
{
    let id = identity.resolve_identity()?;
    if id.region.is_empty() {
        return Err(Error::MissingRegion);
    }
    if id.account.is_empty() {
        return Err(Error::MissingAccount);
    }

    let mut registries = endpoints.resolve_endpoints(&id.region, &id.account);
    debug!(count = registries.len(), region = %id.region, "resolved registries");
    registries.extend(opts.extra_registries.iter().cloned());
    if registries.is_empty() {
        return Ok(Outcome::NoRegistries);
    }

    if opts.dry_run {
        let pending = updater.pending_cred_helpers(&opts.helper, &registries)?;
        return Ok(if pending { Outcome::WouldUpdate } else { Outcome::Unchanged });
    }

    let updated = updater.ensure_cred_helpers(&opts.helper, &registries)?;
    info!(updated, path = %updater.path().display(), "done");
    Ok(if updated { Outcome::Updated } else { Outcome::Unchanged })
}

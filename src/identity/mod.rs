//! Who we are in AWS and which ECR registries that gives us.
//!
//! The config updater only needs a region, an account and a list of
//! hostnames; this module gets them by asking the `aws` CLI and a built-in
//! partition table.
pub mod endpoints;

use std::env;
use std::process::Command;

use serde::Deserialize;
use tracing::debug;

use crate::error::IdentityError;

pub use endpoints::EcrEndpoints;

/// Region and account of the current caller. Either may be empty when the
/// environment does not say; the caller decides how to report that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub region: String,
    pub account: String,
}

pub trait IdentityResolver {
    fn resolve_identity(&self) -> Result<Identity, IdentityError>;
}

pub trait EndpointResolver {
    /// Registry hostnames for the given identity, possibly none.
    fn resolve_endpoints(&self, region: &str, account: &str) -> Vec<String>;
}

/// Resolves the identity through the `aws` command line tool, skipping any
/// lookup that an explicit value already answers.
#[derive(Debug, Clone)]
pub struct AwsCli {
    program: String,
    profile: Option<String>,
    region: Option<String>,
    account: Option<String>,
    region_vars: &'static [&'static str],
}

/// Environment variables consulted for the region, in order.
pub const REGION_VARS: &[&str] = &["AWS_REGION", "AWS_DEFAULT_REGION"];

impl Default for AwsCli {
    fn default() -> Self {
        Self {
            program: "aws".into(),
            profile: None,
            region: None,
            account: None,
            region_vars: REGION_VARS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallerIdentity {
    #[serde(rename = "Account", default)]
    account: Option<String>,
}

impl AwsCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn profile(mut self, profile: Option<String>) -> Self {
        self.profile = non_blank(profile);
        self
    }

    pub fn region(mut self, region: Option<String>) -> Self {
        self.region = non_blank(region);
        self
    }

    pub fn account(mut self, account: Option<String>) -> Self {
        self.account = non_blank(account);
        self
    }

    pub fn region_vars(mut self, vars: &'static [&'static str]) -> Self {
        self.region_vars = vars;
        self
    }

    fn lookup_region(&self) -> Result<String, IdentityError> {
        if let Some(r) = &self.region {
            return Ok(r.clone());
        }
        for &var in self.region_vars {
            if let Some(r) = non_blank(env::var(var).ok()) {
                debug!(var, region = %r, "region from environment");
                return Ok(r);
            }
        }
        // `configure get` exits non-zero with no output when the key is unset
        match self.run(&["configure", "get", "region"]) {
            Ok(out) => Ok(out.trim().to_string()),
            Err(IdentityError::Command { stderr, .. }) if stderr.trim().is_empty() => Ok(String::new()),
            Err(e) => Err(e),
        }
    }

    fn lookup_account(&self, region: &str) -> Result<String, IdentityError> {
        if let Some(a) = &self.account {
            return Ok(a.clone());
        }
        let out = self.run(&["sts", "get-caller-identity", "--output", "json", "--region", region])?;
        parse_caller_identity(&out)
    }

    fn run(&self, args: &[&str]) -> Result<String, IdentityError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(p) = &self.profile {
            cmd.arg("--profile").arg(p);
        }
        debug!(program = %self.program, ?args, "running");

        let output = cmd.output().map_err(|source| IdentityError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        if !output.status.success() {
            return Err(IdentityError::Command {
                program: self.program.clone(),
                args: args.join(" "),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl IdentityResolver for AwsCli {
    fn resolve_identity(&self) -> Result<Identity, IdentityError> {
        let region = self.lookup_region()?;
        // STS refuses to run without a region; leave the account unknown
        if region.is_empty() && self.account.is_none() {
            debug!("no region resolved, skipping caller identity lookup");
            return Ok(Identity { region, account: String::new() });
        }
        let account = self.lookup_account(&region)?;
        debug!(%region, %account, "resolved identity");
        Ok(Identity { region, account })
    }
}

fn parse_caller_identity(raw: &str) -> Result<String, IdentityError> {
    let identity: CallerIdentity = serde_json::from_str(raw)?;
    Ok(identity.account.unwrap_or_default())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

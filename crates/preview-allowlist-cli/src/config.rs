use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Parser;
use preview_allowlist_core::{DeploymentContext, ReconcileError};

use crate::auth::ManagementCredentials;
use crate::cli::{Cli, ConnectionArgs, DeployArgs};

/// Validated configuration of one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: ManagementCredentials,
    pub client_id: String,
    pub context: DeploymentContext,
}

impl Settings {
    /// Validates the parsed options.
    ///
    /// Every missing required value is reported, named after its environment
    /// variable. Credentials, client id and `DEPLOY_URL` must also be
    /// non-empty; the path lists only need to be set, and an empty list is
    /// expanded verbatim. An empty `DEPLOY_PRIME_URL` means no prime URL.
    pub fn from_args(
        connection: &ConnectionArgs,
        deploy: &DeployArgs,
    ) -> Result<Self, ReconcileError> {
        let mut missing = Vec::new();

        let domain = required("AUTH0_DOMAIN", &connection.domain, &mut missing);
        let mgmt_id = required(
            "AUTH0_MANAGEMENT_CLIENT_ID",
            &connection.management_client_id,
            &mut missing,
        );
        let mgmt_secret = required(
            "AUTH0_MANAGEMENT_CLIENT_SECRET",
            &connection.management_client_secret,
            &mut missing,
        );
        let client_id = required("GATSBY_AUTH0_CLIENTID", &connection.client_id, &mut missing);
        let callback_paths = present(
            "AUTH0_CALLBACK_PATHNAMES",
            &deploy.callback_paths,
            &mut missing,
        );
        let logout_paths = present("AUTH0_LOGOUT_PATHNAMES", &deploy.logout_paths, &mut missing);
        let deploy_url = required("DEPLOY_URL", &deploy.deploy_url, &mut missing);

        if !missing.is_empty() {
            return Err(ReconcileError::configuration(missing));
        }

        let context = DeploymentContext::new(deploy_url, callback_paths, logout_paths)
            .with_secondary_url(deploy.deploy_prime_url.clone());

        Ok(Self {
            credentials: ManagementCredentials::new(domain, mgmt_id, mgmt_secret),
            client_id: client_id.to_string(),
            context,
        })
    }
}

fn required<'a>(
    name: &'static str,
    value: &'a Option<String>,
    missing: &mut Vec<&'static str>,
) -> &'a str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => {
            missing.push(name);
            ""
        }
    }
}

/// Like [`required`], but accepts a set-but-empty value.
fn present<'a>(
    name: &'static str,
    value: &'a Option<String>,
    missing: &mut Vec<&'static str>,
) -> &'a str {
    match value.as_deref() {
        Some(v) => v,
        None => {
            missing.push(name);
            ""
        }
    }
}

/// What became of the dotenv file while parsing options.
#[derive(Debug)]
pub enum EnvFile {
    Loaded(PathBuf),
    /// `explicit` is set when the path came from `--env-file`.
    Absent { path: PathBuf, explicit: bool },
    Failed {
        path: PathBuf,
        error: dotenvy::Error,
    },
}

/// Parses options, loading `.env.<CONTEXT>` (or `--env-file`) first so its
/// values can fill options that are backed by environment variables.
pub fn parse_cli_from(args: &[OsString]) -> Result<(Cli, EnvFile), clap::Error> {
    let cli = Cli::try_parse_from(args)?;
    let path = env_file_path(cli.env_file.as_deref(), cli.context.as_deref());
    match load_env_file(&path) {
        // Re-parse so the freshly loaded variables are picked up.
        Ok(true) => Ok((Cli::try_parse_from(args)?, EnvFile::Loaded(path))),
        Ok(false) => {
            let explicit = cli.env_file.is_some();
            Ok((cli, EnvFile::Absent { path, explicit }))
        }
        Err(error) => Ok((cli, EnvFile::Failed { path, error })),
    }
}

/// The dotenv file for a run: an explicit path, else `.env.<context>`,
/// else `.env`.
pub fn env_file_path(explicit: Option<&Path>, context: Option<&str>) -> PathBuf {
    match (explicit, context) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(ctx)) if !ctx.is_empty() => PathBuf::from(format!(".env.{ctx}")),
        _ => PathBuf::from(".env"),
    }
}

/// Loads a dotenv file into the process environment.
///
/// Variables already set take precedence. Returns `Ok(false)` when the file
/// does not exist.
pub fn load_env_file(path: &Path) -> Result<bool, dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(dotenvy::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "preview-allowlist")]
#[command(about = "Register a deploy preview URL on an Auth0 client's allow-lists")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub deploy: DeployArgs,

    /// Build context; selects the `.env.<CONTEXT>` file to load
    #[arg(long, env = "CONTEXT")]
    pub context: Option<String>,

    /// dotenv file to load instead of `.env.<CONTEXT>`
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Compute the update without submitting it
    #[arg(long)]
    pub dry_run: bool,

    /// Report format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Clone, Copy, Debug, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Management API access. All values are required; they are validated
/// together so every missing one is reported at once.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct ConnectionArgs {
    /// Auth0 tenant domain (e.g. my-tenant.eu.auth0.com) or base URL
    #[arg(long, env = "AUTH0_DOMAIN")]
    pub domain: Option<String>,

    /// Client ID of the machine-to-machine management application
    #[arg(long, env = "AUTH0_MANAGEMENT_CLIENT_ID")]
    pub management_client_id: Option<String>,

    /// Client secret of the management application
    #[arg(long, env = "AUTH0_MANAGEMENT_CLIENT_SECRET", hide_env_values = true)]
    pub management_client_secret: Option<String>,

    /// Client ID of the application whose allow-lists are updated
    #[arg(long, env = "GATSBY_AUTH0_CLIENTID")]
    pub client_id: Option<String>,
}

#[derive(clap::Args, Debug, Default, Clone)]
pub struct DeployArgs {
    /// Deploy preview URL
    #[arg(long, env = "DEPLOY_URL")]
    pub deploy_url: Option<String>,

    /// Canonical deploy URL, registered alongside the preview URL
    #[arg(long, env = "DEPLOY_PRIME_URL")]
    pub deploy_prime_url: Option<String>,

    /// Comma-separated callback paths (e.g. auth/callback,silent-renew)
    #[arg(long, env = "AUTH0_CALLBACK_PATHNAMES")]
    pub callback_paths: Option<String>,

    /// Comma-separated logout paths
    #[arg(long, env = "AUTH0_LOGOUT_PATHNAMES")]
    pub logout_paths: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_from([
            "preview-allowlist",
            "--domain",
            "tenant.auth0.com",
            "--deploy-url",
            "https://deploy-1.example",
            "--callback-paths",
            "auth/callback",
            "--dry-run",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.connection.domain.as_deref(), Some("tenant.auth0.com"));
        assert_eq!(
            cli.deploy.deploy_url.as_deref(),
            Some("https://deploy-1.example")
        );
        assert_eq!(cli.deploy.callback_paths.as_deref(), Some("auth/callback"));
        assert!(cli.dry_run);
        assert_eq!(cli.format, OutputFormat::Json);
    }
}

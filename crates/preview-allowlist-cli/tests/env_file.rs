//! Option parsing with a dotenv file in play.

use std::ffi::OsString;

use preview_allowlist_cli::config::{EnvFile, parse_cli_from};

fn args(extra: &[&str]) -> Vec<OsString> {
    std::iter::once("preview-allowlist")
        .chain(extra.iter().copied())
        .map(OsString::from)
        .collect()
}

#[test]
fn test_env_file_fills_env_backed_options() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join(".env.deploy-preview");
    std::fs::write(
        &path,
        "GATSBY_AUTH0_CLIENTID=spa-from-dotenv\nAUTH0_LOGOUT_PATHNAMES=auth/signout\n",
    )
    .expect("write env file");

    let (cli, env_file) = parse_cli_from(&args(&[
        "--env-file",
        path.to_str().unwrap(),
        "--logout-paths",
        "auth/logout",
    ]))
    .unwrap();

    assert!(matches!(env_file, EnvFile::Loaded(ref p) if *p == path));
    assert_eq!(cli.connection.client_id.as_deref(), Some("spa-from-dotenv"));
    // Flags still win over the file.
    assert_eq!(cli.deploy.logout_paths.as_deref(), Some("auth/logout"));
}

#[test]
fn test_missing_explicit_env_file_is_reported() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join(".env.nowhere");

    let (cli, env_file) =
        parse_cli_from(&args(&["--env-file", path.to_str().unwrap()])).unwrap();

    assert_eq!(cli.env_file.as_deref(), Some(path.as_path()));
    assert!(matches!(
        env_file,
        EnvFile::Absent { ref path, explicit: true } if path.ends_with(".env.nowhere")
    ));
}

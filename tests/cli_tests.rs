use anyhow::Result;
use atp::cli::Cli;
use clap::error::ErrorKind;
use clap::Parser;

#[test]
fn test_cli_creation() -> Result<()> {
    let args = vec!["atp", "-a", "get", "-l", "allowlist", "-D", "example.com"];
    let cli = Cli::try_parse_from(args)?;

    assert_eq!(cli.action, vec!["get".to_string()]);
    assert_eq!(cli.list, vec!["allowlist".to_string()]);
    assert_eq!(cli.domain, vec!["example.com".to_string()]);
    assert!(cli.ip.is_empty());
    assert!(cli.url.is_empty());

    // Default values
    assert_eq!(cli.host, "api.sky.junipersecurity.net");
    assert_eq!(cli.api_version, "v2");
    assert_eq!(cli.product, "skyatp");
    assert_eq!(cli.debug, 0);

    Ok(())
}

#[test]
fn test_entity_flag_without_argument() -> Result<()> {
    // -D is followed by another flag, so it takes no value
    let cli = Cli::try_parse_from(["atp", "-D", "-l", "blocklist"])?;
    assert_eq!(cli.domain, vec![String::new()]);
    assert_eq!(cli.list, vec!["blocklist".to_string()]);

    let cli = Cli::try_parse_from(["atp", "-l", "blocklist", "--url"])?;
    assert_eq!(cli.url, vec![String::new()]);

    Ok(())
}

#[test]
fn test_repeated_flags_are_collected() -> Result<()> {
    let cli = Cli::try_parse_from(["atp", "-p", "-p", "-I", "-a", "get", "-a", "add"])?;
    assert_eq!(cli.ping, 2);
    assert_eq!(cli.infected_hosts, 1);
    assert_eq!(cli.action.len(), 2);

    let cli = Cli::try_parse_from(["atp", "-D", "a.com", "-i", "-u", "b.com"])?;
    assert_eq!(cli.domain, vec!["a.com".to_string()]);
    assert_eq!(cli.ip, vec![String::new()]);
    assert_eq!(cli.url, vec!["b.com".to_string()]);

    Ok(())
}

#[test]
fn test_long_flag_spellings() -> Result<()> {
    let cli = Cli::try_parse_from([
        "atp",
        "--ping",
        "--no_ssl_verify",
        "--debug",
        "--token",
        "abc",
    ])?;
    assert_eq!(cli.ping, 1);
    assert_eq!(cli.no_ssl_verify, 1);
    assert_eq!(cli.debug, 1);
    assert_eq!(cli.token.as_deref(), Some("abc"));

    let cli = Cli::try_parse_from(["atp", "--no-ssl-verify", "--ih"])?;
    assert_eq!(cli.no_ssl_verify, 1);
    assert_eq!(cli.infected_hosts, 1);

    Ok(())
}

#[test]
fn test_help_flags() {
    for flag in ["-h", "-?", "--help"] {
        let err = Cli::try_parse_from(["atp", flag]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}

#[test]
fn test_version_flag_is_lowercase_v() -> Result<()> {
    let cli = Cli::try_parse_from(["atp", "-v"])?;
    assert_eq!(cli.version, 1);
    Ok(())
}

#[test]
fn test_endpoint_overrides() -> Result<()> {
    let cli = Cli::try_parse_from([
        "atp",
        "-p",
        "--host",
        "atp.example.net",
        "--api-version",
        "v3",
        "--product",
        "cloudatp",
    ])?;
    assert_eq!(cli.host, "atp.example.net");
    assert_eq!(cli.api_version, "v3");
    assert_eq!(cli.product, "cloudatp");
    assert!(cli.base_uri.is_none());
    Ok(())
}

use clap::Parser;
use lmstudio_bridge::config::{CliArgs, DEFAULT_API_BASE};
use lmstudio_bridge::Error;
use tokio_test::{assert_err, assert_ok};

fn parse(args: &[&str]) -> CliArgs
{   let argv = std::iter::once("lmstudio-bridge").chain(args.iter().copied());
    assert_ok!(CliArgs::try_parse_from(argv))
}

#[test]
fn test_cli_defaults()
{   let args = parse(&[]);
    if std::env::var_os("LMSTUDIO_API_BASE").is_none()
    {   assert_eq!(args.api_base, DEFAULT_API_BASE);
        let config = assert_ok!(args.bridge_config());
        assert_eq!(config.api_base, "http://localhost:1234/v1");
    }
    assert!(!args.use_system_proxy);
    assert_eq!(args.server_info().name, "lmstudio-bridge");
    assert_eq!(args.server_info().version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_cli_flags_reach_bridge_config()
{   let args = parse(&[
      "--api-base", "http://127.0.0.1:9000/v1/"
    , "--default-model", "qwen2.5-7b-instruct"
    , "--timeout-secs", "30"
    , "--use-system-proxy"
    , "--server-name", "local-llm"
    , "--log-level", "debug"
    ]);
    assert_eq!(args.log_level, "debug");

    let config = assert_ok!(args.bridge_config());
    assert_eq!(config.api_base, "http://127.0.0.1:9000/v1");
    assert_eq!(config.default_model.as_deref(), Some("qwen2.5-7b-instruct"));
    assert_eq!(config.timeout_secs, Some(30));
    assert!(config.use_system_proxy);
    assert_eq!(args.server_info().name, "local-llm");
}

#[test]
fn test_cli_blank_default_model_is_unset()
{   let args = parse(&["--api-base", "http://localhost:1234/v1", "--default-model", "  "]);
    let config = assert_ok!(args.bridge_config());
    assert_eq!(config.default_model, None);
}

#[test]
fn test_cli_invalid_api_base()
{   for base in ["not a url", "ftp://localhost:1234/v1"]
    {   let args = parse(&["--api-base", base]);
        let err = assert_err!(args.bridge_config());
        assert!(matches!(err, Error::InvalidConfiguration(_)), "{}: {:?}", base, err);
    }
}

#[test]
fn test_cli_rejects_bad_timeout()
{   let argv = ["lmstudio-bridge", "--timeout-secs", "soon"];
    assert!(CliArgs::try_parse_from(argv).is_err());
}

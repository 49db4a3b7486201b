use super::*;

#[test]
fn cli_parse_fallback() {
    match parse(&["chunkguard", "fallback", "--css", "/static/css/main.css"]) {
        CliCommand::Fallback {
            local_host_loaded,
            page,
        } => {
            assert!(!local_host_loaded);
            assert_eq!(page.css, vec!["/static/css/main.css"]);
        }
        _ => panic!("expected Fallback"),
    }
}

#[test]
fn cli_parse_fallback_local_host_loaded() {
    match parse(&["chunkguard", "fallback", "--local-host-loaded"]) {
        CliCommand::Fallback {
            local_host_loaded, ..
        } => assert!(local_host_loaded),
        _ => panic!("expected Fallback"),
    }
}

#[test]
fn cli_parse_config() {
    assert!(matches!(parse(&["chunkguard", "config"]), CliCommand::Config));
}

#[test]
fn cli_rejects_missing_chunk() {
    assert!(Cli::try_parse_from(["chunkguard", "simulate"]).is_err());
}

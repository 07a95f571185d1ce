use std::path::Path;

use spendbook::config::{Config, ConfigError};

#[test]
fn parses_full_configuration() {
    let toml = r#"
[telegram]
token = "123:abc"

[google_sheets]
spreadsheet_id = "sheet1"
credentials_path = "cred.json"
token_cache = "cache.json"
access_token = "ya29.token"
"#;
    let cfg: Config = toml::from_str(toml).unwrap();
    assert_eq!(cfg.telegram.token, "123:abc");
    assert_eq!(cfg.google_sheets.spreadsheet_id, "sheet1");
    assert_eq!(cfg.google_sheets.credentials_path, "cred.json");
    assert_eq!(cfg.google_sheets.token_cache, "cache.json");
    assert_eq!(cfg.google_sheets.access_token.as_deref(), Some("ya29.token"));
}

#[test]
fn fills_in_credential_path_defaults() {
    let toml = r#"
[telegram]
token = "123:abc"

[google_sheets]
spreadsheet_id = "sheet1"
"#;
    let cfg: Config = toml::from_str(toml).unwrap();
    assert_eq!(cfg.google_sheets.credentials_path, "credentials.json");
    assert_eq!(cfg.google_sheets.token_cache, "tokens.json");
    assert_eq!(cfg.google_sheets.access_token, None);
}

#[test]
fn rejects_configuration_without_token() {
    let toml = r#"
[telegram]

[google_sheets]
spreadsheet_id = "sheet1"
"#;
    let result: Result<Config, _> = toml::from_str(toml);
    assert!(result.is_err(), "config without telegram token should fail");
}

#[test]
fn missing_file_is_reported_as_such() {
    let err = Config::load(Path::new("definitely-not-here.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::MissingFile(_)));
}

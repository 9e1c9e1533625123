use super::*;

#[test]
fn default_config_is_valid() {
    assert!(validate(&ZurriConfig::default()).is_ok());
}

#[test]
fn empty_base_url_rejected() {
    let mut config = ZurriConfig::default();
    config.api.base_url = "  ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("api.base_url is empty"));
}

#[test]
fn non_http_base_url_rejected() {
    let mut config = ZurriConfig::default();
    config.api.base_url = "ws://example.com".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("must start with http"));
}

#[test]
fn errors_are_collected() {
    let mut config = ZurriConfig::default();
    config.api.connect_timeout_secs = 0;
    config.api.request_timeout_secs = 1000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("api.connect_timeout_secs = 0 is out of range [1, 60]"));
    assert!(err.contains("api.request_timeout_secs = 1000 is out of range [5, 600]"));
    assert!(err.contains("; "));
}

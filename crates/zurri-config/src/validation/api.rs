use super::helpers::validate_range;
use crate::schema::ZurriConfig;

pub(crate) fn validate_api(errors: &mut Vec<String>, config: &ZurriConfig) {
    let api = &config.api;

    let url = api.base_url.trim();
    if url.is_empty() {
        errors.push("api.base_url is empty".into());
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!("api.base_url = {url} must start with http:// or https://"));
    }

    validate_range(errors, "api.connect_timeout_secs", api.connect_timeout_secs, 1, 60);
    validate_range(errors, "api.request_timeout_secs", api.request_timeout_secs, 5, 600);
}

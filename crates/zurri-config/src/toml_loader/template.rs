//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Zurri client configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[api]
# base_url = "https://nexusbert-zurri.hf.space/api"
# connect_timeout_secs = 10     # 1-60
# request_timeout_secs = 120    # 5-600

[chat]
# show_timestamps = true
# show_attachments = true

[logging]
# level = "INFO"                # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ZurriError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("api error: {0}")]
    Api(String),

    #[error("chat error: {0}")]
    Chat(String),

    #[error("not logged in: {0}")]
    Auth(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("api.base_url is empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: api.base_url is empty"
        );
    }

    #[test]
    fn zurri_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: ZurriError = config_err.into();
        assert!(matches!(err, ZurriError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn zurri_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ZurriError = io_err.into();
        assert!(matches!(err, ZurriError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn zurri_error_other_variants() {
        let err = ZurriError::Api("HTTP 500".into());
        assert_eq!(err.to_string(), "api error: HTTP 500");

        let err = ZurriError::Chat("Maximum 10 files allowed".into());
        assert_eq!(err.to_string(), "chat error: Maximum 10 files allowed");

        let err = ZurriError::Auth("run `zurri login`".into());
        assert_eq!(err.to_string(), "not logged in: run `zurri login`");

        let err = ZurriError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}

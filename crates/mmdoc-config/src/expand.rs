//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a config value.
///
/// `field` names the config path and is only used for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_value_unchanged() {
        assert_eq!(expand_env("mmdc", "renderer.command").unwrap(), "mmdc");
    }

    #[test]
    fn test_expand_set_variable() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MMDOC_TEST_EXPAND_BIN", "/opt/bin/mmdc");
        }

        let expanded = expand_env("${MMDOC_TEST_EXPAND_BIN}", "renderer.command").unwrap();
        assert_eq!(expanded, "/opt/bin/mmdc");

        unsafe {
            std::env::remove_var("MMDOC_TEST_EXPAND_BIN");
        }
    }

    #[test]
    fn test_expand_default_value() {
        let expanded = expand_env("${MMDOC_TEST_UNSET_DIR:-out/diagrams}", "output.dir").unwrap();
        assert_eq!(expanded, "out/diagrams");
    }

    #[test]
    fn test_expand_unset_variable_errors() {
        let err = expand_env("${MMDOC_TEST_DEFINITELY_UNSET}", "output.dir").unwrap_err();
        match err {
            ConfigError::EnvVar { field, message } => {
                assert_eq!(field, "output.dir");
                assert!(message.contains("MMDOC_TEST_DEFINITELY_UNSET"));
            }
            other => panic!("Expected ConfigError::EnvVar, got {other:?}"),
        }
    }
}

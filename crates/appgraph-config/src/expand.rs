//! `${VAR}` references in configuration strings.
//!
//! `${VAR:-default}` falls back to `default` when `VAR` is unset. A bare
//! `$VAR` is left as written, and an unset `${VAR}` is an error naming the
//! config field.

use crate::ConfigError;

/// Unset variable named by a `${VAR}` reference.
struct MissingVar(String);

/// Expand `${VAR}` references in `value`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let lookup = |var: &str| {
        std::env::var(var)
            .map(Some)
            .map_err(|_| MissingVar(var.to_owned()))
    };
    match shellexpand::env_with_context(value, lookup) {
        Ok(expanded) => Ok(expanded.into_owned()),
        Err(err) => Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", err.cause.0),
        }),
    }
}

/// Expand an optional value in place.
pub(crate) fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(raw) = value.as_deref() {
        *value = Some(expand_env(raw, field)?);
    }
    Ok(())
}

// Collector failures the collect loop reacts to by kind.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectError {
    /// The provider answered 429; stop asking it for this run.
    #[error("Rate limit reached for {engine}")]
    RateLimited { engine: String },

    #[error("{engine} collector is disabled: {reason}")]
    Disabled { engine: String, reason: String },

    #[error("{engine} requires an API key; set {env_var} or api_key in the config")]
    MissingApiKey {
        engine: String,
        env_var: &'static str,
    },
}

impl CollectError {
    /// Whether this error should end the current collector's run.
    pub fn is_fatal_for_collector(&self) -> bool {
        matches!(self, CollectError::RateLimited { .. })
    }
}

/// True when `err` (or anything it wraps) is a rate-limit stop.
pub fn is_rate_limited(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<CollectError>()
            .is_some_and(CollectError::is_fatal_for_collector)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_rate_limit_detected_through_context() {
        let err: anyhow::Result<()> = Err(CollectError::RateLimited {
            engine: "searxng".into(),
        })
        .context("page 2");
        assert!(is_rate_limited(&err.unwrap_err()));
    }

    #[test]
    fn test_other_errors_are_not_rate_limits() {
        let disabled = anyhow::Error::new(CollectError::Disabled {
            engine: "ddg".into(),
            reason: "no stable endpoint".into(),
        });
        assert!(!is_rate_limited(&disabled));
        assert!(!is_rate_limited(&anyhow::anyhow!("Rate limit reached")));
    }

    #[test]
    fn test_messages() {
        let err = CollectError::MissingApiKey {
            engine: "brave".into(),
            env_var: "BRAVE_API_KEY",
        };
        assert_eq!(
            err.to_string(),
            "brave requires an API key; set BRAVE_API_KEY or api_key in the config"
        );
    }
}

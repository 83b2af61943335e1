//! Configuration for Gangway
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;

/// Gangway - progress and access-control core for the client portal
#[derive(Parser, Debug, Clone)]
#[command(name = "gangway")]
#[command(about = "Progress and access-control core for the Gangway client portal")]
pub struct Args {
    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "gangway")]
    pub mongodb_db: String,

    /// Secret for stakeholder session signing (required in production)
    #[arg(long, env = "SESSION_SECRET")]
    pub session_secret: Option<String>,

    /// Stakeholder session expiry in seconds (default 14 days)
    #[arg(long, env = "SESSION_EXPIRY_SECONDS", default_value = "1209600")]
    pub session_expiry_seconds: u64,

    /// Enable development mode (permits a built-in insecure session secret)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Organization to dump dashboard and insights reports for
    #[arg(long, env = "ORG_ID")]
    pub org_id: Option<String>,
}

impl Args {
    /// Get effective session secret (uses a fixed value in dev mode)
    pub fn session_secret(&self) -> Option<String> {
        if self.dev_mode {
            Some(
                self.session_secret
                    .clone()
                    .unwrap_or_else(|| "dev-mode-secret-not-for-production-use-123456".to_string()),
            )
        } else {
            self.session_secret.clone()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.dev_mode {
            match &self.session_secret {
                None => return Err("SESSION_SECRET is required in production mode".to_string()),
                Some(secret) if secret.len() < 32 => {
                    return Err("SESSION_SECRET must be at least 32 characters".to_string())
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            mongodb_uri: "mongodb://localhost:27017".into(),
            mongodb_db: "gangway".into(),
            session_secret: None,
            session_expiry_seconds: 1_209_600,
            dev_mode: false,
            log_level: "info".into(),
            org_id: None,
        }
    }

    #[test]
    fn test_production_requires_secret() {
        let args = base_args();
        assert!(args.validate().is_err());

        let mut short = base_args();
        short.session_secret = Some("short".into());
        assert!(short.validate().is_err());

        let mut ok = base_args();
        ok.session_secret = Some("a-long-enough-secret-for-production-use!".into());
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_dev_mode_falls_back_to_builtin_secret() {
        let mut args = base_args();
        args.dev_mode = true;
        assert!(args.validate().is_ok());

        // the fallback secret must satisfy the signer's own validation,
        // since the binary builds a SessionSigner straight from it
        let secret = args.session_secret().unwrap();
        assert!(crate::auth::SessionSigner::new(secret, args.session_expiry_seconds).is_ok());
    }
}

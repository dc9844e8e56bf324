use std::net::SocketAddr;

use anyhow::{Context, bail};

use fso_api::validation::{PasswordPolicy, Preset, UsernamePolicy};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

/// Special `FSO_DB_PATH` value for a throwaway database.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: String,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub password_preset: Preset,
    pub username_preset: Preset,
    pub password_min_length: Option<usize>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt_secret = var("FSO_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("FSO_JWT_SECRET is unset or still a placeholder");
        }

        let port: u16 = match var("FSO_PORT") {
            Some(raw) => raw.parse().with_context(|| format!("FSO_PORT '{raw}' is not a port"))?,
            None => 3001,
        };

        let token_ttl_secs: i64 = match var("FSO_TOKEN_TTL_SECS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("FSO_TOKEN_TTL_SECS '{raw}' is not a number"))?,
            None => 3600,
        };
        if token_ttl_secs <= 0 {
            bail!("FSO_TOKEN_TTL_SECS must be positive");
        }

        let password_preset: Preset = match var("FSO_PASSWORD_POLICY") {
            Some(raw) => raw.parse().map_err(anyhow::Error::msg)?,
            None => Preset::Bloglist,
        };

        // Follows the password preset unless set on its own.
        let username_preset: Preset = match var("FSO_USERNAME_POLICY") {
            Some(raw) => raw.parse().map_err(anyhow::Error::msg)?,
            None => password_preset,
        };

        let password_min_length: Option<usize> = var("FSO_PASSWORD_MIN_LENGTH")
            .map(|raw| {
                raw.parse()
                    .with_context(|| format!("FSO_PASSWORD_MIN_LENGTH '{raw}' is not a number"))
            })
            .transpose()?;

        Ok(Self {
            host: var("FSO_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: var("FSO_DB_PATH").unwrap_or_else(|| "fso.db".into()),
            jwt_secret,
            token_ttl_secs,
            password_preset,
            username_preset,
            password_min_length,
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn username_policy(&self) -> UsernamePolicy {
        UsernamePolicy::preset(self.username_preset)
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        let policy = PasswordPolicy::preset(self.password_preset);
        match self.password_min_length {
            Some(min) => policy.with_min_length(min),
            None => policy,
        }
    }
}

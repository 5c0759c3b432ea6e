//! Service configuration from environment-style lookups.
//!
//! Keys are `<PREFIX>_URL`, `<PREFIX>_AUTH_TYPE`, `<PREFIX>_BEARER_TOKEN`,
//! `<PREFIX>_USERNAME`, `<PREFIX>_PASSWORD` and `<PREFIX>_DISABLE_SSL`.

use crate::auth::{Authenticator, BasicAuthenticator, BearerTokenAuthenticator, NoAuthAuthenticator};
use crate::types::*;
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_PREFIX: &str = "ASSISTANT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    NoAuth,
    BearerToken,
    Basic,
}

impl FromStr for AuthType {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "noauth" => Ok(AuthType::NoAuth),
            "bearertoken" => Ok(AuthType::BearerToken),
            "basic" => Ok(AuthType::Basic),
            other => Err(AssistantError::ConfigError(format!(
                "unsupported auth type `{}`",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub service_url: Option<String>,
    pub auth_type: AuthType,
    pub disable_ssl: bool,
    bearer_token: Option<SecureToken>,
    username: Option<String>,
    password: Option<SecureToken>,
}

impl ServiceConfig {
    /// Read configuration from process environment variables
    pub fn from_env(prefix: &str) -> AssistantResult<Self> {
        Self::from_lookup(prefix, |key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> AssistantResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |suffix: &str| {
            lookup(&format!("{}_{}", prefix, suffix)).filter(|v| !v.trim().is_empty())
        };

        let bearer_token = get("BEARER_TOKEN").map(SecureToken::new);
        let auth_type = match get("AUTH_TYPE") {
            Some(value) => value.parse()?,
            None if bearer_token.is_some() => AuthType::BearerToken,
            None => AuthType::NoAuth,
        };

        let disable_ssl = match get("DISABLE_SSL") {
            Some(value) => value.trim().parse::<bool>().map_err(|_| {
                AssistantError::ConfigError(format!(
                    "{}_DISABLE_SSL must be `true` or `false`, got `{}`",
                    prefix, value
                ))
            })?,
            None => false,
        };

        Ok(Self {
            service_url: get("URL"),
            auth_type,
            disable_ssl,
            bearer_token,
            username: get("USERNAME"),
            password: get("PASSWORD").map(SecureToken::new),
        })
    }

    /// Build the authenticator this configuration describes
    pub fn authenticator(&self) -> AssistantResult<Arc<dyn Authenticator>> {
        match self.auth_type {
            AuthType::NoAuth => Ok(Arc::new(NoAuthAuthenticator)),
            AuthType::BearerToken => {
                let token = self.bearer_token.as_ref().ok_or_else(|| {
                    AssistantError::ConfigError("bearer token auth selected but no token set".into())
                })?;
                Ok(Arc::new(BearerTokenAuthenticator::new(token.as_str())?))
            }
            AuthType::Basic => {
                let username = self.username.as_deref().unwrap_or_default();
                let password = self.password.as_ref().map(|p| p.as_str()).unwrap_or_default();
                Ok(Arc::new(BasicAuthenticator::new(username, password)?))
            }
        }
    }
}

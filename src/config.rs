use std::path::PathBuf;

use anyhow::{bail, Context};

use crate::auth::AuthContext;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub api_base: String,
    pub auth: AuthContext,
}

impl PortalConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = lookup("PORTAL_API_BASE")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let token = match (lookup("PORTAL_TOKEN"), lookup("PORTAL_TOKEN_FILE")) {
            (Some(token), _) => token,
            (None, Some(path)) => {
                let path = PathBuf::from(path);
                std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read token file {}", path.display()))?
            }
            (None, None) => bail!("PORTAL_TOKEN or PORTAL_TOKEN_FILE must be set"),
        };
        let token = token.trim();
        if token.is_empty() {
            bail!("portal token is empty");
        }

        Ok(Self {
            api_base,
            auth: AuthContext::new(token),
        })
    }
}

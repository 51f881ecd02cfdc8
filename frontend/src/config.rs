use thiserror::Error;

pub const DEFAULT_LOGIN_RELOAD_DELAY_MS: u32 = 1_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set at build time")]
    Missing(&'static str),
    #[error("LOGIN_RELOAD_DELAY_MS must be a number of milliseconds, got {0:?}")]
    InvalidDelay(String),
}

#[cfg(debug_assertions)]
fn default_supabase_url() -> Option<&'static str> {
    Some("http://localhost:54321") // local `supabase start`
}

#[cfg(not(debug_assertions))]
fn default_supabase_url() -> Option<&'static str> {
    None
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    /// Where the confirmation link in the verification email points.
    pub email_redirect_to: Option<String>,
}

impl SupabaseConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.anon_key.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub supabase: SupabaseConfig,
    pub login_reload_delay_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase: SupabaseConfig::default(),
            login_reload_delay_ms: DEFAULT_LOGIN_RELOAD_DELAY_MS,
        }
    }
}

impl AppConfig {
    /// Read the values baked in by the build (`SUPABASE_URL`, `SUPABASE_ANON_KEY`,
    /// `LOGIN_RELOAD_DELAY_MS`).
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_values(
            option_env!("SUPABASE_URL").or_else(default_supabase_url),
            option_env!("SUPABASE_ANON_KEY"),
            option_env!("LOGIN_RELOAD_DELAY_MS"),
        )
    }

    pub fn from_values(
        url: Option<&str>,
        anon_key: Option<&str>,
        reload_delay_ms: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let anon_key = anon_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;
        let login_reload_delay_ms = match reload_delay_ms {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidDelay(raw.to_string()))?,
            None => DEFAULT_LOGIN_RELOAD_DELAY_MS,
        };

        Ok(Self {
            supabase: SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key: anon_key.to_string(),
                email_redirect_to: None,
            },
            login_reload_delay_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_complete_values() {
        let config = AppConfig::from_values(
            Some("https://abc.supabase.co/"),
            Some("anon"),
            Some("250"),
        )
        .unwrap();
        assert_eq!(config.supabase.url, "https://abc.supabase.co");
        assert_eq!(config.supabase.anon_key, "anon");
        assert_eq!(config.login_reload_delay_ms, 250);
        assert!(config.supabase.is_configured());
    }

    #[test]
    fn delay_defaults_to_one_second() {
        let config = AppConfig::from_values(Some("http://localhost:54321"), Some("anon"), None).unwrap();
        assert_eq!(config.login_reload_delay_ms, 1_000);
    }

    #[test]
    fn missing_values_are_reported() {
        assert_eq!(
            AppConfig::from_values(None, Some("anon"), None),
            Err(ConfigError::Missing("SUPABASE_URL"))
        );
        assert_eq!(
            AppConfig::from_values(Some("http://localhost:54321"), Some("  "), None),
            Err(ConfigError::Missing("SUPABASE_ANON_KEY"))
        );
    }

    #[test]
    fn bad_delay_is_rejected() {
        assert_eq!(
            AppConfig::from_values(Some("http://x"), Some("anon"), Some("soon")),
            Err(ConfigError::InvalidDelay("soon".to_string()))
        );
    }

    #[test]
    fn default_config_is_unconfigured() {
        let config = AppConfig::default();
        assert!(!config.supabase.is_configured());
        assert_eq!(config.login_reload_delay_ms, DEFAULT_LOGIN_RELOAD_DELAY_MS);
    }
}

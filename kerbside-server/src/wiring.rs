//! Builds the service from command-line and environment configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::Args;

use kerbside_core::http::HttpSettings;
use kerbside_core::plugin::PluginRegistry;
use kerbside_core::service::KerbsideService;
use kerbside_geocode::GoogleCouncilLocator;
use kerbside_provider_melbourne as melbourne;
use kerbside_provider_monash as monash;

/// Upstream access settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Google Geocoding API key used to find the council for an address.
    #[arg(long, env = "KERBSIDE_GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: String,

    /// Timeout for each upstream HTTP request, in seconds.
    #[arg(long, env = "KERBSIDE_HTTP_TIMEOUT_SECS", default_value_t = 20)]
    pub http_timeout_secs: u64,

    /// User-Agent sent upstream. Nominatim requires one that identifies the app.
    #[arg(long, env = "KERBSIDE_USER_AGENT")]
    pub user_agent: Option<String>,
}

impl ConnectionArgs {
    /// HTTP settings derived from the arguments.
    #[must_use]
    pub fn http_settings(&self) -> HttpSettings {
        let defaults = HttpSettings::default();
        HttpSettings {
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            timeout: Duration::from_secs(self.http_timeout_secs),
        }
    }
}

/// Assemble the council lookup and every built-in council adapter.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the API key is blank.
pub fn build_service(args: &ConnectionArgs) -> anyhow::Result<KerbsideService> {
    let settings = args.http_settings();
    let client = settings.client().context("building HTTP client")?;

    let plugins = vec![
        melbourne::plugin(client.clone()),
        monash::plugin(settings),
    ];
    let registry = Arc::new(PluginRegistry::new(plugins));

    let locator = GoogleCouncilLocator::new(client, args.google_api_key.clone())
        .context("configuring council lookup")?;

    Ok(KerbsideService::new(registry, Arc::new(locator)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(user_agent: Option<&str>) -> ConnectionArgs {
        ConnectionArgs {
            google_api_key: "test-key".to_owned(),
            http_timeout_secs: 5,
            user_agent: user_agent.map(str::to_owned),
        }
    }

    #[test]
    fn user_agent_defaults_to_crate_name() {
        let settings = args(None).http_settings();
        assert!(settings.user_agent.starts_with("kerbside/"));
        assert_eq!(settings.timeout, Duration::from_secs(5));
    }

    #[test]
    fn explicit_user_agent_wins() {
        let settings = args(Some("bins@example.org")).http_settings();
        assert_eq!(settings.user_agent, "bins@example.org");
    }

    #[test]
    fn service_registers_built_in_councils() {
        let service = build_service(&args(None)).expect("service builds");
        let ids: Vec<String> = service
            .councils()
            .into_iter()
            .map(|(id, _name)| id.0)
            .collect();
        assert_eq!(ids, vec!["melbourne".to_owned(), "monash".to_owned()]);
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let mut blank = args(None);
        blank.google_api_key = "   ".to_owned();
        assert!(build_service(&blank).is_err());
    }
}

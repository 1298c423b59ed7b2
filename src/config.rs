use crate::domain::ad_type::AdType;
use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub logging: LoggingSettings,
    pub proxy: ProxySettings,
    pub auction: AuctionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub environment: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
    /// Append log output to this file instead of stdout
    #[serde(default)]
    pub file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProxySettings {
    pub max_request_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuctionSettings {
    pub publisher_id: String,
    pub bidder_url: String,
    pub dsp_url: String,
    pub dsp_ssp: String,
    pub dsp_spid: String,
    #[serde(default = "default_slot_mappings")]
    pub slot_mappings: HashMap<String, HashMap<AdType, String>>,
    #[serde(default = "default_fallback_slots")]
    pub fallback_slots: HashMap<AdType, String>,
}

fn default_slot_mappings() -> HashMap<String, HashMap<AdType, String>> {
    HashMap::from([
        (
            "com.truecaller".to_string(),
            HashMap::from([
                (AdType::Banner, "6931445".to_string()),
                (AdType::Video, "6931468".to_string()),
                (AdType::Native, "6931469".to_string()),
            ]),
        ),
        (
            "com.snapchat.android".to_string(),
            HashMap::from([
                (AdType::Banner, "snap_banner_slot_01".to_string()),
                (AdType::Video, "snap_video_slot_02".to_string()),
                (AdType::Native, "snap_native_slot_03".to_string()),
            ]),
        ),
    ])
}

fn default_fallback_slots() -> HashMap<AdType, String> {
    HashMap::from([
        (AdType::Banner, "default_banner_slot".to_string()),
        (AdType::Video, "default_video_slot".to_string()),
        (AdType::Native, "default_native_slot".to_string()),
    ])
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Self::defaults(&environment)?
            // Add configuration file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("RTB_ARBITER").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("application.host", "0.0.0.0")?
            .set_default("application.port", 8080)?
            .set_default("application.environment", environment)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("proxy.max_request_size", 10 * 1024 * 1024)?
            .set_default("auction.publisher_id", "")?
            .set_default("auction.bidder_url", "http://localhost:8000/openrtb2/auction")?
            .set_default(
                "auction.dsp_url",
                "https://mercury-dsp.jio.com/jiodsp/?spid=51",
            )?
            .set_default("auction.dsp_ssp", "abc")?
            .set_default("auction.dsp_spid", "51")
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn settings_with(toml: &str) -> Settings {
        Settings::defaults("test")
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_settings_can_be_loaded() {
        let settings = Settings::new();
        assert!(settings.is_ok());
    }

    #[test]
    fn test_defaults_match_deployment() {
        let settings = settings_with("");

        assert_eq!(settings.listen_address(), "0.0.0.0:8080");
        assert_eq!(
            settings.auction.bidder_url,
            "http://localhost:8000/openrtb2/auction"
        );
        assert_eq!(settings.auction.dsp_ssp, "abc");
        assert_eq!(settings.auction.dsp_spid, "51");
        assert_eq!(
            settings.auction.slot_mappings["com.truecaller"][&AdType::Banner],
            "6931445"
        );
        assert_eq!(
            settings.auction.fallback_slots[&AdType::Video],
            "default_video_slot"
        );
        assert!(settings.logging.file.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let settings = settings_with(
            r#"
            [application]
            port = 9090

            [auction]
            publisher_id = "156209"

            [auction.fallback_slots]
            banner = "house_banner"
            "#,
        );

        assert_eq!(settings.application.port, 9090);
        assert_eq!(settings.auction.publisher_id, "156209");
        assert_eq!(settings.auction.fallback_slots.len(), 1);
        assert_eq!(
            settings.auction.fallback_slots[&AdType::Banner],
            "house_banner"
        );
    }
}

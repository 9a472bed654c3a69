use std::env;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_CAL_BASE_URL: &str = "https://api.cal.com/v2";

/// Runtime configuration, read from the process environment exactly once at
/// startup and passed by reference to whoever needs it.
#[derive(Clone, Debug)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model: String,
    pub cal_api_key: Option<String>,
    pub cal_username: Option<String>,
    pub cal_base_url: String,
    /// When set, booking-creation failures are masked with a synthetic
    /// confirmed booking instead of surfacing an error.
    pub demo_mode: bool,
}

impl Config {
    /// Reads configuration from the environment. A missing model credential
    /// is fatal; missing calendar values only degrade the calendar calls
    /// that need them.
    pub fn from_env() -> anyhow::Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable is required"))?;

        let demo_mode = match env::var("CALBOT_DEMO_MODE") {
            Ok(v) => !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "off" | "no"),
            Err(_) => true,
        };

        Ok(Config {
            openai_api_key,
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            cal_api_key: env::var("CAL_API_KEY").ok().filter(|v| !v.is_empty()),
            cal_username: env::var("CAL_USERNAME").ok().filter(|v| !v.is_empty()),
            cal_base_url: env::var("CAL_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_CAL_BASE_URL.to_string()),
            demo_mode,
        })
    }
}

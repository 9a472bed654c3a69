mod calendar_tests;
mod status_tests;

use crate::config::Config;

/// Config pointing both remote services at an unreachable local port, so
/// every backend call exercises the degraded paths without the network.
pub fn test_config() -> Config {
    Config {
        openai_api_key: "test-key".to_string(),
        openai_base_url: "http://127.0.0.1:1".to_string(),
        model: "gpt-4".to_string(),
        cal_api_key: None,
        cal_username: None,
        cal_base_url: "http://127.0.0.1:1".to_string(),
        demo_mode: true,
    }
}

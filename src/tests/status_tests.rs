use crate::status_report;
use crate::tests::test_config;

#[test]
fn status_reports_model_service_availability() {
    let report = status_report(&test_config());
    assert_eq!(report["status"], "running");
    assert_eq!(report["openai_client"], "available");

    let mut config = test_config();
    config.openai_api_key = String::new();
    assert_eq!(status_report(&config)["openai_client"], "unavailable");
}

#[test]
fn status_reports_presence_but_never_credentials() {
    let mut config = test_config();
    config.cal_api_key = Some("cal-secret".to_string());
    config.cal_username = Some("acme".to_string());

    let report = status_report(&config);
    assert_eq!(report["cal_api_key"], "configured");
    assert_eq!(report["cal_username"], "acme");
    assert_eq!(report["demo_mode"], true);

    let rendered = report.to_string();
    assert!(!rendered.contains("cal-secret"));
    assert!(!rendered.contains("test-key"));

    config.cal_api_key = None;
    assert_eq!(status_report(&config)["cal_api_key"], "missing");
}

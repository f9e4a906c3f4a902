use cadence_test::app::cli::{parse_rule, read_rule};
use cadence_test::app::render::{expand, render};
use cadence_test::config::Settings;
use chrono::DateTime;

fn settings() -> Settings {
    Settings::from_toml_str("[recurrence]\ndefault_count = 4\ndefault_tz_id = \"America/Chicago\"\n")
        .expect("valid settings")
}

#[test_log::test]
fn rule_file_expands_with_configured_defaults() {
    let path = std::env::temp_dir().join(format!("cadence-rule-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{"frequency":"WEEKLY","byDay":"TU","byHour":7,"byMinute":0}"#,
    )
    .expect("write rule");

    let spec = read_rule(&path).expect("readable rule");
    std::fs::remove_file(&path).expect("remove rule");

    let start = DateTime::parse_from_rfc3339("2025-10-29T12:00:00-05:00").ok();
    let out = expand(spec, &settings(), start, None).expect("expands");

    // Chicago leaves daylight time on 2025-11-02.
    assert_eq!(
        out,
        vec![
            "2025-11-04T07:00:00-06:00",
            "2025-11-11T07:00:00-06:00",
            "2025-11-18T07:00:00-06:00",
            "2025-11-25T07:00:00-06:00",
        ]
    );
}

#[test_log::test]
fn json_output_is_an_array_of_timestamps() {
    let spec = parse_rule(r#"{"frequency":"YEARLY","count":2,"tzId":"UTC"}"#).expect("valid rule");
    let start = DateTime::parse_from_rfc3339("2000-02-29T00:00:00Z").ok();
    let out = expand(spec, &settings(), start, None).expect("expands");
    let rendered = render(&out, true).expect("renders");
    let parsed: Vec<String> = serde_json::from_str(&rendered).expect("valid json");

    assert_eq!(
        parsed,
        vec!["2001-02-28T00:00:00+00:00", "2002-02-28T00:00:00+00:00"]
    );
}

#[test_log::test]
fn missing_rule_file_reports_path() {
    let err = read_rule(std::path::Path::new("/nonexistent/cadence-rule.json"))
        .expect_err("must fail");
    assert!(format!("{err:#}").contains("cadence-rule.json"));
}

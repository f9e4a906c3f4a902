use cadence_test::{collect, render, rule};

pub struct RecurrenceCase {
    pub name: &'static str,
    pub rule: &'static str,
    pub start: &'static str,
    pub count: Option<u32>,
    pub expected: &'static [&'static str],
}

#[expect(clippy::too_many_lines)]
pub fn recurrence_cases() -> Vec<RecurrenceCase> {
    vec![
        RecurrenceCase {
            name: "secondly_basic",
            rule: r#"{"frequency":"SECONDLY"}"#,
            start: "2012-01-01T09:00:00Z",
            count: Some(3),
            expected: &[
                "2012-01-01T09:00:01+00:00",
                "2012-01-01T09:00:02+00:00",
                "2012-01-01T09:00:03+00:00",
            ],
        },
        RecurrenceCase {
            name: "minutely_basic",
            rule: r#"{"frequency":"MINUTELY"}"#,
            start: "2012-01-01T09:00:00Z",
            count: Some(3),
            expected: &[
                "2012-01-01T09:01:00+00:00",
                "2012-01-01T09:02:00+00:00",
                "2012-01-01T09:03:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "hourly_interval",
            rule: r#"{"frequency":"HOURLY","interval":6}"#,
            start: "2025-01-01T00:00:00Z",
            count: Some(3),
            expected: &[
                "2025-01-01T06:00:00+00:00",
                "2025-01-01T12:00:00+00:00",
                "2025-01-01T18:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "hourly_by_minute_rolls_to_next_hour",
            rule: r#"{"frequency":"HOURLY","byMinute":[15]}"#,
            start: "2025-01-01T09:30:00Z",
            count: Some(3),
            expected: &[
                "2025-01-01T10:15:00+00:00",
                "2025-01-01T11:15:00+00:00",
                "2025-01-01T12:15:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "daily_basic",
            rule: r#"{"frequency":"DAILY"}"#,
            start: "2012-02-01T09:30:00Z",
            count: Some(3),
            expected: &[
                "2012-02-02T09:30:00+00:00",
                "2012-02-03T09:30:00+00:00",
                "2012-02-04T09:30:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "daily_by_hour_same_day",
            rule: r#"{"frequency":"DAILY","byHour":[9],"byMinute":[0],"bySecond":[0]}"#,
            start: "2025-01-01T06:00:00Z",
            count: Some(3),
            expected: &[
                "2025-01-01T09:00:00+00:00",
                "2025-01-02T09:00:00+00:00",
                "2025-01-03T09:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "daily_across_dst_new_york",
            rule: r#"{"frequency":"DAILY","tzId":"America/New_York","byHour":[9],"byMinute":[0]}"#,
            start: "2021-03-13T14:00:00Z",
            count: Some(3),
            expected: &[
                "2021-03-14T09:00:00-04:00",
                "2021-03-15T09:00:00-04:00",
                "2021-03-16T09:00:00-04:00",
            ],
        },
        RecurrenceCase {
            name: "weekly_monday_from_wednesday",
            rule: r#"{"frequency":"WEEKLY","interval":1,"byDay":["MO"]}"#,
            start: "2025-01-15T10:00:00Z",
            count: Some(3),
            expected: &[
                "2025-01-20T10:00:00+00:00",
                "2025-01-27T10:00:00+00:00",
                "2025-02-03T10:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "weekly_wednesday_from_monday",
            rule: r#"{"frequency":"WEEKLY","byDay":["WE"]}"#,
            start: "2025-01-13T08:00:00Z",
            count: Some(3),
            expected: &[
                "2025-01-15T08:00:00+00:00",
                "2025-01-22T08:00:00+00:00",
                "2025-01-29T08:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "fortnightly_phase_locked_to_dt_start",
            rule: r#"{"frequency":"WEEKLY","interval":2,"byHour":[9],"byMinute":[0],"dtStart":"2025-01-06T09:00:00Z"}"#,
            start: "2025-01-16T12:00:00Z",
            count: Some(3),
            expected: &[
                "2025-01-20T09:00:00+00:00",
                "2025-02-03T09:00:00+00:00",
                "2025-02-17T09:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "fortnightly_seed_on_cadence_day_before_target_time",
            rule: r#"{"frequency":"WEEKLY","interval":2,"byHour":[8],"byMinute":[0],"dtStart":"2025-01-06T09:00:00Z"}"#,
            start: "2025-01-20T07:00:00Z",
            count: Some(3),
            expected: &[
                "2025-01-20T08:00:00+00:00",
                "2025-02-03T08:00:00+00:00",
                "2025-02-17T08:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "monthly_day_31_skips_short_months",
            rule: r#"{"frequency":"MONTHLY","byMonthDay":[31],"byHour":[9],"byMinute":[0]}"#,
            start: "2025-04-15T12:00:00Z",
            count: Some(3),
            expected: &[
                "2025-05-31T09:00:00+00:00",
                "2025-07-31T09:00:00+00:00",
                "2025-08-31T09:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "monthly_last_day",
            rule: r#"{"frequency":"MONTHLY","byMonthDay":[-1],"byHour":[17],"byMinute":[0]}"#,
            start: "2024-01-15T12:00:00Z",
            count: Some(4),
            expected: &[
                "2024-01-31T17:00:00+00:00",
                "2024-02-29T17:00:00+00:00",
                "2024-03-31T17:00:00+00:00",
                "2024-04-30T17:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "monthly_day_from_dt_start",
            rule: r#"{"frequency":"MONTHLY","dtStart":"2025-01-15T09:00:00Z"}"#,
            start: "2025-01-15T09:00:00Z",
            count: Some(3),
            expected: &[
                "2025-02-15T09:00:00+00:00",
                "2025-03-15T09:00:00+00:00",
                "2025-04-15T09:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "yearly_basic",
            rule: r#"{"frequency":"YEARLY"}"#,
            start: "2012-01-01T09:00:00Z",
            count: Some(3),
            expected: &[
                "2013-01-01T09:00:00+00:00",
                "2014-01-01T09:00:00+00:00",
                "2015-01-01T09:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "legacy_field_names_and_codes",
            rule: r#"{"frequency":4,"dayOfWeek":[4],"byhour":[18],"byminute":[30]}"#,
            start: "2025-01-15T10:00:00Z",
            count: Some(3),
            expected: &[
                "2025-01-17T18:30:00+00:00",
                "2025-01-24T18:30:00+00:00",
                "2025-01-31T18:30:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "rule_count_beats_requested_count",
            rule: r#"{"frequency":"DAILY","count":2}"#,
            start: "2025-06-01T00:00:00Z",
            count: Some(10),
            expected: &["2025-06-02T00:00:00+00:00", "2025-06-03T00:00:00+00:00"],
        },
    ]
}

pub fn assert_case(case: &RecurrenceCase) {
    let rule = rule(case.rule)
        .unwrap_or_else(|err| panic!("Failed to build rule for {}: {}", case.name, err));

    let actual: Vec<String> = collect(rule, case.start, case.count)
        .unwrap_or_else(|err| panic!("Failed to expand {}: {}", case.name, err))
        .iter()
        .map(render)
        .collect();

    assert_eq!(actual, case.expected, "Case {} did not match", case.name);
}

/// ## Summary
/// Expands every shared case and compares the rendered occurrences.
#[test_log::test]
fn recurrence_cases_integration() {
    for case in recurrence_cases() {
        assert_case(&case);
    }
}

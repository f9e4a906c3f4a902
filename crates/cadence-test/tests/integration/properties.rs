//! Invariants that hold for every expansion, checked over a spread of rules.

use cadence_test::recur::{CalendarUnit, Frequency, Occurrences, RecurrenceRule};
use cadence_test::{collect, rule, utc};
use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc, Weekday};

const SAMPLE_RULES: &[&str] = &[
    r#"{"frequency":"SECONDLY","interval":7}"#,
    r#"{"frequency":"MINUTELY","bySecond":[30]}"#,
    r#"{"frequency":"HOURLY","byMinute":[45]}"#,
    r#"{"frequency":"DAILY","tzId":"Europe/London","byHour":[1],"byMinute":[30]}"#,
    r#"{"frequency":"WEEKLY","byDay":["SU"],"tzId":"America/New_York"}"#,
    r#"{"frequency":"WEEKLY","interval":2,"dtStart":"2024-09-02T08:00:00Z"}"#,
    r#"{"frequency":"WEEKLY","interval":3,"byDay":["TH"]}"#,
    r#"{"frequency":"MONTHLY","byMonthDay":[30]}"#,
    r#"{"frequency":"MONTHLY","byMonthDay":[-1],"tzId":"Australia/Sydney"}"#,
    r#"{"frequency":"YEARLY","byHour":[12]}"#,
];

const START: &str = "2024-10-20T23:59:59Z";

#[test_log::test]
fn occurrences_strictly_increase() {
    for json in SAMPLE_RULES {
        let all = collect(rule(json).expect("valid rule"), START, Some(40)).expect("expands");
        assert!(
            all.windows(2).all(|pair| pair[0] < pair[1]),
            "{json} is not strictly increasing"
        );
        assert!(
            all.first().is_some_and(|first| first.with_timezone(&Utc) > utc(START)),
            "{json} did not start after the seed"
        );
    }
}

#[test_log::test]
fn sequence_yields_exactly_the_effective_count() {
    for json in SAMPLE_RULES {
        let all = collect(rule(json).expect("valid rule"), START, Some(13)).expect("expands");
        assert_eq!(all.len(), 13, "{json}");
    }
}

#[test_log::test]
fn expansion_is_deterministic() {
    for json in SAMPLE_RULES {
        let first = collect(rule(json).expect("valid rule"), START, Some(20)).expect("expands");
        let second = collect(rule(json).expect("valid rule"), START, Some(20)).expect("expands");
        assert_eq!(first, second, "{json}");
    }
}

#[test_log::test]
fn unconstrained_rules_step_whole_units() {
    let cases = [
        (Frequency::Secondly, TimeDelta::seconds(1)),
        (Frequency::Minutely, TimeDelta::minutes(1)),
        (Frequency::Hourly, TimeDelta::hours(1)),
        (Frequency::Daily, TimeDelta::days(1)),
        (Frequency::Weekly, TimeDelta::weeks(1)),
    ];
    let start = utc("2025-02-10T06:15:30Z");

    for (frequency, step) in cases {
        let all: Vec<_> = Occurrences::new(RecurrenceRule::new(frequency), Some(start), Some(10))
            .collect::<Result<_, _>>()
            .expect("expands");
        for (k, at) in (1..).zip(&all) {
            assert_eq!(at.with_timezone(&Utc), start + step * k, "{frequency} #{k}");
        }
    }
}

#[test_log::test]
fn weekly_by_day_lands_on_that_weekday() {
    let all = collect(
        rule(r#"{"frequency":"WEEKLY","byDay":["WE"],"tzId":"Europe/Paris"}"#).expect("valid rule"),
        "2025-03-01T12:00:00Z",
        Some(30),
    )
    .expect("expands");
    assert!(all.iter().all(|at| at.weekday() == Weekday::Wed));
}

#[test_log::test]
fn last_day_rule_always_lands_on_month_end() {
    let all = collect(
        rule(r#"{"frequency":"MONTHLY","byMonthDay":[-1]}"#).expect("valid rule"),
        "2023-11-30T00:00:00Z",
        Some(24),
    )
    .expect("expands");
    assert!(all.iter().all(|at| {
        at.date_naive()
            .succ_opt()
            .is_some_and(|next| next.day() == 1)
    }));
}

#[test_log::test]
fn fortnights_stay_on_phase_from_any_seed() {
    let json = r#"{"frequency":"WEEKLY","interval":2,"byHour":[9],"byMinute":[0],"bySecond":[0],"dtStart":"2025-01-06T09:00:00Z"}"#;
    let dt_start = NaiveDate::from_ymd_opt(2025, 1, 6).expect("valid date");
    let seeds = [
        "2024-12-05T10:00:00Z",
        "2024-12-23T08:59:59Z",
        "2025-01-06T09:00:00Z",
        "2025-01-13T09:00:00Z",
        "2025-01-19T23:00:00Z",
        "2025-01-20T07:00:00Z",
        "2025-03-03T09:00:01Z",
        "2025-03-04T00:00:00Z",
    ];

    for seed in seeds {
        let all = collect(rule(json).expect("valid rule"), seed, Some(6)).expect("expands");
        assert_eq!(
            all.first().map(|at| at.with_timezone(&Utc)),
            Some(earliest_on_cadence_after(utc(seed), dt_start)),
            "seed {seed} did not start at the earliest occurrence"
        );
        for at in &all {
            let offset = at.date_naive().signed_duration_since(dt_start).num_days();
            assert_eq!(offset.rem_euclid(14), 0, "seed {seed} produced {at}");
        }
        assert!(
            all.windows(2)
                .all(|pair| pair[1].date_naive() - pair[0].date_naive() == TimeDelta::days(14)),
            "seed {seed} skipped a fortnight"
        );
    }
}

/// First 09:00 UTC on a `dt_start + 14k` date strictly after `seed`.
fn earliest_on_cadence_after(seed: DateTime<Utc>, dt_start: NaiveDate) -> DateTime<Utc> {
    seed.date_naive()
        .iter_days()
        .take(16)
        .filter(|date| date.signed_duration_since(dt_start).num_days().rem_euclid(14) == 0)
        .filter_map(|date| date.and_hms_opt(9, 0, 0))
        .map(|local| local.and_utc())
        .find(|at| *at > seed)
        .expect("a cadence day within a fortnight")
}

#[test_log::test]
fn cursor_ends_count_units_after_start() {
    let rule = RecurrenceRule::new(Frequency::Daily).with_count(3);
    let mut seq = Occurrences::new(rule, Some(utc(START)), None);
    let last = seq
        .by_ref()
        .last()
        .expect("three occurrences")
        .expect("valid occurrence");
    assert_eq!(seq.cursor().as_datetime(), &last);

    let back = seq.cursor().add(CalendarUnit::Day, -3).expect("in range");
    assert_eq!(back.as_datetime().with_timezone(&Utc), utc(START));
}

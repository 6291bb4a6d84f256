#![forbid(unsafe_code)]
use careplan::clock::{to_hhmm, to_minutes};
use careplan::{
    generate_schedule, generate_schedule_with, ActivityTemplateInput, ClockTime, GeneratedBlock,
    ScheduleOptions, TemplateId, TimeWindow,
};

fn t(s: &str) -> ClockTime {
    s.parse().unwrap()
}

fn window(start: &str, end: &str) -> TimeWindow {
    TimeWindow::new(t(start), t(end)).unwrap()
}

fn tpl(id: u32, title: &str, mins: u32) -> ActivityTemplateInput {
    ActivityTemplateInput::new(TemplateId(id), title, mins).unwrap()
}

fn block(start: &str, end: &str, activity: &str) -> GeneratedBlock {
    GeneratedBlock { start: t(start), end: t(end), activity: activity.into() }
}

#[test]
fn clock_round_trips_every_minute_of_the_day() {
    for mins in 0..1440 {
        assert_eq!(to_minutes(&to_hhmm(mins)).unwrap(), mins);
    }
    assert_eq!(to_hhmm(5), "00:05");
    assert_eq!(to_minutes("23:59").unwrap(), 1439);
}

#[test]
fn clock_rejects_malformed_text() {
    for bad in ["9:00", "24:00", "12:60", "12-00", "ab:cd", "", "12:000"] {
        assert!(to_minutes(bad).is_err(), "{bad} should be rejected");
    }
    assert!(ClockTime::from_minutes(1440).is_err());
}

#[test]
fn single_template_cycles_back() {
    let blocks = generate_schedule(window("09:00", "10:00"), &[tpl(1, "A", 30)]);
    assert_eq!(blocks, vec![block("09:00", "09:30", "A"), block("09:30", "10:00", "A")]);
}

#[test]
fn template_longer_than_window_yields_nothing() {
    assert!(generate_schedule(window("09:00", "09:20"), &[tpl(1, "A", 30)]).is_empty());
}

#[test]
fn empty_window_or_templates_yield_nothing() {
    assert!(generate_schedule(window("09:00", "09:00"), &[tpl(1, "A", 30)]).is_empty());
    assert!(generate_schedule(window("09:00", "12:00"), &[]).is_empty());
}

#[test]
fn templates_are_taken_round_robin() {
    let blocks = generate_schedule(
        window("09:00", "10:00"),
        &[tpl(1, "A", 20), tpl(2, "B", 20)],
    );
    let titles: Vec<&str> = blocks.iter().map(|b| b.activity.as_str()).collect();
    assert_eq!(titles, ["A", "B", "A"]);
}

#[test]
fn exact_fit_gives_one_block() {
    let blocks = generate_schedule(window("13:00", "14:30"), &[tpl(1, "Swim", 90)]);
    assert_eq!(blocks, vec![block("13:00", "14:30", "Swim")]);
}

#[test]
fn stops_at_first_template_that_does_not_fit() {
    // A(40) B(40) puis A ne rentre plus dans les 30 minutes restantes
    let blocks = generate_schedule(
        window("09:00", "10:50"),
        &[tpl(1, "A", 40), tpl(2, "B", 40), tpl(3, "C", 10)],
    );
    let titles: Vec<&str> = blocks.iter().map(|b| b.activity.as_str()).collect();
    assert_eq!(titles, ["A", "B", "C"]);

    let blocks = generate_schedule(
        window("09:00", "10:30"),
        &[tpl(1, "A", 40), tpl(2, "B", 40), tpl(3, "C", 20)],
    );
    let titles: Vec<&str> = blocks.iter().map(|b| b.activity.as_str()).collect();
    assert_eq!(titles, ["A", "B"]);
}

#[test]
fn blocks_are_contiguous_and_inside_window() {
    let w = window("08:15", "16:40");
    let blocks = generate_schedule(w, &[tpl(1, "Circle", 25), tpl(2, "Sensory", 15), tpl(3, "Snack", 35)]);
    assert!(!blocks.is_empty());
    assert_eq!(blocks[0].start, w.start);
    for pair in blocks.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
        assert!(pair[0].start < pair[1].start);
    }
    let total: u32 = blocks.iter().map(GeneratedBlock::duration_minutes).sum();
    assert!(total <= w.length_minutes());
    assert!(blocks.iter().all(|b| b.start < b.end && b.end <= w.end));
}

#[test]
fn block_ceiling_truncates_silently() {
    let w = window("00:00", "23:59");
    let blocks = generate_schedule(w, &[tpl(1, "Tick", 1)]);
    assert_eq!(blocks.len(), 1000);
    assert_eq!(blocks[999].end, t("16:40"));

    let blocks = generate_schedule_with(w, &[tpl(1, "Tick", 1)], ScheduleOptions { max_blocks: 3 });
    assert_eq!(blocks.len(), 3);
}

#[test]
fn invalid_inputs_are_rejected_at_construction() {
    assert!(TimeWindow::new(t("10:00"), t("09:00")).is_err());
    assert!(ActivityTemplateInput::new(TemplateId(1), "Zero", 0).is_err());
}

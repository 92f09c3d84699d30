#![forbid(unsafe_code)]
use horaires::{
    GenerateOptions, HtmlSchedule, HoursOfOperation, OperationBlock, ScheduleRenderer,
    ScheduleResult, Scheduler, Shift, ShiftId, ShiftStatus, TextSchedule, Weekday, Worker,
};

fn fixture() -> ScheduleResult {
    let alice = Worker::new("Alice", "Martin", "alice@example.com").available(Weekday::Monday, 9.0, 14.0);
    let bob = Worker::new("Bob", "Stone", "bob@example.com")
        .work_study(true)
        .available(Weekday::Tuesday, 9.0, 14.0);
    let carl = Worker::new("Carl", "Ray", "carl@example.com").available(Weekday::Monday, 12.0, 20.0);

    let mut hours = HoursOfOperation::new();
    hours.insert(Weekday::Monday, vec![OperationBlock::new(10.0, 18.0)]);
    hours.insert(Weekday::Tuesday, vec![OperationBlock::new(9.0, 14.0)]);

    let shift = |id: &str, day, start, end, status, ws| Shift {
        id: ShiftId::new(id),
        day,
        start_hour: start,
        end_hour: end,
        status,
        available: Vec::new(),
        is_work_study: ws,
    };
    let mut result = ScheduleResult {
        seed: 7,
        ..ScheduleResult::default()
    };
    result.days.insert(
        Weekday::Monday,
        vec![
            shift("m1", Weekday::Monday, 10.0, 14.0, ShiftStatus::Filled(vec![alice.to_ref()]), false),
            shift("m2", Weekday::Monday, 14.0, 18.0, ShiftStatus::Unfilled, false),
        ],
    );
    result.days.insert(
        Weekday::Tuesday,
        vec![shift("t1", Weekday::Tuesday, 9.0, 14.0, ShiftStatus::Filled(vec![bob.to_ref()]), true)],
    );

    let scheduler = Scheduler::new(vec![alice, bob, carl], hours, GenerateOptions::default()).unwrap();
    result.diagnostics = scheduler.recompute(&result);
    result
}

#[test]
fn text_schedule_lists_shifts_hours_and_warnings() {
    let text = TextSchedule.render("Library", &fixture());
    insta::assert_snapshot!(text, @r"
    Library schedule (seed 7)

    Monday
      10:00 AM - 2:00 PM   Alice Martin
      2:00 PM - 6:00 PM    Unfilled

    Tuesday
      9:00 AM - 2:00 PM    Bob Stone [work-study]

    Hours
      bob@example.com                5.0
      alice@example.com              4.0
      carl@example.com               0.0

    Warnings
      unfilled Monday 14:00-18:00 (could cover: Carl Ray)
      no hours: Carl Ray
    ");
}

#[test]
fn text_schedule_marks_closed_days() {
    let mut result = fixture();
    result.days.insert(Weekday::Wednesday, Vec::new());
    let text = TextSchedule.render("Library", &result);
    assert!(text.contains("Wednesday\n  (no shifts)\n"));
}

#[test]
fn html_schedule_renders_one_table_per_day() {
    let mut result = fixture();
    result.days.insert(Weekday::Wednesday, Vec::new());
    let html = HtmlSchedule.render("Library", &result);

    assert!(html.starts_with("<html>"));
    assert!(html.contains("<h2>Library Schedule</h2>"));
    assert!(html.contains("<h3>Monday</h3>"));
    assert!(html.contains("<h3>Tuesday</h3>"));
    assert!(!html.contains("<h3>Wednesday</h3>"));
    assert!(html.contains("<td>10:00 AM</td><td>2:00 PM</td><td>Alice Martin</td>"));
    assert!(html.contains("<td class=\"unfilled\">Unfilled</td>"));
    assert_eq!(html.matches("<table>").count(), 2);
}

#[test]
fn html_schedule_escapes_text() {
    let html = HtmlSchedule.render("R&D <Lab>", &fixture());
    assert!(html.contains("<h2>R&amp;D &lt;Lab&gt; Schedule</h2>"));
}

#![forbid(unsafe_code)]
use horaires::io::{export_schedule_json, import_workers_csv, read_workers, write_schedule_csv};
use horaires::{ScheduleResult, Shift, ShiftId, ShiftStatus, Weekday, Worker};
use std::fs;

#[test]
fn reads_workers_with_free_text_availability() {
    let data = "\
First Name,Last Name,Email,Work-Study,Availability
Alice,Martin,alice@example.com,no,\"Mon 09:00-17:00, Wed 12:00-20:00\"
Bob,Stone,bob@example.com,oui,Tue 08:00-14:00
";
    let team = read_workers(data.as_bytes()).unwrap();
    assert_eq!(team.len(), 2);

    let alice = &team[0];
    assert_eq!(alice.full_name(), "Alice Martin");
    assert!(!alice.work_study);
    assert_eq!(alice.availability.len(), 2);
    assert_eq!(alice.availability[&Weekday::Wednesday][0].start_hour, 12.0);

    assert!(team[1].work_study);
    assert_eq!(team[1].availability[&Weekday::Tuesday][0].end_hour, 14.0);
}

#[test]
fn reads_legacy_day_columns_with_exclusions() {
    let data = "\
first_name,last_name,email,monday,tuesday,not_available
Alice,Martin,alice@example.com,yes,no,\"Mon 9-12\"
";
    let team = read_workers(data.as_bytes()).unwrap();
    let alice = &team[0];
    let bounds: Vec<(f64, f64)> = alice.availability[&Weekday::Monday]
        .iter()
        .map(|w| (w.start_hour, w.end_hour))
        .collect();
    assert_eq!(bounds, vec![(0.0, 9.0), (12.0, 24.0)]);
    assert!(!alice.availability.contains_key(&Weekday::Tuesday));
}

#[test]
fn rejects_invalid_rows() {
    let missing_email = "first_name,last_name,email\nAlice,Martin,\n";
    let err = read_workers(missing_email.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("line 2"));

    let missing_column = "first_name,last_name\nAlice,Martin\n";
    let err = read_workers(missing_column.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("email"));

    let bad_flag = "first_name,last_name,email,work_study\nAlice,Martin,a@example.com,maybe\n";
    let err = read_workers(bad_flag.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("work_study"));
}

#[test]
fn imports_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("team.csv");
    fs::write(
        &path,
        "first_name,last_name,email,availability\nAlice,Martin,alice@example.com,Fri 10:00-14:00\n",
    )
    .unwrap();
    let team = import_workers_csv(&path).unwrap();
    assert_eq!(team[0].email, "alice@example.com");

    assert!(import_workers_csv(dir.path().join("absent.csv")).is_err());
}

fn sample_result() -> ScheduleResult {
    let alice = Worker::new("Alice", "Martin", "alice@example.com").to_ref();
    let mut result = ScheduleResult {
        seed: 3,
        ..ScheduleResult::default()
    };
    result.days.insert(
        Weekday::Monday,
        vec![
            Shift {
                id: ShiftId::new("a"),
                day: Weekday::Monday,
                start_hour: 10.0,
                end_hour: 14.0,
                status: ShiftStatus::Filled(vec![alice]),
                available: Vec::new(),
                is_work_study: false,
            },
            Shift {
                id: ShiftId::new("b"),
                day: Weekday::Monday,
                start_hour: 14.0,
                end_hour: 18.5,
                status: ShiftStatus::Unfilled,
                available: Vec::new(),
                is_work_study: false,
            },
        ],
    );
    result
}

#[test]
fn writes_schedule_csv() {
    let mut buf = Vec::new();
    write_schedule_csv(&mut buf, &sample_result()).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "day,start,end,assigned",
            "Monday,10:00,14:00,Alice Martin",
            "Monday,14:00,18:30,Unfilled",
        ]
    );
}

#[test]
fn exports_schedule_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedule.json");
    let result = sample_result();
    export_schedule_json(&path, &result).unwrap();

    let back: ScheduleResult = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back, result);
}

#![forbid(unsafe_code)]
use horaires::availability::{
    parse_availability, parse_not_available, windows_from_exclusions, AvailabilityPolicy,
    ContainmentPolicy,
};
use horaires::time::{format_time, format_time_ampm, normalize_block, overlaps, parse_time};
use horaires::{AvailabilityWindow, Weekday, Worker};

#[test]
fn parse_and_format_times() {
    assert_eq!(parse_time("14:30").unwrap(), 14.5);
    assert_eq!(parse_time(" 09:00 ").unwrap(), 9.0);
    assert!(parse_time("25:00").is_err());
    assert!(parse_time("noon").is_err());

    assert_eq!(format_time(14.5), "14:30");
    assert_eq!(format_time(parse_time("10:20").unwrap()), "10:20");
    assert_eq!(format_time(25.5), "01:30");

    assert_eq!(format_time_ampm(0.0), "12:00 AM");
    assert_eq!(format_time_ampm(12.0), "12:00 PM");
    assert_eq!(format_time_ampm(14.5), "2:30 PM");
}

#[test]
fn overnight_blocks_are_normalized() {
    assert_eq!(normalize_block(22.0, 2.0), (22.0, 26.0));
    assert_eq!(normalize_block(9.0, 17.0), (9.0, 17.0));
    assert_eq!(normalize_block(10.0, 10.0), (10.0, 34.0));
}

#[test]
fn overlap_is_strict() {
    assert!(overlaps(10.0, 14.0, 13.0, 18.0));
    assert!(!overlaps(10.0, 14.0, 14.0, 18.0));
}

#[test]
fn weekday_prefixes() {
    assert_eq!(Weekday::from_prefix("mon"), Some(Weekday::Monday));
    assert_eq!(Weekday::from_prefix("TUES"), Some(Weekday::Tuesday));
    assert_eq!(Weekday::from_prefix("thursday"), Some(Weekday::Thursday));
    assert_eq!(Weekday::from_prefix("mo"), None);
    assert_eq!(Weekday::from_prefix("xyz"), None);
    assert!("fri".parse::<Weekday>().is_ok());
    assert!("funday".parse::<Weekday>().is_err());
}

#[test]
fn containment_requires_a_single_enclosing_window() {
    let worker = Worker::new("Alice", "Martin", "alice@example.com")
        .available(Weekday::Monday, 9.0, 12.0)
        .available(Weekday::Monday, 12.0, 16.0);
    let policy = ContainmentPolicy;

    assert!(policy.is_available(&worker, Weekday::Monday, 9.0, 12.0));
    assert!(policy.is_available(&worker, Weekday::Monday, 12.0, 15.0));
    // chevauchement partiel : refusé
    assert!(!policy.is_available(&worker, Weekday::Monday, 10.0, 14.0));
    // deux fenêtres adjacentes ne se cumulent pas
    assert!(!policy.is_available(&worker, Weekday::Monday, 11.0, 13.0));
    // aucun créneau déclaré ce jour-là
    assert!(!policy.is_available(&worker, Weekday::Tuesday, 10.0, 12.0));
}

#[test]
fn overnight_window_contains_late_shift() {
    let worker = Worker::new("Night", "Owl", "owl@example.com").available(Weekday::Friday, 22.0, 2.0);
    assert!(ContainmentPolicy.is_available(&worker, Weekday::Friday, 23.0, 26.0));
}

#[test]
fn free_text_availability_is_lenient() {
    let parsed = parse_availability(
        "Monday 09:00-17:00, tue 10:00 - 12:00, bogus, Fri 22:00-02:00, Wed 9-12",
    );
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[&Weekday::Monday], vec![AvailabilityWindow::new(9.0, 17.0)]);
    assert_eq!(parsed[&Weekday::Tuesday], vec![AvailabilityWindow::new(10.0, 12.0)]);
    assert_eq!(parsed[&Weekday::Friday][0].end_hour, 26.0);
    assert!(!parsed.contains_key(&Weekday::Wednesday));
}

#[test]
fn legacy_exclusions_become_windows() {
    let excl = parse_not_available("Mon 9-12, tue 14:30 to 16, junk");
    assert_eq!(excl[&Weekday::Monday], vec![(9.0, 12.0)]);
    assert_eq!(excl[&Weekday::Tuesday], vec![(14.5, 16.0)]);

    let windows = windows_from_exclusions(&[(9.0, 12.0), (14.0, 16.0)]);
    let bounds: Vec<(f64, f64)> = windows.iter().map(|w| (w.start_hour, w.end_hour)).collect();
    assert_eq!(bounds, vec![(0.0, 9.0), (12.0, 14.0), (16.0, 24.0)]);
}

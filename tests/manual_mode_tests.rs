use chrono::Duration;
use daycycle::Checkpoint;
use daycycle::commands::status::StatusReport;
use daycycle::config::{self, Config, ScheduleMode};
use daycycle::daylight::DaylightSource;
use daycycle::time_source::parse_datetime;
use std::fs;
use tempfile::tempdir;

fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("daycycle.toml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn test_manual_config_drives_the_whole_day() {
    let (_dir, path) = write_config(
        r#"
mode = "manual"
sunrise = "07:00:00"
sunset = "19:00:00"
"#,
    );
    let config = config::load_from_path(&path).unwrap();
    assert_eq!(config.mode(), ScheduleMode::Manual);

    let source = DaylightSource::from_config(&config).unwrap();
    let expectations = [
        ("2024-03-01 07:00:00", Checkpoint::Sunrise, Checkpoint::Morning, 4),
        ("2024-03-01 11:00:00", Checkpoint::Morning, Checkpoint::LateAfternoon, 6),
        ("2024-03-01 18:00:00", Checkpoint::LateAfternoon, Checkpoint::Sunset, 1),
        ("2024-03-01 21:00:00", Checkpoint::Sunset, Checkpoint::Sunrise, 10),
        ("2024-03-02 03:00:00", Checkpoint::Sunset, Checkpoint::Sunrise, 4),
    ];

    for (at, current, next, hours) in expectations {
        let position = source.position_at(parse_datetime(at).unwrap()).unwrap();
        assert_eq!(position.current_checkpoint, current, "at {at}");
        assert_eq!(position.next_checkpoint, next, "at {at}");
        assert_eq!(position.time_until_next, Duration::hours(hours), "at {at}");
    }
}

#[test]
fn test_equal_sunrise_and_sunset_collapse_to_one_checkpoint() {
    let config = Config {
        mode: Some(ScheduleMode::Manual),
        sunrise: Some("06:00:00".to_string()),
        sunset: Some("06:00:00".to_string()),
        ..Default::default()
    };
    let now = parse_datetime("2024-06-10 06:00:00").unwrap();
    let report = StatusReport::compute(&config, now).unwrap();

    assert_eq!(report.current_checkpoint, Checkpoint::Sunrise);
    assert_eq!(report.next_checkpoint, Checkpoint::Sunrise);
    assert_eq!(report.seconds_until_next, 24 * 3600);
    assert!(report.schedule.iter().all(|slot| slot.time == report.now));
}

#[test]
fn test_sunset_before_sunrise_wraps_into_next_day() {
    // Night-shift style configuration: "sunset" happens after midnight
    let config = Config {
        mode: Some(ScheduleMode::Manual),
        sunrise: Some("20:00:00".to_string()),
        sunset: Some("02:00:00".to_string()),
        ..Default::default()
    };
    let source = DaylightSource::from_config(&config).unwrap();

    let position = source
        .position_at(parse_datetime("2024-06-10 23:00:00").unwrap())
        .unwrap();
    // Daylight runs 20:00 -> 02:00, morning at 22:00, late afternoon at 01:00
    assert_eq!(position.current_checkpoint, Checkpoint::Morning);
    assert_eq!(position.next_checkpoint, Checkpoint::LateAfternoon);
    assert_eq!(position.time_until_next, Duration::hours(2));
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_dir, path) = write_config(
        r#"
mode = "manual"
sunrise = "6am"
"#,
    );
    assert!(config::load_from_path(&path).is_err());

    let (_dir, path) = write_config(
        r#"
mode = "geo"
latitude = 52.52
"#,
    );
    assert!(config::load_from_path(&path).is_err());
}

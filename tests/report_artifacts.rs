use std::fs;
use std::io::Read;
use std::time::Duration;

use pagerunner::report::{
    archive_reports, prepare_report_dir, CaseOutcome, Report, SuiteReport,
};

#[test]
fn report_writes_html_next_to_screenshots() {
    let root = tempfile::tempdir().unwrap();
    let report_dir = root.path().join("reports");
    let screenshots = prepare_report_dir(&report_dir).unwrap();
    assert!(screenshots.is_dir());

    let shot = screenshots.join("booking_submit_search.png");
    fs::write(&shot, b"png bytes").unwrap();

    let mut suite = SuiteReport::new("booking");
    suite.push(CaseOutcome::passed(
        "booking::verify_page_title",
        Duration::from_millis(80),
    ));
    suite.push(CaseOutcome::failed(
        "booking::submit_search",
        Duration::from_secs(2),
        "search button never became clickable",
        Some(shot),
    ));

    let mut report = Report::new();
    report.push(suite);

    let path = report_dir.join("report.html");
    report.write(&path).unwrap();

    let html = fs::read_to_string(&path).unwrap();
    assert!(html.contains(r#"src="screenshots/booking_submit_search.png""#));
    assert!(html.contains("search button never became clickable"));
    assert!(!report.all_passed());
}

#[test]
fn prepare_report_dir_clears_previous_session() {
    let root = tempfile::tempdir().unwrap();
    let report_dir = root.path().join("reports");

    let screenshots = prepare_report_dir(&report_dir).unwrap();
    fs::write(screenshots.join("stale.png"), b"old").unwrap();
    fs::write(report_dir.join("report.html"), "<html></html>").unwrap();

    let screenshots = prepare_report_dir(&report_dir).unwrap();
    assert!(!screenshots.join("stale.png").exists());
    assert!(!report_dir.join("report.html").exists());
}

#[test]
fn archive_contains_the_report_tree() {
    let root = tempfile::tempdir().unwrap();
    let report_dir = root.path().join("reports");
    let screenshots = prepare_report_dir(&report_dir).unwrap();
    fs::write(report_dir.join("report.html"), "<html></html>").unwrap();
    fs::write(screenshots.join("case.png"), b"png").unwrap();

    let zip_path = archive_reports(&report_dir, root.path(), "report_archive_").unwrap();
    let stem = zip_path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(stem.starts_with("report_archive_"));
    assert!(stem.ends_with(".zip"));

    let mut archive = zip::ZipArchive::new(fs::File::open(&zip_path).unwrap()).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert!(names.iter().any(|n| n == "report.html"));
    assert!(names.iter().any(|n| n == "screenshots/case.png"));

    let mut html = String::new();
    archive
        .by_name("report.html")
        .unwrap()
        .read_to_string(&mut html)
        .unwrap();
    assert_eq!(html, "<html></html>");
}

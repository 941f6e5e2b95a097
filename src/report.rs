use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStatus {
    Passed,
    Failed,
    Skipped,
}

/// Recorded outcome of one test case.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub name: String,
    pub status: CaseStatus,
    pub duration: Duration,
    pub error: Option<String>,
    /// Failure screenshot, stored as a path on disk.
    pub screenshot: Option<PathBuf>,
}

impl CaseOutcome {
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: CaseStatus::Passed,
            duration,
            error: None,
            screenshot: None,
        }
    }

    pub fn failed(
        name: impl Into<String>,
        duration: Duration,
        error: impl Into<String>,
        screenshot: Option<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            status: CaseStatus::Failed,
            duration,
            error: Some(error.into()),
            screenshot,
        }
    }

    pub fn skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CaseStatus::Skipped,
            duration: Duration::ZERO,
            error: Some(reason.into()),
            screenshot: None,
        }
    }
}

/// Outcomes of one suite run.
#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub suite_name: String,
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    pub fn new(suite_name: impl Into<String>) -> Self {
        Self {
            suite_name: suite_name.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: CaseOutcome) {
        self.outcomes.push(outcome);
    }

    fn count(&self, status: CaseStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn passed_count(&self) -> usize {
        self.count(CaseStatus::Passed)
    }

    pub fn failed_count(&self) -> usize {
        self.count(CaseStatus::Failed)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(CaseStatus::Skipped)
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn duration(&self) -> Duration {
        self.outcomes.iter().map(|o| o.duration).sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {}/{} passed, {} failed, {} skipped ({:.2}s)",
            self.suite_name,
            self.passed_count(),
            self.total(),
            self.failed_count(),
            self.skipped_count(),
            self.duration().as_secs_f64()
        )
    }
}

/// The session-wide HTML report, aggregating every suite run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    suites: Vec<SuiteReport>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, suite: SuiteReport) {
        self.suites.push(suite);
    }

    pub fn all_passed(&self) -> bool {
        self.suites.iter().all(SuiteReport::all_passed)
    }

    pub fn suites(&self) -> &[SuiteReport] {
        &self.suites
    }

    /// Write the rendered report to `path`. Screenshot paths are embedded
    /// relative to the report location so the document stays portable.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        fs::write(path, self.render_html(base))?;
        Ok(())
    }

    pub fn render_html(&self, base_dir: &Path) -> String {
        let mut html = String::new();

        html.push_str(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>pagerunner test report</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; }
        .summary { background: #f5f5f5; padding: 20px; border-radius: 8px; margin-bottom: 20px; }
        .case { padding: 10px; margin: 5px 0; border-radius: 4px; }
        .case.pass { background: #e8f5e9; border-left: 4px solid #4caf50; }
        .case.fail { background: #ffebee; border-left: 4px solid #f44336; }
        .case.skip { background: #fff3e0; border-left: 4px solid #ff9800; }
        .error { color: #d32f2f; font-family: monospace; white-space: pre-wrap; }
        .shot img { width: 600px; cursor: pointer; border: 1px solid #ddd; }
    </style>
</head>
<body>
"#,
        );

        for suite in &self.suites {
            html.push_str(&format!(
                r#"<div class="summary">
    <h1>{}</h1>
    <h2>{}</h2>
</div>
"#,
                suite.suite_name,
                suite.summary()
            ));

            for outcome in &suite.outcomes {
                let class = match outcome.status {
                    CaseStatus::Passed => "pass",
                    CaseStatus::Failed => "fail",
                    CaseStatus::Skipped => "skip",
                };
                html.push_str(&format!(
                    "<div class=\"case {}\">\n    <strong>{}</strong> - {:?} ({:.2}s)\n",
                    class,
                    outcome.name,
                    outcome.status,
                    outcome.duration.as_secs_f64()
                ));

                if let Some(error) = &outcome.error {
                    html.push_str(&format!("    <div class=\"error\">{error}</div>\n"));
                }

                if let Some(screenshot) = &outcome.screenshot {
                    let rel = screenshot
                        .strip_prefix(base_dir)
                        .unwrap_or(screenshot)
                        .to_string_lossy();
                    html.push_str(&format!(
                        r#"    <div class="shot"><img src="{rel}" alt="failure screenshot" onclick="window.open(this.src)"/></div>
"#,
                    ));
                }

                html.push_str("</div>\n");
            }
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

/// Session-start housekeeping: drop the previous report directory and
/// create a fresh screenshots subdirectory. Returns the screenshots path.
pub fn prepare_report_dir(report_dir: &Path) -> Result<PathBuf> {
    if report_dir.exists() {
        fs::remove_dir_all(report_dir)?;
    }
    let screenshots = report_dir.join("screenshots");
    fs::create_dir_all(&screenshots)?;
    Ok(screenshots)
}

/// Zip the report directory into `{dest_dir}/{prefix}{timestamp}.zip` for
/// archiving at session end.
pub fn archive_reports(report_dir: &Path, dest_dir: &Path, prefix: &str) -> Result<PathBuf> {
    let stamp = chrono::Local::now().format("%d_%m_%Y-%H_%M_%S");
    let zip_path = dest_dir.join(format!("{prefix}{stamp}.zip"));

    let file = File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    add_dir_entries(&mut zip, report_dir, report_dir, options)?;
    zip.finish()?;

    tracing::info!("reports archived to {}", zip_path.display());
    Ok(zip_path)
}

fn add_dir_entries(
    zip: &mut ZipWriter<File>,
    root: &Path,
    dir: &Path,
    options: SimpleFileOptions,
) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let name = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .into_owned();
        if path.is_dir() {
            zip.add_directory(format!("{name}/"), options)?;
            add_dir_entries(zip, root, &path, options)?;
        } else {
            zip.start_file(name, options)?;
            let mut source = File::open(&path)?;
            io::copy(&mut source, zip)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        let mut suite = SuiteReport::new("search");
        suite.push(CaseOutcome::passed("search::verify_page_title", Duration::from_millis(120)));
        suite.push(CaseOutcome::failed(
            "search::search_keyword",
            Duration::from_millis(450),
            "no matching suggestions",
            Some(PathBuf::from("/tmp/reports/screenshots/search_search_keyword.png")),
        ));
        suite.push(CaseOutcome::skipped(
            "search::verify_selenium_download",
            "captcha on the search page",
        ));
        let mut report = Report::new();
        report.push(suite);
        report
    }

    #[test]
    fn counts_and_summary() {
        let report = sample_report();
        let suite = &report.suites()[0];
        assert_eq!(suite.total(), 3);
        assert_eq!(suite.passed_count(), 1);
        assert_eq!(suite.failed_count(), 1);
        assert_eq!(suite.skipped_count(), 1);
        assert!(!suite.all_passed());
        assert!(suite.summary().starts_with("search: 1/3 passed"));
    }

    #[test]
    fn html_embeds_screenshot_relative_to_report() {
        let report = sample_report();
        let html = report.render_html(Path::new("/tmp/reports"));
        assert!(html.contains(r#"src="screenshots/search_search_keyword.png""#));
        assert!(html.contains("no matching suggestions"));
        assert!(html.contains("class=\"case pass\""));
        assert!(html.contains("class=\"case skip\""));
    }

    #[test]
    fn all_passed_requires_every_suite() {
        let mut report = Report::new();
        let mut good = SuiteReport::new("good");
        good.push(CaseOutcome::passed("good::case", Duration::ZERO));
        report.push(good);
        assert!(report.all_passed());

        report.push(sample_report().suites()[0].clone());
        assert!(!report.all_passed());
    }
}

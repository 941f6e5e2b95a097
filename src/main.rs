use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use pagerunner::browser::{self, BrowserKind};
use pagerunner::config::Settings;
use pagerunner::fixtures::TestData;
use pagerunner::harness::Runner;
use pagerunner::interaction::Dom;
use pagerunner::locators::LocatorStore;
use pagerunner::report::{self, Report};
use pagerunner::suites::SUITES;

/// pagerunner: page-object test harness over WebDriver
#[derive(Parser)]
#[command(name = "pagerunner", version, about)]
struct Cli {
    /// Browser backend to drive
    #[arg(long, value_enum, default_value_t = BrowserKind::Chrome)]
    browser: BrowserKind,

    /// Project root holding config/, locators/ and data/
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Only run the suite with this name
    #[arg(long)]
    suite: Option<String>,

    /// Stop a suite on its first failing case
    #[arg(long)]
    fail_fast: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let report_dir = cli.root.join("reports");
    let screenshots = report::prepare_report_dir(&report_dir)?;

    let mut report = Report::new();

    for spec in SUITES {
        if let Some(only) = &cli.suite {
            if only != spec.name {
                continue;
            }
        }

        let settings = Settings::load(cli.root.join("config"), spec.config);
        let folder = settings.locator_folder()?.to_string();

        let locators = LocatorStore::load(cli.root.join("locators"), &folder, spec.page)?;
        let data = Arc::new(TestData::load(cli.root.join("data"), spec.data)?);

        // One session per suite: setup here, torn down after the run.
        let session = browser::connect(cli.browser, &settings).await?;
        let dom = Dom::new(session.client().clone());
        let suite = (spec.build)(dom, locators, data);

        let mut runner = Runner::new().with_screenshot_dir(&screenshots);
        if cli.fail_fast {
            runner = runner.with_fail_fast();
        }

        let suite_report = runner.run(suite, Some(&session)).await;
        tracing::info!("{}", suite_report.summary());
        report.push(suite_report);

        session.quit().await?;
    }

    let report_path = report_dir.join("report.html");
    report.write(&report_path)?;
    tracing::info!("HTML report generated: {}", report_path.display());

    let archive = report::archive_reports(&report_dir, &cli.root, "report_archive_")?;
    tracing::info!("report archive: {}", archive.display());

    if !report.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}

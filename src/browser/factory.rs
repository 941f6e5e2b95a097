use std::fmt;

use fantoccini::ClientBuilder;
use serde_json::{json, Map, Value};

use crate::config::Settings;
use crate::error::Result;

use super::Session;

const LOCAL_CHROMEDRIVER: &str = "http://localhost:9515";
const LOCAL_GECKODRIVER: &str = "http://localhost:4444";
const REMOTE_GRID: &str = "http://localhost:4444/wd/hub";

// Headless Chrome advertises itself otherwise; present a desktop UA.
const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/84.0.4147.125 Safari/537.36";

const WINDOW_WIDTH: u32 = 1920;
const WINDOW_HEIGHT: u32 = 1080;

/// Session backend selected by the `--browser` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BrowserKind {
    Chrome,
    Firefox,
    #[value(name = "dockerchrome")]
    DockerChrome,
    #[value(name = "dockerfirefox")]
    DockerFirefox,
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::DockerChrome => "dockerchrome",
            Self::DockerFirefox => "dockerfirefox",
        };
        f.write_str(name)
    }
}

/// Build a WebDriver session for the requested backend, size the window and
/// navigate to the configured base URL.
pub async fn connect(kind: BrowserKind, settings: &Settings) -> Result<Session> {
    let headless = settings.headless();
    let (url, capabilities) = match kind {
        BrowserKind::Chrome => (LOCAL_CHROMEDRIVER, chrome_capabilities(headless)),
        BrowserKind::Firefox => (LOCAL_GECKODRIVER, firefox_capabilities(headless)),
        // The dockerised grid runs its own display; no headless flags.
        BrowserKind::DockerChrome => (REMOTE_GRID, chrome_capabilities(false)),
        BrowserKind::DockerFirefox => (REMOTE_GRID, firefox_capabilities(false)),
    };

    tracing::info!("connecting to {kind} webdriver at {url} (headless: {headless})");
    let client = ClientBuilder::native()
        .capabilities(capabilities)
        .connect(url)
        .await?;

    client.set_window_size(WINDOW_WIDTH, WINDOW_HEIGHT).await?;

    let base_url = settings.base_url()?;
    tracing::info!("opening base url {base_url}");
    client.goto(base_url).await?;

    Ok(Session::new(client))
}

fn chrome_capabilities(headless: bool) -> Map<String, Value> {
    let mut args: Vec<String> = vec!["--no-sandbox".into(), "--disable-dev-shm-usage".into()];
    let mut options = Map::new();

    if headless {
        args.push("--headless=new".into());
        args.push("--disable-gpu".into());
        args.push(format!("user-agent={DESKTOP_USER_AGENT}"));
        options.insert("excludeSwitches".into(), json!(["enable-automation"]));
        options.insert("useAutomationExtension".into(), json!(false));
    }
    options.insert("args".into(), json!(args));

    let mut capabilities = Map::new();
    capabilities.insert("browserName".into(), json!("chrome"));
    capabilities.insert("goog:chromeOptions".into(), Value::Object(options));
    capabilities
}

fn firefox_capabilities(headless: bool) -> Map<String, Value> {
    let mut args: Vec<String> = Vec::new();
    if headless {
        args.push("--headless".into());
    }

    let mut options = Map::new();
    options.insert("args".into(), json!(args));

    let mut capabilities = Map::new();
    capabilities.insert("browserName".into(), json!("firefox"));
    capabilities.insert("moz:firefoxOptions".into(), Value::Object(options));
    capabilities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_chrome_sets_automation_switches() {
        let caps = chrome_capabilities(true);
        let options = caps["goog:chromeOptions"].as_object().unwrap();
        let args: Vec<&str> = options["args"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(args.contains(&"--headless=new"));
        assert!(args.iter().any(|a| a.starts_with("user-agent=")));
        assert_eq!(options["excludeSwitches"], json!(["enable-automation"]));
    }

    #[test]
    fn headed_chrome_keeps_defaults() {
        let caps = chrome_capabilities(false);
        let options = caps["goog:chromeOptions"].as_object().unwrap();
        assert!(options.get("excludeSwitches").is_none());
        let args: Vec<&str> = options["args"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(!args.contains(&"--headless=new"));
    }

    #[test]
    fn firefox_headless_arg_follows_flag() {
        let caps = firefox_capabilities(true);
        let options = caps["moz:firefoxOptions"].as_object().unwrap();
        assert_eq!(options["args"], json!(["--headless"]));
    }
}

use std::fmt;
use std::future::Future;
use std::time::Duration;

use fantoccini::actions::{InputSource, MouseActions, PointerAction, MOUSE_BUTTON_LEFT};
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::Client;

use crate::error::{Error, Result};
use crate::locators::Resolved;

/// Default ceiling for [`Dom::wait_until_clickable`].
pub const DEFAULT_WAIT: Duration = Duration::from_secs(20);
/// Fixed interval between polls of the clickable-wait loop.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

const SCROLL_UP_PX: i64 = -1000;
const SCROLL_DOWN_PX: i64 = 700;

/// What an interaction operates on: a locator still to be resolved against
/// the live DOM, or an element handle found earlier.
#[derive(Clone)]
pub enum Target {
    Locator(Resolved),
    Element(Element),
}

impl From<Resolved> for Target {
    fn from(locator: Resolved) -> Self {
        Self::Locator(locator)
    }
}

impl From<&Resolved> for Target {
    fn from(locator: &Resolved) -> Self {
        Self::Locator(locator.clone())
    }
}

impl From<Element> for Target {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&Element> for Target {
    fn from(element: &Element) -> Self {
        Self::Element(element.clone())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locator(locator) => locator.fmt(f),
            Self::Element(_) => f.write_str("pre-resolved element"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Resilient wrapper over the raw find/interact primitives of a WebDriver
/// session. Every operation logs its outcome; failures come back as typed
/// errors rather than panics, so page objects can chain calls with `?`.
#[derive(Clone)]
pub struct Dom {
    client: Client,
    wait_timeout: Duration,
}

impl Dom {
    pub fn new(client: Client) -> Self {
        Self::with_timeout(client, DEFAULT_WAIT)
    }

    pub fn with_timeout(client: Client, wait_timeout: Duration) -> Self {
        Self {
            client,
            wait_timeout,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Find the first element matching a resolved locator. An absent
    /// element comes back as [`Error::NotFound`], not as a command error.
    pub async fn find(&self, locator: &Resolved) -> Result<Element> {
        match self.client.find(locator.locator()).await {
            Ok(element) => {
                tracing::debug!("element found for {locator}");
                Ok(element)
            }
            Err(e) => {
                tracing::error!("element not found for {locator}: {e}");
                Err(lookup_error(locator, e))
            }
        }
    }

    /// Find all elements matching a resolved locator.
    pub async fn find_all(&self, locator: &Resolved) -> Result<Vec<Element>> {
        match self.client.find_all(locator.locator()).await {
            Ok(elements) => {
                tracing::debug!("{} elements found for {locator}", elements.len());
                Ok(elements)
            }
            Err(e) => {
                tracing::error!("element list lookup failed for {locator}: {e}");
                Err(lookup_error(locator, e))
            }
        }
    }

    async fn target_element(&self, target: &Target) -> Result<Element> {
        match target {
            Target::Locator(locator) => self.find(locator).await,
            Target::Element(element) => Ok(element.clone()),
        }
    }

    pub async fn click(&self, target: impl Into<Target>) -> Result<()> {
        let target = target.into();
        let element = self.target_element(&target).await?;
        element.click().await.map_err(|e| {
            tracing::error!("cannot click {target}: {e}");
            Error::from(e)
        })?;
        tracing::info!("clicked {target}");
        Ok(())
    }

    pub async fn type_text(&self, target: impl Into<Target>, text: &str) -> Result<()> {
        let target = target.into();
        let element = self.target_element(&target).await?;
        element.send_keys(text).await.map_err(|e| {
            tracing::error!("cannot type into {target}: {e}");
            Error::from(e)
        })?;
        tracing::info!("typed {text:?} into {target}");
        Ok(())
    }

    pub async fn clear(&self, target: impl Into<Target>) -> Result<()> {
        let target = target.into();
        let element = self.target_element(&target).await?;
        element.clear().await.map_err(|e| {
            tracing::error!("cannot clear {target}: {e}");
            Error::from(e)
        })?;
        tracing::info!("cleared {target}");
        Ok(())
    }

    /// Visible text of an element; falls back to the `innerText` property
    /// when the rendered text is empty. Whitespace is trimmed.
    pub async fn read_text(&self, target: impl Into<Target>) -> Result<String> {
        let target = target.into();
        let element = self.target_element(&target).await?;
        let visible = element.text().await.map_err(|e| {
            tracing::error!("cannot read text of {target}: {e}");
            Error::from(e)
        })?;
        let text = if visible.is_empty() {
            let fallback = element.prop("innerText").await.map_err(|e| {
                tracing::error!("cannot read innerText of {target}: {e}");
                Error::from(e)
            })?;
            effective_text(visible, fallback)
        } else {
            effective_text(visible, None)
        };
        tracing::debug!("text of {target} is {text:?}");
        Ok(text)
    }

    /// Whether the target currently resolves to an element.
    pub async fn is_present(&self, target: impl Into<Target>) -> bool {
        let target = target.into();
        match self.target_element(&target).await {
            Ok(_) => {
                tracing::debug!("{target} is present");
                true
            }
            Err(_) => false, // already logged by find
        }
    }

    /// Whether the target resolves to an element that is currently rendered.
    pub async fn is_displayed(&self, target: impl Into<Target>) -> bool {
        let target = target.into();
        let Ok(element) = self.target_element(&target).await else {
            return false;
        };
        match element.is_displayed().await {
            Ok(displayed) => {
                tracing::debug!("{target} displayed: {displayed}");
                displayed
            }
            Err(e) => {
                tracing::error!("displayed check failed for {target}: {e}");
                false
            }
        }
    }

    /// Poll until the locator resolves to a displayed, enabled element.
    /// Missing elements are ignored while polling; the configured timeout
    /// yields [`Error::Timeout`].
    pub async fn wait_until_clickable(&self, locator: &Resolved) -> Result<Element> {
        self.wait_until_clickable_for(locator, self.wait_timeout).await
    }

    pub async fn wait_until_clickable_for(
        &self,
        locator: &Resolved,
        timeout: Duration,
    ) -> Result<Element> {
        tracing::info!("waiting up to {timeout:?} for {locator} to become clickable");
        let what = format!("{locator} to become clickable");
        let client = self.client.clone();
        let locator = locator.clone();

        let element = poll_until(timeout, POLL_INTERVAL, &what, move || {
            let client = client.clone();
            let locator = locator.clone();
            async move {
                match client.find(locator.locator()).await {
                    Ok(element) => {
                        let displayed = element.is_displayed().await.unwrap_or(false);
                        let enabled = element.is_enabled().await.unwrap_or(false);
                        Ok((displayed && enabled).then_some(element))
                    }
                    Err(e) if e.is_no_such_element() => Ok(None),
                    Err(e) => {
                        tracing::error!("clickable wait aborted for {locator}: {e}");
                        Err(Error::from(e))
                    }
                }
            }
        })
        .await?;

        tracing::info!("element appeared on the page");
        Ok(element)
    }

    /// Move pointer focus onto the target.
    pub async fn hover(&self, target: impl Into<Target>) -> Result<()> {
        let target = target.into();
        let element = self.target_element(&target).await?;
        let pointer = MouseActions::new("mouse".to_string()).then(PointerAction::MoveToElement {
            element,
            duration: None,
            x: 0,
            y: 0,
        });
        self.client.perform_actions(pointer).await.map_err(|e| {
            tracing::error!("cannot move pointer onto {target}: {e}");
            Error::from(e)
        })?;
        tracing::info!("moved pointer onto {target}");
        Ok(())
    }

    /// Move pointer focus onto the target, then click it.
    pub async fn hover_and_click(&self, target: impl Into<Target>) -> Result<()> {
        let target = target.into();
        let element = self.target_element(&target).await?;
        let pointer = MouseActions::new("mouse".to_string())
            .then(PointerAction::MoveToElement {
                element,
                duration: None,
                x: 0,
                y: 0,
            })
            .then(PointerAction::Down {
                button: MOUSE_BUTTON_LEFT,
            })
            .then(PointerAction::Up {
                button: MOUSE_BUTTON_LEFT,
            });
        self.client.perform_actions(pointer).await.map_err(|e| {
            tracing::error!("cannot move-and-click {target}: {e}");
            Error::from(e)
        })?;
        tracing::info!("moved pointer onto {target} and clicked");
        Ok(())
    }

    /// Programmatic viewport scroll by a fixed offset.
    pub async fn scroll(&self, direction: ScrollDirection) -> Result<()> {
        let offset = match direction {
            ScrollDirection::Up => SCROLL_UP_PX,
            ScrollDirection::Down => SCROLL_DOWN_PX,
        };
        let script = format!("window.scrollBy(0, {offset});");
        self.client.execute(&script, vec![]).await.map_err(|e| {
            tracing::error!("scroll failed: {e}");
            Error::from(e)
        })?;
        tracing::debug!("scrolled {direction:?} by {} px", offset.abs());
        Ok(())
    }

    pub async fn title(&self) -> Result<String> {
        self.client.title().await.map_err(|e| {
            tracing::error!("cannot read page title: {e}");
            Error::from(e)
        })
    }

    /// Case-insensitive containment check of the live title within the
    /// expected string (the expected value may carry decorations around the
    /// real title).
    pub async fn title_contains(&self, expected: &str) -> Result<bool> {
        let actual = self.title().await?;
        let contains = expected.to_lowercase().contains(&actual.to_lowercase());
        if contains {
            tracing::info!("title verification passed for {actual:?}");
        } else {
            tracing::info!("title verification failed: {actual:?} not within {expected:?}");
        }
        Ok(contains)
    }
}

/// Classify a failed element lookup: a missing element is a [`Error::NotFound`]
/// carrying the locator, anything else is a plain command failure.
fn lookup_error(locator: &Resolved, e: CmdError) -> Error {
    if e.is_no_such_element() {
        Error::NotFound(format!("element for {locator}"))
    } else {
        Error::Interaction(e)
    }
}

fn effective_text(visible: String, fallback: Option<String>) -> String {
    let text = if visible.is_empty() {
        fallback.unwrap_or_default()
    } else {
        visible
    };
    text.trim().to_string()
}

/// Run `probe` every `interval` until it yields a value or `timeout` passes.
/// A probe returning `Ok(None)` means "not ready yet"; errors abort the wait.
async fn poll_until<T, F, Fut>(
    timeout: Duration,
    interval: Duration,
    what: &str,
    mut probe: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if let Some(value) = probe().await? {
            return Ok(value);
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(Error::Timeout {
                what: what.to_string(),
                waited: timeout,
            });
        }
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locators::Strategy;
    use fantoccini::error::{ErrorStatus, WebDriver as WebDriverError};

    #[test]
    fn missing_element_maps_to_not_found() {
        let locator = Resolved::new(Strategy::Id, "btnK");
        let missing = CmdError::Standard(WebDriverError::new(
            ErrorStatus::NoSuchElement,
            "no such element",
        ));
        match lookup_error(&locator, missing) {
            Error::NotFound(what) => assert!(what.contains("btnK")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn other_command_failures_stay_interaction_errors() {
        let locator = Resolved::new(Strategy::Css, ".row");
        let garbled = CmdError::NotJson("not json".to_string());
        assert!(matches!(
            lookup_error(&locator, garbled),
            Error::Interaction(_)
        ));
    }

    #[test]
    fn effective_text_prefers_visible_text() {
        assert_eq!(effective_text("  Submit \n".into(), None), "Submit");
    }

    #[test]
    fn effective_text_falls_back_to_inner_text() {
        assert_eq!(
            effective_text(String::new(), Some(" Hello ".into())),
            "Hello"
        );
    }

    #[test]
    fn effective_text_empty_when_both_missing() {
        assert_eq!(effective_text(String::new(), None), "");
    }

    #[tokio::test(start_paused = true)]
    async fn poll_until_times_out_at_the_deadline() {
        let start = tokio::time::Instant::now();
        let result: Result<()> = poll_until(
            Duration::from_secs(2),
            Duration::from_millis(500),
            "a condition that never holds",
            || async { Ok(None) },
        )
        .await;

        let waited = start.elapsed();
        assert!(matches!(result, Err(Error::Timeout { .. })));
        // not immediate, not unbounded
        assert!(waited >= Duration::from_secs(2));
        assert!(waited < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn poll_until_returns_once_ready() {
        let mut calls = 0u32;
        let value = poll_until(
            Duration::from_secs(2),
            Duration::from_millis(500),
            "a condition that holds on the third poll",
            move || {
                calls += 1;
                let ready = calls >= 3;
                async move { Ok(ready.then_some(42)) }
            },
        )
        .await
        .unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn poll_until_propagates_probe_errors() {
        let result: Result<()> = poll_until(
            Duration::from_secs(2),
            Duration::from_millis(500),
            "a probe that raises",
            || async { Err(Error::Configuration("bad state".into())) },
        )
        .await;
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}

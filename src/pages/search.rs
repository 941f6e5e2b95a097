use crate::error::Result;
use crate::interaction::Dom;
use crate::locators::LocatorStore;

/// Search landing page: keyword entry and the suggestion dropdown.
pub struct SearchPage {
    dom: Dom,
    locators: LocatorStore,
}

impl SearchPage {
    pub fn new(dom: Dom, locators: LocatorStore) -> Self {
        Self { dom, locators }
    }

    pub async fn page_title(&self) -> Result<String> {
        self.dom.title().await
    }

    /// Type a keyword into the search box and check that every populated
    /// suggestion mentions it. Returns false when a suggestion does not.
    pub async fn search_keyword(&self, keyword: &str) -> Result<bool> {
        tracing::info!("searching for {keyword:?}");

        let search_box = self.locators.resolve("search_box")?;
        self.dom.type_text(&search_box, keyword).await?;

        let options = self.locators.resolve("search_option")?;
        let suggestions = self.dom.find_all(&options).await?;
        for suggestion in &suggestions {
            let text = self.dom.read_text(suggestion).await?;
            tracing::info!("suggestion found: {text:?}");
            if !text.to_lowercase().contains(&keyword.to_lowercase()) {
                tracing::warn!("suggestion {text:?} does not mention {keyword:?}");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Pick the first suggestion and check that the download section shows
    /// up in the results.
    pub async fn verify_download_link(&self) -> Result<bool> {
        let option = self.locators.resolve("select_search_option")?;
        self.dom.click(&option).await?;

        let download = self.locators.resolve("selenium_download")?;
        Ok(self.dom.is_present(&download).await)
    }
}

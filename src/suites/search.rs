use std::sync::Arc;

use anyhow::ensure;

use crate::fixtures::TestData;
use crate::harness::{TestCase, TestSuite};
use crate::interaction::Dom;
use crate::locators::LocatorStore;
use crate::pages::SearchPage;

pub fn suite(dom: Dom, locators: LocatorStore, data: Arc<TestData>) -> TestSuite {
    let page = Arc::new(SearchPage::new(dom, locators));

    let (p, d) = (page.clone(), data.clone());
    let verify_title = TestCase::new("search::verify_page_title", move || {
        let (page, data) = (p.clone(), d.clone());
        async move {
            let expected = data.get_str("page_title")?.to_string();
            let actual = page.page_title().await?;
            ensure!(
                actual == expected,
                "page title {actual:?} does not match {expected:?}"
            );
            Ok(())
        }
    });

    let (p, d) = (page.clone(), data);
    let search_keyword = TestCase::new("search::search_keyword", move || {
        let (page, data) = (p.clone(), d.clone());
        async move {
            let keyword = data.get_str("search_keyword")?.to_string();
            ensure!(
                page.search_keyword(&keyword).await?,
                "no matching suggestions for keyword {keyword:?}"
            );
            Ok(())
        }
    });

    TestSuite::new("search")
        .case(verify_title)
        .case(search_keyword)
        // The live search page serves a captcha to automated sessions.
        .skip(
            "search::verify_selenium_download",
            "search page shows a captcha to automated sessions",
        )
}

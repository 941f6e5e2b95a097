use std::sync::Arc;

use anyhow::ensure;
use chrono::{Datelike, Duration, Local};

use crate::fixtures::TestData;
use crate::harness::{TestCase, TestSuite};
use crate::interaction::Dom;
use crate::locators::LocatorStore;
use crate::pages::BookingPage;

pub fn suite(dom: Dom, locators: LocatorStore, data: Arc<TestData>) -> TestSuite {
    let page = Arc::new(BookingPage::new(dom, locators));

    let (p, d) = (page.clone(), data.clone());
    let verify_title = TestCase::new("booking::verify_page_title", move || {
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

    let (p, d) = (page.clone(), data.clone());
    let select_origin = TestCase::new("booking::select_origin_city", move || {
        let (page, data) = (p.clone(), d.clone());
        async move {
            let city = data.get_str("src_city")?.to_string();
            page.select_origin(&city).await?;
            Ok(())
        }
    });

    let (p, d) = (page.clone(), data);
    let select_destination = TestCase::new("booking::select_destination_city", move || {
        let (page, data) = (p.clone(), d.clone());
        async move {
            let city = data.get_str("dest_city")?.to_string();
            page.select_destination(&city).await?;
            Ok(())
        }
    });

    let p = page.clone();
    let select_date = TestCase::new("booking::select_departure_date", move || {
        let page = p.clone();
        async move {
            let day = (Local::now() + Duration::days(2)).day().to_string();
            page.select_departure_date(&day).await?;
            Ok(())
        }
    });

    let p = page;
    let submit = TestCase::new("booking::submit_search", move || {
        let page = p.clone();
        async move {
            page.submit_search().await?;
            Ok(())
        }
    });

    TestSuite::new("booking")
        .case(verify_title)
        .case(select_origin)
        .case(select_destination)
        .case(select_date)
        .case(submit)
}

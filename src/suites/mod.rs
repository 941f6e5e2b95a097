//! Scripted test cases, one module per page under test. Each suite borrows
//! one browser session and asserts against its fixture document.

pub mod booking;
pub mod search;

use std::sync::Arc;

use crate::fixtures::TestData;
use crate::harness::TestSuite;
use crate::interaction::Dom;
use crate::locators::LocatorStore;

/// Everything needed to wire one suite: which config and locator/fixture
/// documents it reads, and the builder producing its cases.
pub struct SuiteSpec {
    pub name: &'static str,
    /// Config name under `config/` (selects base URL and locator folder).
    pub config: &'static str,
    /// Locator document name under `locators/<folder>/`.
    pub page: &'static str,
    /// Fixture document name under `data/`.
    pub data: &'static str,
    pub build: fn(Dom, LocatorStore, Arc<TestData>) -> TestSuite,
}

pub const SUITES: &[SuiteSpec] = &[
    SuiteSpec {
        name: "search",
        config: "google",
        page: "SearchPage",
        data: "SearchSuite",
        build: search::suite,
    },
    SuiteSpec {
        name: "booking",
        config: "goibibo",
        page: "BookingPage",
        data: "BookingSuite",
        build: booking::suite,
    },
];

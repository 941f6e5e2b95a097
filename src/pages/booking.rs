use crate::error::Result;
use crate::interaction::Dom;
use crate::locators::LocatorStore;

/// Bus booking page: origin/destination pickers, date calendar, search.
pub struct BookingPage {
    dom: Dom,
    locators: LocatorStore,
}

impl BookingPage {
    pub fn new(dom: Dom, locators: LocatorStore) -> Self {
        Self { dom, locators }
    }

    pub async fn page_title(&self) -> Result<String> {
        self.dom.title().await
    }

    /// Type the origin city and pick the matching dropdown entry.
    pub async fn select_origin(&self, city: &str) -> Result<()> {
        tracing::info!("selecting origin city {city:?}");

        let input = self
            .locators
            .resolve_with("from_city_input_field", &[("src_city", city)])?;
        self.dom.type_text(&input, city).await?;

        let option = self.locators.resolve_with("src_city", &[("src_city", city)])?;
        self.dom.click(&option).await?;

        tracing::info!("origin city {city:?} selected");
        Ok(())
    }

    /// Type the destination city and pick the matching dropdown entry.
    pub async fn select_destination(&self, city: &str) -> Result<()> {
        tracing::info!("selecting destination city {city:?}");

        let input = self
            .locators
            .resolve_with("dest_city_input_field", &[("dest_city", city)])?;
        self.dom.type_text(&input, city).await?;

        let option = self
            .locators
            .resolve_with("dest_city", &[("dest_city", city)])?;
        self.dom.click(&option).await?;

        tracing::info!("destination city {city:?} selected");
        Ok(())
    }

    /// Open the calendar and pick the given day of month.
    pub async fn select_departure_date(&self, day: &str) -> Result<()> {
        tracing::info!("selecting departure date {day}");

        let field = self.locators.resolve("booking_date_loc")?;
        self.dom.click(&field).await?;

        let cell = self
            .locators
            .resolve_with("depart_date", &[("depart_date", day)])?;
        self.dom.click(&cell).await?;

        tracing::info!("departure date {day} selected");
        Ok(())
    }

    /// Wait out the results overlay and fire the search.
    pub async fn submit_search(&self) -> Result<()> {
        let button = self.locators.resolve("search_btn")?;
        let element = self.dom.wait_until_clickable(&button).await?;
        self.dom.click(&element).await?;
        tracing::info!("search submitted");
        Ok(())
    }
}

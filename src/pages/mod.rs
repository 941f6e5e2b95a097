mod booking;
mod search;

pub use booking::BookingPage;
pub use search::SearchPage;

mod factory;
mod session;

pub use factory::{connect, BrowserKind};
pub use session::Session;

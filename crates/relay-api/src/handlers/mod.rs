//! Request handlers.

pub mod health;
pub mod status_page;
pub mod sweep;
pub mod webhook;

pub use health::health;
pub use status_page::status_page;
pub use sweep::run_sweep;
pub use webhook::notion_webhook;

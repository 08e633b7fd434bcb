pub mod api;
pub mod cli;
pub mod error;
pub mod logging;
pub mod markdown;
pub mod poller;
pub mod reconcile;
pub mod settings;
pub mod sink;
pub mod translate;
pub mod transliteration;
pub mod types;

#[cfg(feature = "desktop")]
pub mod theme;
#[cfg(feature = "desktop")]
pub mod ui;
#[cfg(feature = "desktop")]
pub mod views;

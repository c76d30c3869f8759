pub mod fetcher;
pub mod model;
pub mod notifier;
pub mod sleeper;

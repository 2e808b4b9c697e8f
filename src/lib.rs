pub mod app;
pub mod fetch;
pub mod git;
pub mod locator;
pub mod scan;
pub mod status;
pub mod sync;
pub mod types;
pub mod ui;

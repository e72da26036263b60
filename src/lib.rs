pub mod api;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod gateway;
pub mod indicators;
pub mod list_tickers;
pub mod logger;
pub mod model;
pub mod pricing;
pub mod report;
pub mod screener;

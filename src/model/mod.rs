pub mod chain;
pub mod history;
pub mod report;

pub use chain::{OptionChain, OptionQuote, OptionSide, PricedOption};
pub use history::{CompanyInfo, HistoryPeriod, PriceHistory, PricePoint};
pub use report::{FailedTicker, ScreenReport, TickerOutcome, TickerResult};

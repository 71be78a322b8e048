//! Domain types: firm state and aggregate time series

pub mod firm;
pub mod series;

pub use firm::{FirmPanel, FirmState};
pub use series::{AggregateSeries, SeriesSummary};

pub mod client;
pub mod types;

pub use client::{AxelarscanClient, AxelarscanError, DEFAULT_API_BASE};
pub use types::{ChartPoint, GmpRecord, ItsAsset, TopAsset};

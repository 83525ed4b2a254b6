pub mod hn;
pub mod markdown;

pub use hn::{fetch_thread, parse_thread, FetchError};

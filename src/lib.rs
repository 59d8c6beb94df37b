pub mod record;
pub mod classify;
pub mod extract;
pub mod store;
pub mod filter;
pub mod stats;
pub mod correlate;
pub mod highlight;
pub mod export;
pub mod sample;

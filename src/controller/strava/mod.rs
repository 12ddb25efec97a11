pub mod client;
pub mod import;
pub mod types;

pub use client::*;
pub use import::*;
pub use types::*;

pub mod client;

pub use client::{MediaDetails, MediaProvider, TmdbClient};

#[cfg(test)]
pub use client::MockMediaProvider;

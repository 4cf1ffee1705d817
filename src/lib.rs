pub mod download;
pub mod fs;
pub mod termio;

mod chapter;
mod client;
mod error;
mod extract;
mod selectors;
mod serie;

pub use chapter::{Chapter, Image};
pub use client::{Client, Fetch, Pacer};
pub use error::{Error, FetchError};
pub use extract::EpisodeSummary;
pub use serie::Serie;

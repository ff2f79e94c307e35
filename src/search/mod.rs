pub mod google;

pub use google::{dedup_links, CompetitorSearch};

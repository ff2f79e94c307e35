// Page fetching: trait-based so the pipeline can run against canned HTML.
//
// HttpFetcher is the production implementation. Tests and the CLI's
// offline paths plug in their own PageSource.

pub mod http;
pub mod traits;

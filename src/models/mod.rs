pub mod artifact;
pub mod download;
pub mod fetcher;
pub mod layout;

pub use artifact::ModelArtifact;
pub use download::{HfHubClient, HubClient};
pub use fetcher::{DownloadOutcome, FetchOptions, FetchReport, Fetcher, FileOutcome};
pub use layout::Layout;

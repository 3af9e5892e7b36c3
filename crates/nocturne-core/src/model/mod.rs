pub mod composition;
pub mod content;
pub mod download;
pub mod opus;

pub use composition::Composition;
pub use content::ContentRef;
pub use download::DownloadEntry;
pub use opus::Opus;

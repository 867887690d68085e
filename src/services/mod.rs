pub mod featured;
pub mod providers;
pub mod recommendations;

pub use featured::featured_posters;
pub use providers::{MetadataClient, TmdbProvider};
pub use recommendations::recommend;

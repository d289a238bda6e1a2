pub mod connection;
pub mod images;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_settings, DbPool};
pub use images::{image_key, FsImageStore, ImageStore, ImageStoreError};

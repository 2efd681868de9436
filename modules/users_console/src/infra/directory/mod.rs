pub mod http_directory_client;

pub use http_directory_client::HttpDirectoryClient;

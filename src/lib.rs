pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use config::AppConfig;
pub use infrastructure::AppContainer;
pub use presentation::http::HttpServer;

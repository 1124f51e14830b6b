pub mod config;
pub mod document;
pub mod error;

pub use config::{Config, DatasetConfig, RedisConfig, load_env_file};
pub use document::*;
pub use error::*;

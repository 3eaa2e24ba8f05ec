pub mod config;

pub use config::{BlockBound, BlockRangeConfig, Config, DatabaseConfig, EthereumConfig};

pub mod balance_resolver;
pub mod catchup_service;
pub mod gap_detector;
pub mod import_service;
pub mod range_chunker;
pub mod range_fetcher;
pub mod realtime_service;
pub mod token_metadata;

pub use catchup_service::CatchupService;
pub use import_service::ImportService;
pub use realtime_service::RealtimeService;

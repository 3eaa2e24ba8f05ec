pub mod address_db;
pub mod block_db;
pub mod schema;
pub mod token_db;
pub mod token_transfer_db;
pub mod transaction_db;

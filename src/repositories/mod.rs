pub mod address_repository;
pub mod base;
pub mod block_repository;
pub mod token_repository;
pub mod token_transfer_repository;
pub mod transaction_repository;

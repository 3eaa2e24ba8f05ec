pub mod db;
pub mod domain;

pub use db::schema;
pub use db::{address_db, block_db, token_db, token_transfer_db, transaction_db};
pub use domain::{
    AddressDomain, BlockDomain, BlockNumberRange, TokenDomain, TokenTransferDomain, TokenType,
    TransactionDomain,
};

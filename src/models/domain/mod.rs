pub mod address;
pub mod block;
pub mod range;
pub mod token;
pub mod token_transfer;
pub mod transaction;

pub use address::AddressDomain;
pub use block::BlockDomain;
pub use range::BlockNumberRange;
pub use token::{TokenDomain, TokenType};
pub use token_transfer::TokenTransferDomain;
pub use transaction::TransactionDomain;

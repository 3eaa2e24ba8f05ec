use super::{TransferMatcher, log_identity};
use crate::errors::error::AppError;
use crate::infrastructure::protocol::constants::{
    SELECTOR_ERC20_TRANSFER, SELECTOR_TRANSFER_FROM, TRANSFER_EVENT_TOPIC,
};
use crate::models::domain::token::TokenType;
use crate::models::domain::token_transfer::TokenTransferDomain;
use crate::utils::format::u256_to_bigdecimal;
use crate::utils::{h160_to_string, topic_to_address};
use ethers_core::types::{Log, U256};

/// ERC-20 Transfer：topics = [签名, from, to]，金额在 data 的 32 字节字里
pub struct Erc20Matcher;

impl TransferMatcher for Erc20Matcher {
    fn token_type(&self) -> TokenType {
        TokenType::Erc20
    }

    fn matches_input_selector(&self, selector: [u8; 4]) -> bool {
        selector == SELECTOR_ERC20_TRANSFER || selector == SELECTOR_TRANSFER_FROM
    }

    fn matches_log(&self, log: &Log) -> bool {
        log.topics.len() == 3 && log.topics[0] == *TRANSFER_EVENT_TOPIC
    }

    fn parse(&self, log: &Log) -> Result<TokenTransferDomain, AppError> {
        let (tx_hash, log_index, block_number, contract) = log_identity(log)?;

        if log.data.len() < 32 {
            return Err(AppError::ParserError(format!(
                "ERC-20 Transfer data 不足 32 字节: {} 字节",
                log.data.len()
            )));
        }
        let amount = U256::from_big_endian(&log.data[0..32]);

        Ok(TokenTransferDomain {
            tx_hash,
            log_index,
            from_address: h160_to_string(topic_to_address(log.topics[1])),
            to_address: h160_to_string(topic_to_address(log.topics[2])),
            token_contract_address: contract,
            block_number,
            token_type: TokenType::Erc20,
            amount: Some(u256_to_bigdecimal(amount)),
            token_id: None,
            amounts: None,
            token_ids: None,
        })
    }
}

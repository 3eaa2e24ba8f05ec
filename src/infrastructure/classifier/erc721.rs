use super::{TransferMatcher, log_identity};
use crate::errors::error::AppError;
use crate::infrastructure::protocol::constants::{
    SELECTOR_ERC721_SAFE_TRANSFER, SELECTOR_ERC721_SAFE_TRANSFER_DATA, SELECTOR_TRANSFER_FROM,
    TRANSFER_EVENT_TOPIC,
};
use crate::models::domain::token::TokenType;
use crate::models::domain::token_transfer::TokenTransferDomain;
use crate::utils::format::u256_to_bigdecimal;
use crate::utils::{h160_to_string, topic_to_address};
use ethers_core::types::{H256, Log, U256};

/// 规范 ERC-721 Transfer：三个参数全部 indexed，
/// topics = [签名, from, to, tokenId]，data 为空
pub struct Erc721TopicMatcher;

impl TransferMatcher for Erc721TopicMatcher {
    fn token_type(&self) -> TokenType {
        TokenType::Erc721
    }

    fn matches_input_selector(&self, selector: [u8; 4]) -> bool {
        selector == SELECTOR_TRANSFER_FROM
            || selector == SELECTOR_ERC721_SAFE_TRANSFER
            || selector == SELECTOR_ERC721_SAFE_TRANSFER_DATA
    }

    fn matches_log(&self, log: &Log) -> bool {
        log.topics.len() == 4 && log.topics[0] == *TRANSFER_EVENT_TOPIC
    }

    fn parse(&self, log: &Log) -> Result<TokenTransferDomain, AppError> {
        let (tx_hash, log_index, block_number, contract) = log_identity(log)?;
        let token_id = U256::from_big_endian(log.topics[3].as_bytes());

        Ok(TokenTransferDomain {
            tx_hash,
            log_index,
            from_address: h160_to_string(topic_to_address(log.topics[1])),
            to_address: h160_to_string(topic_to_address(log.topics[2])),
            token_contract_address: contract,
            block_number,
            token_type: TokenType::Erc721,
            amount: None,
            token_id: Some(u256_to_bigdecimal(token_id)),
            amounts: None,
            token_ids: None,
        })
    }
}

/// 早期非规范 ERC-721 实现：参数不做 indexed，
/// topics 只有签名，from/to/tokenId 三个 32 字节字顺序排在 data 里
pub struct Erc721DataMatcher;

impl TransferMatcher for Erc721DataMatcher {
    fn token_type(&self) -> TokenType {
        TokenType::Erc721
    }

    fn matches_input_selector(&self, selector: [u8; 4]) -> bool {
        selector == SELECTOR_TRANSFER_FROM
            || selector == SELECTOR_ERC721_SAFE_TRANSFER
            || selector == SELECTOR_ERC721_SAFE_TRANSFER_DATA
    }

    fn matches_log(&self, log: &Log) -> bool {
        log.topics.len() == 1 && log.topics[0] == *TRANSFER_EVENT_TOPIC
    }

    fn parse(&self, log: &Log) -> Result<TokenTransferDomain, AppError> {
        let (tx_hash, log_index, block_number, contract) = log_identity(log)?;

        if log.data.len() < 96 {
            return Err(AppError::ParserError(format!(
                "data 编码的 ERC-721 Transfer 载荷不足 96 字节: {} 字节",
                log.data.len()
            )));
        }
        let from = topic_to_address(H256::from_slice(&log.data[0..32]));
        let to = topic_to_address(H256::from_slice(&log.data[32..64]));
        let token_id = U256::from_big_endian(&log.data[64..96]);

        Ok(TokenTransferDomain {
            tx_hash,
            log_index,
            from_address: h160_to_string(from),
            to_address: h160_to_string(to),
            token_contract_address: contract,
            block_number,
            token_type: TokenType::Erc721,
            amount: None,
            token_id: Some(u256_to_bigdecimal(token_id)),
            amounts: None,
            token_ids: None,
        })
    }
}

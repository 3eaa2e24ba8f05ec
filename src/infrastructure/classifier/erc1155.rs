use super::{TransferMatcher, log_identity};
use crate::errors::error::AppError;
use crate::infrastructure::protocol::constants::{
    ERC1155_BATCH_EVENT_TOPIC, ERC1155_SINGLE_EVENT_TOPIC, SELECTOR_ERC1155_SAFE_BATCH_TRANSFER,
    SELECTOR_ERC1155_SAFE_TRANSFER,
};
use crate::models::domain::token::TokenType;
use crate::models::domain::token_transfer::TokenTransferDomain;
use crate::utils::format::u256_to_bigdecimal;
use crate::utils::{h160_to_string, topic_to_address};
use bigdecimal::BigDecimal;
use ethers_core::abi::{ParamType, Token, decode};
use ethers_core::types::Log;

/// TransferSingle：topics = [签名, operator, from, to]，data = (id, value)
pub struct Erc1155SingleMatcher;

impl TransferMatcher for Erc1155SingleMatcher {
    fn token_type(&self) -> TokenType {
        TokenType::Erc1155
    }

    fn matches_input_selector(&self, selector: [u8; 4]) -> bool {
        selector == SELECTOR_ERC1155_SAFE_TRANSFER
    }

    fn matches_log(&self, log: &Log) -> bool {
        log.topics.len() == 4 && log.topics[0] == *ERC1155_SINGLE_EVENT_TOPIC
    }

    fn parse(&self, log: &Log) -> Result<TokenTransferDomain, AppError> {
        let (tx_hash, log_index, block_number, contract) = log_identity(log)?;

        let tokens = decode(&[ParamType::Uint(256), ParamType::Uint(256)], &log.data)
            .map_err(|e| AppError::ParserError(format!("TransferSingle data 解码失败: {}", e)))?;
        let token_id = uint_token(&tokens[0])?;
        let amount = uint_token(&tokens[1])?;

        Ok(TokenTransferDomain {
            tx_hash,
            log_index,
            // topics[1] 是 operator，真正的转出/转入方在 [2]/[3]
            from_address: h160_to_string(topic_to_address(log.topics[2])),
            to_address: h160_to_string(topic_to_address(log.topics[3])),
            token_contract_address: contract,
            block_number,
            token_type: TokenType::Erc1155,
            amount: Some(amount),
            token_id: Some(token_id),
            amounts: None,
            token_ids: None,
        })
    }
}

/// TransferBatch：topics 同上，data = (uint256[] ids, uint256[] values) 平行数组
pub struct Erc1155BatchMatcher;

impl TransferMatcher for Erc1155BatchMatcher {
    fn token_type(&self) -> TokenType {
        TokenType::Erc1155
    }

    fn matches_input_selector(&self, selector: [u8; 4]) -> bool {
        selector == SELECTOR_ERC1155_SAFE_BATCH_TRANSFER
    }

    fn matches_log(&self, log: &Log) -> bool {
        log.topics.len() == 4 && log.topics[0] == *ERC1155_BATCH_EVENT_TOPIC
    }

    fn parse(&self, log: &Log) -> Result<TokenTransferDomain, AppError> {
        let (tx_hash, log_index, block_number, contract) = log_identity(log)?;

        let tokens = decode(
            &[
                ParamType::Array(Box::new(ParamType::Uint(256))),
                ParamType::Array(Box::new(ParamType::Uint(256))),
            ],
            &log.data,
        )
        .map_err(|e| AppError::ParserError(format!("TransferBatch data 解码失败: {}", e)))?;

        let token_ids = uint_array_token(&tokens[0])?;
        let amounts = uint_array_token(&tokens[1])?;
        if token_ids.len() != amounts.len() {
            return Err(AppError::ParserError(format!(
                "TransferBatch ids/values 长度不一致: {} vs {}",
                token_ids.len(),
                amounts.len()
            )));
        }

        Ok(TokenTransferDomain {
            tx_hash,
            log_index,
            from_address: h160_to_string(topic_to_address(log.topics[2])),
            to_address: h160_to_string(topic_to_address(log.topics[3])),
            token_contract_address: contract,
            block_number,
            token_type: TokenType::Erc1155,
            amount: None,
            token_id: None,
            amounts: Some(amounts),
            token_ids: Some(token_ids),
        })
    }
}

fn uint_token(token: &Token) -> Result<BigDecimal, AppError> {
    match token {
        Token::Uint(value) => Ok(u256_to_bigdecimal(*value)),
        other => Err(AppError::ParserError(format!(
            "期望 uint256，实际为 {:?}",
            other
        ))),
    }
}

fn uint_array_token(token: &Token) -> Result<Vec<BigDecimal>, AppError> {
    match token {
        Token::Array(items) => items.iter().map(uint_token).collect(),
        other => Err(AppError::ParserError(format!(
            "期望 uint256[]，实际为 {:?}",
            other
        ))),
    }
}

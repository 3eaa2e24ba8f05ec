pub mod erc20;
pub mod erc721;
pub mod erc1155;

use crate::errors::error::AppError;
use crate::log_warn;
use crate::models::domain::token::{TokenDomain, TokenType};
use crate::models::domain::token_transfer::TokenTransferDomain;
use crate::utils::{h256_to_string, u256_to_i64};
use ethers_core::types::{Bytes, Log, TransactionReceipt};
use std::collections::HashSet;

pub use erc20::Erc20Matcher;
pub use erc721::{Erc721DataMatcher, Erc721TopicMatcher};
pub use erc1155::{Erc1155BatchMatcher, Erc1155SingleMatcher};

/// 单个代币标准的识别/解析能力。
/// matches_input_selector: 对交易 calldata 前 4 字节的廉价预筛，
/// 命中才去拉回执，省掉绝大多数非转账交易的一次 RPC；
/// matches_log: 以 topics[0] 事件签名 + indexed topic 个数为分发键；
/// parse: 对畸形载荷可返回错误，由注册表记日志后跳过该条。
pub trait TransferMatcher: Send + Sync {
    fn token_type(&self) -> TokenType;
    fn matches_input_selector(&self, selector: [u8; 4]) -> bool;
    fn matches_log(&self, log: &Log) -> bool;
    fn parse(&self, log: &Log) -> Result<TokenTransferDomain, AppError>;
}

/// 五个 matcher 的有序注册表，固定优先级：
/// ERC-20 → ERC-721(topic 编码) → ERC-721(data 编码) → ERC-1155 批量 → ERC-1155 单笔。
/// 良构日志至多命中一个 matcher；分发循环在首个命中处短路，
/// 与"全部应用"在互斥前提下等价，取更省的那种。
pub struct TransferClassifier {
    matchers: Vec<Box<dyn TransferMatcher>>,
}

impl Default for TransferClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferClassifier {
    pub fn new() -> Self {
        Self {
            matchers: vec![
                Box::new(Erc20Matcher),
                Box::new(Erc721TopicMatcher),
                Box::new(Erc721DataMatcher),
                Box::new(Erc1155BatchMatcher),
                Box::new(Erc1155SingleMatcher),
            ],
        }
    }

    /// calldata 预筛：selector 命中任一标准的转账方法才值得拉回执
    pub fn is_transfer_like(&self, input: &Bytes) -> bool {
        let Some(head) = input.get(0..4) else {
            return false;
        };
        let selector: [u8; 4] = head.try_into().unwrap_or_default();
        self.matchers
            .iter()
            .any(|m| m.matches_input_selector(selector))
    }

    /// 把一张回执的全部日志归类为转账记录 + 本回执内去重后的代币合约。
    /// 单条日志解析失败只跳过该条，不影响同批其它日志。
    pub fn classify_receipt(
        &self,
        receipt: &TransactionReceipt,
    ) -> (Vec<TokenTransferDomain>, Vec<TokenDomain>) {
        let mut transfers = Vec::new();
        let mut tokens: Vec<TokenDomain> = Vec::new();
        let mut seen_contracts: HashSet<String> = HashSet::new();

        for log in &receipt.logs {
            let Some(matcher) = self.matchers.iter().find(|m| m.matches_log(log)) else {
                continue;
            };
            match matcher.parse(log) {
                Ok(transfer) => {
                    if seen_contracts.insert(transfer.token_contract_address.clone()) {
                        tokens.push(TokenDomain::discovered(
                            transfer.token_contract_address.clone(),
                            matcher.token_type(),
                        ));
                    }
                    transfers.push(transfer);
                }
                Err(e) => {
                    log_warn!(
                        "转账日志解析失败 tx={:?} log_index={:?}: {}",
                        log.transaction_hash,
                        log.log_index,
                        e
                    );
                }
            }
        }

        (transfers, tokens)
    }
}

/// 所有标准共用的日志身份字段 (tx_hash, log_index, block_number, 合约地址)
pub(crate) fn log_identity(log: &Log) -> Result<(String, i64, i64, String), AppError> {
    let tx_hash = log
        .transaction_hash
        .map(h256_to_string)
        .ok_or_else(|| AppError::InvalidTxHash("日志缺少 transaction_hash".to_string()))?;
    let log_index = log
        .log_index
        .ok_or_else(|| AppError::ParserError("日志缺少 log_index".to_string()))
        .and_then(u256_to_i64)?;
    let block_number = log
        .block_number
        .ok_or_else(|| AppError::InvalidBlockNumber("日志缺少 block_number".to_string()))?
        .as_u64() as i64;
    let contract = crate::utils::h160_to_string(log.address);
    Ok((tx_hash, log_index, block_number, contract))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::protocol::constants::{
        ERC1155_BATCH_EVENT_TOPIC, ERC1155_SINGLE_EVENT_TOPIC, SELECTOR_ERC20_TRANSFER,
        TRANSFER_EVENT_TOPIC,
    };
    use bigdecimal::BigDecimal;
    use ethers_core::abi::{Token, encode};
    use ethers_core::types::{H160, H256, U64, U256};
    use std::str::FromStr;

    fn address_topic(byte: u8) -> H256 {
        H256::from(H160::repeat_byte(byte))
    }

    fn base_log(topics: Vec<H256>, data: Vec<u8>) -> Log {
        Log {
            address: H160::repeat_byte(0xcc),
            topics,
            data: data.into(),
            transaction_hash: Some(H256::repeat_byte(0x99)),
            log_index: Some(U256::from(3u64)),
            block_number: Some(U64::from(1000u64)),
            ..Default::default()
        }
    }

    fn amount_word(value: u64) -> Vec<u8> {
        let mut word = [0u8; 32];
        U256::from(value).to_big_endian(&mut word);
        word.to_vec()
    }

    #[test]
    fn three_topic_transfer_classifies_as_erc20_only() {
        let log = base_log(
            vec![*TRANSFER_EVENT_TOPIC, address_topic(0x01), address_topic(0x02)],
            amount_word(500),
        );
        let classifier = TransferClassifier::new();
        let matching: Vec<TokenType> = classifier
            .matchers
            .iter()
            .filter(|m| m.matches_log(&log))
            .map(|m| m.token_type())
            .collect();
        assert_eq!(matching, vec![TokenType::Erc20]);
    }

    #[test]
    fn four_topic_transfer_classifies_as_erc721_only() {
        let log = base_log(
            vec![
                *TRANSFER_EVENT_TOPIC,
                address_topic(0x01),
                address_topic(0x02),
                H256::from_low_u64_be(42),
            ],
            vec![],
        );
        let classifier = TransferClassifier::new();
        let matching: Vec<TokenType> = classifier
            .matchers
            .iter()
            .filter(|m| m.matches_log(&log))
            .map(|m| m.token_type())
            .collect();
        assert_eq!(matching, vec![TokenType::Erc721]);
    }

    #[test]
    fn erc20_receipt_yields_transfer_and_discovered_token() {
        let log = base_log(
            vec![*TRANSFER_EVENT_TOPIC, address_topic(0x01), address_topic(0x02)],
            amount_word(500),
        );
        let receipt = TransactionReceipt {
            logs: vec![log],
            ..Default::default()
        };
        let (transfers, tokens) = TransferClassifier::new().classify_receipt(&receipt);
        assert_eq!(transfers.len(), 1);
        assert_eq!(tokens.len(), 1);
        assert_eq!(transfers[0].token_type, TokenType::Erc20);
        assert_eq!(transfers[0].amount, Some(BigDecimal::from(500)));
        assert_eq!(transfers[0].log_index, 3);
        assert_eq!(transfers[0].block_number, 1000);
        assert_eq!(tokens[0].contract_address_hash, transfers[0].token_contract_address);
    }

    #[test]
    fn erc1155_single_parses_id_and_value() {
        let data = encode(&[Token::Uint(U256::from(7u64)), Token::Uint(U256::from(30u64))]);
        let log = base_log(
            vec![
                *ERC1155_SINGLE_EVENT_TOPIC,
                address_topic(0x0a), // operator
                address_topic(0x01),
                address_topic(0x02),
            ],
            data,
        );
        let receipt = TransactionReceipt {
            logs: vec![log],
            ..Default::default()
        };
        let (transfers, _) = TransferClassifier::new().classify_receipt(&receipt);
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].token_type, TokenType::Erc1155);
        assert_eq!(transfers[0].token_id, Some(BigDecimal::from(7)));
        assert_eq!(transfers[0].amount, Some(BigDecimal::from(30)));
    }

    #[test]
    fn erc1155_batch_parses_parallel_arrays() {
        let data = encode(&[
            Token::Array(vec![
                Token::Uint(U256::from(1u64)),
                Token::Uint(U256::from(2u64)),
            ]),
            Token::Array(vec![
                Token::Uint(U256::from(10u64)),
                Token::Uint(U256::from(20u64)),
            ]),
        ]);
        let log = base_log(
            vec![
                *ERC1155_BATCH_EVENT_TOPIC,
                address_topic(0x0a),
                address_topic(0x01),
                address_topic(0x02),
            ],
            data,
        );
        let receipt = TransactionReceipt {
            logs: vec![log],
            ..Default::default()
        };
        let (transfers, _) = TransferClassifier::new().classify_receipt(&receipt);
        assert_eq!(transfers.len(), 1);
        let ids = transfers[0].token_ids.as_ref().unwrap();
        let amounts = transfers[0].amounts.as_ref().unwrap();
        assert_eq!(
            ids,
            &vec![BigDecimal::from(1), BigDecimal::from(2)]
        );
        assert_eq!(
            amounts,
            &vec![BigDecimal::from(10), BigDecimal::from(20)]
        );
        assert!(transfers[0].amount.is_none());
    }

    #[test]
    fn malformed_log_is_skipped_without_aborting_batch() {
        // ERC-20 形状但 data 为空 → parse 报错，只丢这一条
        let bad = base_log(
            vec![*TRANSFER_EVENT_TOPIC, address_topic(0x01), address_topic(0x02)],
            vec![],
        );
        let good = base_log(
            vec![*TRANSFER_EVENT_TOPIC, address_topic(0x03), address_topic(0x04)],
            amount_word(9),
        );
        let receipt = TransactionReceipt {
            logs: vec![bad, good],
            ..Default::default()
        };
        let (transfers, tokens) = TransferClassifier::new().classify_receipt(&receipt);
        assert_eq!(transfers.len(), 1);
        assert_eq!(tokens.len(), 1);
        assert_eq!(
            transfers[0].amount,
            Some(BigDecimal::from_str("9").unwrap())
        );
    }

    #[test]
    fn selector_prefilter_gates_receipt_fetch() {
        let classifier = TransferClassifier::new();

        let mut calldata = SELECTOR_ERC20_TRANSFER.to_vec();
        calldata.extend_from_slice(&[0u8; 64]);
        assert!(classifier.is_transfer_like(&calldata.into()));

        // 普通合约调用 / 纯转账 input
        assert!(!classifier.is_transfer_like(&vec![0xde, 0xad, 0xbe, 0xef].into()));
        assert!(!classifier.is_transfer_like(&Bytes::default()));
    }
}

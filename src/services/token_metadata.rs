use crate::errors::error::AppError;
use crate::infrastructure::protocol::constants::{
    SELECTOR_DECIMALS, SELECTOR_NAME, SELECTOR_SYMBOL, SELECTOR_TOTAL_SUPPLY,
};
use crate::infrastructure::provider::ProviderTrait;
use crate::models::TokenDomain;
use crate::utils::format::u256_to_bigdecimal;
use crate::utils::parse_address;
use bigdecimal::BigDecimal;
use ethers_core::abi::{ParamType, Token, decode};
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Bytes, H160, TransactionRequest};
use std::sync::Arc;

/// ERC-20 元数据读取：对合约裸调 name/symbol/decimals/totalSupply。
/// 任何一个调用失败即视为非标准合约，由导入器打 skip_metadata 负缓存。
pub struct TokenMetadataService {
    provider: Arc<dyn ProviderTrait>,
}

#[derive(Debug, Clone)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: BigDecimal,
    pub total_supply: BigDecimal,
}

impl TokenMetadataService {
    pub fn new(provider: Arc<dyn ProviderTrait>) -> Self {
        Self { provider }
    }

    pub async fn fetch(&self, contract_address: &str) -> Result<TokenMetadata, AppError> {
        let contract = parse_address(contract_address)?;

        let name = self.call_string(contract, SELECTOR_NAME).await?;
        let symbol = self.call_string(contract, SELECTOR_SYMBOL).await?;
        let decimals = self.call_uint(contract, SELECTOR_DECIMALS).await?;
        let total_supply = self.call_uint(contract, SELECTOR_TOTAL_SUPPLY).await?;

        Ok(TokenMetadata {
            name,
            symbol,
            decimals,
            total_supply,
        })
    }

    /// 把抓到的元数据合并进分类器发现的裸 Token 记录
    pub fn apply(token: &TokenDomain, metadata: TokenMetadata) -> TokenDomain {
        let mut enriched = token.clone();
        enriched.name = Some(metadata.name);
        enriched.symbol = Some(metadata.symbol);
        enriched.decimals = Some(metadata.decimals);
        enriched.total_supply = Some(metadata.total_supply);
        enriched.skip_metadata = false;
        enriched
    }

    async fn eth_call(&self, contract: H160, selector: [u8; 4]) -> Result<Bytes, AppError> {
        let request = TransactionRequest::new()
            .to(contract)
            .data(selector.to_vec());
        let tx: TypedTransaction = request.into();
        self.provider.call(&tx).await.map_err(|e| {
            AppError::ProviderError(format!(
                "合约 {:#x} selector 0x{} 调用失败: {}",
                contract,
                hex::encode(selector),
                e
            ))
        })
    }

    async fn call_string(&self, contract: H160, selector: [u8; 4]) -> Result<String, AppError> {
        let raw = self.eth_call(contract, selector).await?;
        let tokens = decode(&[ParamType::String], &raw)
            .map_err(|e| AppError::ParserError(format!("string 返回值解码失败: {}", e)))?;
        match tokens.into_iter().next() {
            Some(Token::String(value)) => Ok(value),
            other => Err(AppError::ParserError(format!(
                "期望 string 返回值，实际为 {:?}",
                other
            ))),
        }
    }

    async fn call_uint(&self, contract: H160, selector: [u8; 4]) -> Result<BigDecimal, AppError> {
        let raw = self.eth_call(contract, selector).await?;
        let tokens = decode(&[ParamType::Uint(256)], &raw)
            .map_err(|e| AppError::ParserError(format!("uint 返回值解码失败: {}", e)))?;
        match tokens.into_iter().next() {
            Some(Token::Uint(value)) => Ok(u256_to_bigdecimal(value)),
            other => Err(AppError::ParserError(format!(
                "期望 uint256 返回值，实际为 {:?}",
                other
            ))),
        }
    }
}

use bigdecimal::BigDecimal;
use std::fmt;

/// 代币标准
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Erc20,
    Erc721,
    Erc1155,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Erc20 => "ERC-20",
            TokenType::Erc721 => "ERC-721",
            TokenType::Erc1155 => "ERC-1155",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 代币合约。`skip_metadata` 为负缓存标记：元数据调用失败过的
/// 非标准合约不再于后续批次重试。
#[derive(Debug, Clone)]
pub struct TokenDomain {
    pub contract_address_hash: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<BigDecimal>,
    pub total_supply: Option<BigDecimal>,
    pub token_type: TokenType,
    pub skip_metadata: bool,
}

impl TokenDomain {
    /// 分类器发现的裸合约：仅地址 + 标准，未拉元数据
    pub fn discovered(contract_address_hash: String, token_type: TokenType) -> Self {
        Self {
            contract_address_hash,
            name: None,
            symbol: None,
            decimals: None,
            total_supply: None,
            token_type,
            skip_metadata: false,
        }
    }
}

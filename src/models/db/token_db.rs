use crate::models::db::schema::eth_token;
use crate::models::domain::token::TokenDomain;
use bigdecimal::BigDecimal;
use diesel::Insertable;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = eth_token)]
pub struct TokenInsert {
    pub contract_address_hash: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<BigDecimal>,
    pub total_supply: Option<BigDecimal>,
    pub token_type: String,
    pub skip_metadata: bool,
}

impl From<TokenDomain> for TokenInsert {
    fn from(token: TokenDomain) -> Self {
        Self {
            contract_address_hash: token.contract_address_hash,
            name: token.name,
            symbol: token.symbol,
            decimals: token.decimals,
            total_supply: token.total_supply,
            token_type: token.token_type.as_str().to_string(),
            skip_metadata: token.skip_metadata,
        }
    }
}

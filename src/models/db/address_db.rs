use crate::models::db::schema::eth_address;
use crate::models::domain::address::AddressDomain;
use bigdecimal::BigDecimal;
use diesel::Insertable;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = eth_address)]
pub struct AddressInsert {
    pub address_hash: String,
    pub fetched_coin_balance: Option<BigDecimal>,
    pub fetched_coin_balance_block_number: Option<i64>,
}

impl From<AddressDomain> for AddressInsert {
    fn from(address: AddressDomain) -> Self {
        Self {
            address_hash: address.address_hash,
            fetched_coin_balance: address.fetched_coin_balance,
            fetched_coin_balance_block_number: address.fetched_coin_balance_block_number,
        }
    }
}

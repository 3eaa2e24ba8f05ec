use crate::errors::error::AppError;
use ethers_core::types::{H160, H256, U64, U256};

pub fn option_u64_to_i64(opt_u64: Option<U64>) -> Result<i64, AppError> {
    let u64_val = opt_u64
        .ok_or(AppError::InvalidNumber("value is None".to_string()))?
        .as_u64();

    // u64 转 i64（溢出检查）
    u64_val
        .try_into()
        .map_err(|e| AppError::Conversion(format!("u64({}) 转 i64 溢出: {}", u64_val, e)))
}

pub fn u256_to_i64(u256_val: U256) -> Result<i64, AppError> {
    // 1. 先收窄到 u128（高 128 位必须为 0）
    let u128_val: u128 = u256_val
        .try_into()
        .map_err(|e| AppError::Conversion(format!("U256({}) 超出u128范围: {}", u256_val, e)))?;

    // 2. 再检查是否超出 i64 正最大值（U256 无符号，只需比较上界）
    if u128_val > i64::MAX as u128 {
        return Err(AppError::Conversion(format!(
            "U256({}) 超出i64范围（最大值: {}）",
            u256_val,
            i64::MAX
        )));
    }

    Ok(u128_val as i64)
}

pub fn h256_to_string(data: H256) -> String {
    // 0x + 64 位 hex
    format!("{:#x}", data)
}

pub fn h160_to_string(data: H160) -> String {
    // 0x + 40 位 hex
    format!("{:#x}", data)
}

/// 事件 topic 的低 20 字节即地址（indexed address 参数左侧补零到 32 字节）
pub fn topic_to_address(topic: H256) -> H160 {
    H160::from(topic)
}

pub fn parse_address(address: &str) -> Result<H160, AppError> {
    address
        .parse::<H160>()
        .map_err(|_| AppError::InvalidAddress(address.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u256_within_i64_converts() {
        assert_eq!(u256_to_i64(U256::from(42u64)).unwrap(), 42);
        assert_eq!(
            u256_to_i64(U256::from(i64::MAX as u64)).unwrap(),
            i64::MAX
        );
    }

    #[test]
    fn u256_above_i64_is_rejected() {
        assert!(u256_to_i64(U256::from(i64::MAX as u64) + 1).is_err());
        assert!(u256_to_i64(U256::MAX).is_err());
    }

    #[test]
    fn topic_extracts_low_20_bytes() {
        let topic: H256 = "0x000000000000000000000000a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
            .parse()
            .unwrap();
        assert_eq!(
            h160_to_string(topic_to_address(topic)),
            "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
        );
    }
}

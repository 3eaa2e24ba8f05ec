use bigdecimal::BigDecimal;
use ethers_core::types::U256;
use std::str::FromStr;

/// 将 U256 转为 BigDecimal
/// 路径固定为 U256 → 十进制字符串 → BigDecimal，绝不经过浮点，
/// 否则接近或超过 2^53 的 wei 金额会丢精度。
pub fn u256_to_bigdecimal(value: U256) -> BigDecimal {
    let s = value.to_string();
    BigDecimal::from_str(&s).unwrap_or_else(|_| BigDecimal::from(0))
}

pub fn opt_u256_to_bigdecimal(value: Option<U256>) -> Option<BigDecimal> {
    value.map(u256_to_bigdecimal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_ether_keeps_full_precision() {
        // 0xde0b6b3a7640000 = 10^18 wei
        let wei = U256::from_str_radix("de0b6b3a7640000", 16).unwrap();
        assert_eq!(
            u256_to_bigdecimal(wei).to_string(),
            "1000000000000000000"
        );
    }

    #[test]
    fn u256_max_round_trips_as_decimal_string() {
        let max = U256::MAX;
        assert_eq!(u256_to_bigdecimal(max).to_string(), max.to_string());
    }
}

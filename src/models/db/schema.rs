pub use eth_address::table as eth_address_db;
pub use eth_block::table as eth_block_db;
pub use eth_token::table as eth_token_db;
pub use eth_token_transfer::table as eth_token_transfer_db;
pub use eth_transaction::table as eth_transaction_db;

diesel::table! {
    /// 区块表：每个区块号恰好一行规范记录
    eth_block (block_number) {
        /// 区块号（规范链上的唯一索引）
        block_number -> Int8,
        /// 区块哈希
        #[max_length = 66]
        block_hash -> Varchar,
        /// 父区块哈希
        #[max_length = 66]
        parent_hash -> Varchar,
        /// 出块者地址
        #[max_length = 42]
        miner_hash -> Varchar,
        difficulty -> Numeric,
        total_difficulty -> Nullable<Numeric>,
        gas_limit -> Numeric,
        gas_used -> Numeric,
        size -> Nullable<Int4>,
        #[max_length = 18]
        nonce -> Varchar,
        /// 区块时间戳（unix 毫秒）
        timestamp -> Int8,
        /// 恒为 true：不做分叉处理
        consensus -> Bool,
        /// true = 区块不含交易
        is_empty -> Bool,
        created_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    /// 交易表
    eth_transaction (tx_hash) {
        #[max_length = 66]
        tx_hash -> Varchar,
        block_number -> Int8,
        #[max_length = 42]
        from_address -> Varchar,
        /// 为空 = 合约创建
        #[max_length = 42]
        to_address -> Nullable<Varchar>,
        value -> Numeric,
        gas -> Numeric,
        gas_price -> Nullable<Numeric>,
        cumulative_gas_used -> Nullable<Numeric>,
        /// 区块内序号
        transaction_index -> Int4,
        nonce -> Int8,
        r -> Numeric,
        s -> Numeric,
        v -> Int8,
        /// 1=成功 0=失败 NULL=未取回执
        status -> Nullable<Int2>,
        max_fee_per_gas -> Nullable<Numeric>,
        max_priority_fee_per_gas -> Nullable<Numeric>,
        transaction_type -> Nullable<Int4>,
        created_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    /// 地址表：余额带水位，只允许水位前进时覆盖
    eth_address (address_hash) {
        #[max_length = 42]
        address_hash -> Varchar,
        fetched_coin_balance -> Nullable<Numeric>,
        fetched_coin_balance_block_number -> Nullable<Int8>,
        created_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    /// 代币合约表，按合约地址 upsert
    eth_token (contract_address_hash) {
        #[max_length = 42]
        contract_address_hash -> Varchar,
        name -> Nullable<Varchar>,
        symbol -> Nullable<Varchar>,
        decimals -> Nullable<Numeric>,
        total_supply -> Nullable<Numeric>,
        /// ERC-20 / ERC-721 / ERC-1155
        #[max_length = 16]
        token_type -> Varchar,
        /// 负缓存：元数据调用失败过的合约不再重试
        skip_metadata -> Bool,
        created_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    /// 代币转账表，(tx_hash, log_index) 唯一
    eth_token_transfer (tx_hash, log_index) {
        #[max_length = 66]
        tx_hash -> Varchar,
        log_index -> Int8,
        #[max_length = 42]
        from_address -> Varchar,
        #[max_length = 42]
        to_address -> Varchar,
        #[max_length = 42]
        token_contract_address -> Varchar,
        block_number -> Int8,
        #[max_length = 16]
        token_type -> Varchar,
        amount -> Nullable<Numeric>,
        token_id -> Nullable<Numeric>,
        /// ERC-1155 批量载荷（与 token_ids 平行）
        amounts -> Nullable<Array<Numeric>>,
        token_ids -> Nullable<Array<Numeric>>,
        created_at -> Nullable<Timestamp>,
    }
}

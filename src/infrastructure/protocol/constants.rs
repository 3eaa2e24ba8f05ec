use ethers_core::types::H256;
use lazy_static::lazy_static;

lazy_static! {
    /// Transfer(address,address,uint256) —— ERC-20 与 ERC-721 共用同一签名，
    /// 依靠 indexed topic 数量区分标准
    pub static ref TRANSFER_EVENT_TOPIC: H256 =
        "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
            .parse()
            .expect("静态 topic 常量非法");

    /// TransferSingle(address,address,address,uint256,uint256)
    pub static ref ERC1155_SINGLE_EVENT_TOPIC: H256 =
        "0xc3d58168c5ae7397731d063d5bbf3d657854427343f4c083240f7aacaa2d0f62"
            .parse()
            .expect("静态 topic 常量非法");

    /// TransferBatch(address,address,address,uint256[],uint256[])
    pub static ref ERC1155_BATCH_EVENT_TOPIC: H256 =
        "0x4a39dc06d4c0dbc64b70af90fd698a233a518aa5d07e595d983b8c0526c8f7fb"
            .parse()
            .expect("静态 topic 常量非法");
}

// ---- 调用数据 4 字节 selector（回执预筛用） ----

/// transfer(address,uint256)
pub const SELECTOR_ERC20_TRANSFER: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];
/// transferFrom(address,address,uint256) —— ERC-20 与 ERC-721 共用
pub const SELECTOR_TRANSFER_FROM: [u8; 4] = [0x23, 0xb8, 0x72, 0xdd];
/// safeTransferFrom(address,address,uint256)
pub const SELECTOR_ERC721_SAFE_TRANSFER: [u8; 4] = [0x42, 0x84, 0x2e, 0x0e];
/// safeTransferFrom(address,address,uint256,bytes)
pub const SELECTOR_ERC721_SAFE_TRANSFER_DATA: [u8; 4] = [0xb8, 0x8d, 0x4f, 0xde];
/// safeTransferFrom(address,address,uint256,uint256,bytes)
pub const SELECTOR_ERC1155_SAFE_TRANSFER: [u8; 4] = [0xf2, 0x42, 0x43, 0x2a];
/// safeBatchTransferFrom(address,address,uint256[],uint256[],bytes)
pub const SELECTOR_ERC1155_SAFE_BATCH_TRANSFER: [u8; 4] = [0x2e, 0xb2, 0xc2, 0xd6];

// ---- ERC-20 元数据方法 selector ----

/// name()
pub const SELECTOR_NAME: [u8; 4] = [0x06, 0xfd, 0xde, 0x03];
/// symbol()
pub const SELECTOR_SYMBOL: [u8; 4] = [0x95, 0xd8, 0x9b, 0x41];
/// decimals()
pub const SELECTOR_DECIMALS: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];
/// totalSupply()
pub const SELECTOR_TOTAL_SUPPLY: [u8; 4] = [0x18, 0x16, 0x0d, 0xdd];

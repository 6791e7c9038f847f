/// Application name
pub const APP_NAME: &str = "da0";

/// Target network chain id as reported by `eth_chainId` (Base Mainnet, 8453)
pub const TARGET_CHAIN_ID_HEX: &str = "0x2105";
pub const TARGET_CHAIN_ID: u64 = 8453;

/// Parameters sent with `wallet_addEthereumChain`
pub const TARGET_CHAIN_NAME: &str = "Base Mainnet";
pub const TARGET_RPC_URL: &str = "https://mainnet.base.org";
pub const TARGET_EXPLORER_URL: &str = "https://basescan.org";
pub const NATIVE_CURRENCY_NAME: &str = "Ether";
pub const NATIVE_CURRENCY_SYMBOL: &str = "ETH";
pub const NATIVE_CURRENCY_DECIMALS: u8 = 18;

/// Message every wallet must sign before a session is authenticated
pub const AUTH_MESSAGE: &str = "Welcome to da0! Please sign this message to verify your identity and enter the DAO. This signature is free and does not cost any gas.";

/// Quorum (percent) assigned to newly created proposals
pub const DEFAULT_QUORUM: u32 = 10;

/// Voting period of a newly created proposal, in days
pub const VOTING_PERIOD_DAYS: i64 = 7;

/// Number of proposals shown on the home page
pub const RECENT_PROPOSALS_LIMIT: usize = 5;

/// Choices the proposal detail view tallies votes against
pub const DETAIL_CHOICES: [&str; 2] = ["Yes", "No"];

/// Minimum number of choices on a proposal draft
pub const MIN_CHOICES: usize = 2;

/// SQLSTATE reported by the backend on a unique constraint violation
pub const UNIQUE_VIOLATION_CODE: &str = "23505";

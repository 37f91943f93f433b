use anchor_lang::prelude::*;

/// Event emitted when the aggregator is created
#[event]
pub struct AggregatorInitialized {
    pub admin: Pubkey,
    pub distributor: Pubkey,
    pub fallback_recipient: Pubkey,
    pub reward_mint: Pubkey,
    pub dev_fee_bps: u16,
    pub stake_fee_bps: u16,
    pub charity_fee_bps: u16,
    pub timestamp: i64,
}

/// Event emitted when a lender token is added to the registry
#[event]
pub struct LenderTokenRegistered {
    pub lender_mint: Pubkey,
    pub underlying_mint: Pubkey,
    pub connector_program: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct LenderTokenSupportUpdated {
    pub lender_mint: Pubkey,
    pub is_supported: bool,
}

#[event]
pub struct CharityRecognitionUpdated {
    pub charity: Pubkey,
    pub is_recognized: bool,
}

#[event]
pub struct FeeSplitUpdated {
    pub dev_fee_bps: u16,
    pub stake_fee_bps: u16,
    pub charity_fee_bps: u16,
}

/// Event emitted for every deposit recorded in the ledger
#[event]
pub struct Deposited {
    pub lender_mint: Pubkey,
    pub charity: Pubkey,
    pub contributor: Pubkey,
    pub amount: u64,
    /// Contributor balance after the deposit
    pub contributor_balance: u64,
    /// Charity balance after the deposit
    pub charity_balance: u64,
    /// Token principal after the deposit
    pub total_deposited: u64,
}

/// Event emitted for every withdrawal recorded in the ledger
#[event]
pub struct Withdrawn {
    pub lender_mint: Pubkey,
    pub charity: Pubkey,
    pub contributor: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
    pub contributor_balance: u64,
    pub charity_balance: u64,
    pub total_deposited: u64,
}

/// Event emitted when accrued yield is realised and split
#[event]
pub struct InterestRedeemed {
    pub lender_mint: Pubkey,
    /// Yield above recorded principal
    pub delta: u64,
    pub dev_fee: u64,
    pub stake_fee: u64,
    pub charity_share: u64,
    /// False when the charity share was held as unattributed
    pub attributed: bool,
    pub reward_per_unit: u128,
    pub timestamp: i64,
}

/// Event emitted when the connector reports less than recorded principal
#[event]
pub struct NegativeYieldObserved {
    pub lender_mint: Pubkey,
    pub balance_of_underlying: u64,
    pub total_deposited: u64,
    pub timestamp: i64,
}

#[event]
pub struct InterestClaimed {
    pub lender_mint: Pubkey,
    pub charity: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
    /// Interest the charity can still claim
    pub remaining: u64,
}

#[event]
pub struct UnattributedInterestSwept {
    pub lender_mint: Pubkey,
    pub amount: u64,
}

/// Event emitted when iHelp is pushed into the emission accumulator
#[event]
pub struct RewardDistributed {
    pub amount: u64,
    pub total_weight: u64,
    pub reward_per_weight: u128,
    /// True when nobody held weight and the fallback recipient got it all
    pub to_fallback: bool,
    pub timestamp: i64,
}

#[event]
pub struct RewardClaimed {
    pub contributor: Pubkey,
    pub amount: u64,
    pub remaining: u64,
}

#[event]
pub struct LegacyLedgerStaged {
    pub charity: Pubkey,
    pub lender_mint: Pubkey,
    pub total_interest_earned: u64,
    pub claimed_interest: u64,
}

/// Event emitted for each page of a legacy migration
#[event]
pub struct CharityMigrated {
    pub charity: Pubkey,
    pub lender_mint: Pubkey,
    /// First entry of the page
    pub start_index: u32,
    /// Entries imported so far
    pub migrated_count: u32,
    /// Principal imported by this page
    pub principal: u64,
    /// Legacy unclaimed interest credited to the charity (first page only)
    pub interest_credited: u64,
    pub complete: bool,
}

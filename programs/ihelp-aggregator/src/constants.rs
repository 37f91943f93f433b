// =============================================================================
// iHelp Aggregator Constants
// =============================================================================
// Seeds, precision and limits shared by every instruction. Runtime settings
// (fee split, authorities, pause flag) live in the Aggregator account instead.
// =============================================================================

// =============================================================================
// PDA SEEDS
// =============================================================================

/// Global aggregator config and emission accumulator
/// Full seed: ["aggregator"]
pub const AGGREGATOR_SEED: &[u8] = b"aggregator";

/// Token account holding undistributed/unclaimed iHelp rewards
/// Full seed: ["reward_vault", aggregator_pubkey]
pub const REWARD_VAULT_SEED: &[u8] = b"reward_vault";

/// Registry entry and interest accumulator for one lender token
/// Full seed: ["lender_token", lender_mint_pubkey]
pub const LENDER_TOKEN_SEED: &[u8] = b"lender_token";

/// Staging/custody account for a lender token's underlying asset
/// Full seed: ["underlying_vault", lender_token_pubkey]
pub const UNDERLYING_VAULT_SEED: &[u8] = b"underlying_vault";

/// Host registry entry for a charity
/// Full seed: ["charity", charity_pubkey]
pub const CHARITY_SEED: &[u8] = b"charity";

/// Charity balance and interest checkpoint for one lender token
/// Full seed: ["charity_position", charity_pubkey, lender_mint_pubkey]
pub const CHARITY_POSITION_SEED: &[u8] = b"charity_position";

/// Contributor balance and interest checkpoint for one lender token
/// Full seed: ["contributor_position", contributor_pubkey, lender_mint_pubkey]
pub const CONTRIBUTOR_POSITION_SEED: &[u8] = b"contributor_position";

/// Contributor emission checkpoint (one per contributor across all tokens)
/// Full seed: ["contributor_rewards", contributor_pubkey]
pub const CONTRIBUTOR_REWARDS_SEED: &[u8] = b"contributor_rewards";

/// Legacy per-charity ledger snapshot consumed by migrate
/// Full seed: ["legacy_ledger", charity_pubkey, lender_mint_pubkey]
pub const LEGACY_LEDGER_SEED: &[u8] = b"legacy_ledger";

// =============================================================================
// ACCUMULATOR PRECISION
// =============================================================================

/// Fixed-point scale for reward_per_unit and reward_per_weight (18 decimals).
/// amount (u64) * REWARD_PRECISION always fits in u128.
pub const REWARD_PRECISION: u128 = 1_000_000_000_000_000_000;

// =============================================================================
// FEE SPLIT (in basis points - 1 BPS = 0.01%)
// =============================================================================

/// Total basis points (100%)
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Developer share of redeemed interest
pub const DEFAULT_DEV_FEE_BPS: u16 = 1_000;

/// Stakeholder share of redeemed interest
pub const DEFAULT_STAKE_FEE_BPS: u16 = 1_000;

/// Charity share of redeemed interest
pub const DEFAULT_CHARITY_FEE_BPS: u16 = 8_000;

/// Charities always keep at least half of the interest their deposits earn
pub const MIN_CHARITY_FEE_BPS: u16 = 5_000;

// =============================================================================
// MIGRATION LIMITS
// =============================================================================

/// Maximum contributors a single legacy ledger can hold
pub const MAX_LEGACY_ENTRIES: usize = 96;

/// Maximum legacy entries processed by one migrate call.
/// Each entry needs two remaining accounts, which bounds transaction size.
pub const MAX_MIGRATION_BATCH: u32 = 6;

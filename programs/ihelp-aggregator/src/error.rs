// =============================================================================
// iHelp Aggregator Error Codes
// =============================================================================
// Every failure aborts the whole instruction; nothing is applied partially.
// Anchor numbers these from 6000 in declaration order.
// =============================================================================

use anchor_lang::prelude::*;

#[error_code]
pub enum AggregatorError {
    // =========================================================================
    // Aggregator State Errors (6000-6009)
    // =========================================================================

    /// Admin has paused the aggregator
    #[msg("Aggregator is paused")]
    AggregatorPaused,

    // =========================================================================
    // Amount & Balance Errors (6010-6019)
    // =========================================================================

    /// Deposit, withdrawal, claim or distribution of zero tokens
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    /// Withdrawal exceeds the contributor's (or charity's) recorded balance
    #[msg("Withdrawal exceeds recorded balance")]
    InsufficientFunds,

    /// Claim exceeds the interest or reward accrued so far
    #[msg("Claim exceeds claimable amount")]
    InsufficientClaimable,

    /// The connector reported less underlying than the ledger has deposited
    #[msg("Lender balance is below total deposits")]
    NegativeYieldObserved,

    /// Sweep requested with no unattributed interest held
    #[msg("No unattributed interest to sweep")]
    NothingToSweep,

    // =========================================================================
    // Registry Errors (6020-6029)
    // =========================================================================

    /// Lender token is not (or no longer) a supported donation currency
    #[msg("Lender token is not supported")]
    UnsupportedToken,

    /// Charity is not recognized by the host registry
    #[msg("Charity is not recognized")]
    NotAuthorizedCharity,

    // =========================================================================
    // Fee Configuration Errors (6030-6039)
    // =========================================================================

    /// dev + stake + charity must be exactly 10000 BPS
    #[msg("Invalid fee split - shares must sum to 100%")]
    InvalidFeeSplit,

    /// Charity share below MIN_CHARITY_FEE_BPS
    #[msg("Charity share is below the minimum")]
    CharityShareTooLow,

    // =========================================================================
    // Authorization Errors (6040-6049)
    // =========================================================================

    #[msg("Unauthorized - signer does not have permission")]
    Unauthorized,

    #[msg("Invalid authority")]
    InvalidAuthority,

    // =========================================================================
    // Math Errors (6050-6059)
    // =========================================================================

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Math underflow")]
    MathUnderflow,

    #[msg("Division by zero")]
    DivisionByZero,

    // =========================================================================
    // Account Validation Errors (6060-6069)
    // =========================================================================

    #[msg("Invalid underlying mint")]
    InvalidUnderlyingMint,

    #[msg("Invalid reward mint")]
    InvalidRewardMint,

    #[msg("Invalid token account owner")]
    InvalidTokenAccountOwner,

    #[msg("Invalid PDA")]
    InvalidPDA,

    // =========================================================================
    // Connector Errors (6070-6079)
    // =========================================================================

    /// Connector program or reserve does not match the registry entry
    #[msg("Invalid lender connector")]
    InvalidConnector,

    /// Position account is not owned by the connector or not held by the token PDA
    #[msg("Invalid connector position")]
    InvalidConnectorPosition,

    #[msg("Lender connector call failed")]
    ConnectorCallFailed,

    // =========================================================================
    // Migration Errors (6080-6089)
    // =========================================================================

    #[msg("Legacy ledger is full")]
    LegacyLedgerFull,

    #[msg("Contributor already present in legacy ledger")]
    DuplicateLegacyContributor,

    /// Entries can no longer change once migration has started
    #[msg("Legacy ledger is sealed")]
    LegacyLedgerSealed,

    /// Legacy claimed interest exceeds legacy earned interest
    #[msg("Invalid legacy interest totals")]
    InvalidLegacyInterest,

    /// start_index must equal the ledger's migrated_count
    #[msg("Migration cursor mismatch")]
    InvalidMigrationCursor,

    #[msg("Invalid migration batch size")]
    InvalidMigrationBatch,

    /// Remaining accounts do not match the legacy entries of this page
    #[msg("Migration account mismatch")]
    MigrationAccountMismatch,
}

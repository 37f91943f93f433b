// =============================================================================
// Instructions Module
// =============================================================================
// Every instruction of the iHelp aggregator. Handlers validate accounts,
// move SPL tokens and log; ledger math lives in crate::logic.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::LENDER_TOKEN_SEED;
use crate::state::LenderToken;

// Setup and administration
pub mod admin;
pub mod initialize;
pub mod register_lender_token;
pub mod set_charity_recognition;
pub mod stage_legacy_ledger;

// Ledger operations
pub mod claim_interest;
pub mod deposit;
pub mod migrate;
pub mod open_contributor_accounts;
pub mod redeem_interest;
pub mod withdraw;

// iHelp rewards
pub mod claim_ihelp_reward;
pub mod distribute_ihelp;

// Read-only queries
pub mod views;

// Re-export everything from each module
// The #[derive(Accounts)] macro generates helper types that need to be at crate root
pub use admin::*;
pub use claim_ihelp_reward::*;
pub use claim_interest::*;
pub use deposit::*;
pub use distribute_ihelp::*;
pub use initialize::*;
pub use migrate::*;
pub use open_contributor_accounts::*;
pub use redeem_interest::*;
pub use register_lender_token::*;
pub use set_charity_recognition::*;
pub use stage_legacy_ledger::*;
pub use views::*;
pub use withdraw::*;

/// Pay `amount` out of a lender token's underlying vault, signed by the
/// LenderToken PDA
pub(crate) fn pay_from_underlying_vault<'info>(
    token_program: &Program<'info, Token>,
    underlying_vault: &Account<'info, TokenAccount>,
    destination: &Account<'info, TokenAccount>,
    lender_token: &Account<'info, LenderToken>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let lender_mint = lender_token.lender_mint;
    let bump = [lender_token.bump];
    let seeds: &[&[u8]] = &[LENDER_TOKEN_SEED, lender_mint.as_ref(), &bump];

    token::transfer(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            Transfer {
                from: underlying_vault.to_account_info(),
                to: destination.to_account_info(),
                authority: lender_token.to_account_info(),
            },
            &[seeds],
        ),
        amount,
    )
}

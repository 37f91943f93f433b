use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::invoke_signed;
use anchor_spl::token::{Token, TokenAccount};

use crate::connector::{ConnectorInstruction, ConnectorPosition, LenderConnector};
use crate::constants::LENDER_TOKEN_SEED;
use crate::error::AggregatorError;
use crate::state::LenderToken;

/// LenderConnector backed by a CPI into the token's adapter program.
///
/// The LenderToken PDA is the holder and signs every call.
pub struct CpiConnector<'info> {
    pub connector_program: AccountInfo<'info>,
    pub connector_position: AccountInfo<'info>,
    pub connector_reserve: AccountInfo<'info>,
    pub lender_token: AccountInfo<'info>,
    pub underlying_vault: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    pub lender_mint: Pubkey,
    pub underlying_mint: Pubkey,
    pub bump: u8,
}

impl<'info> CpiConnector<'info> {
    /// Connector the lender token's registry entry points at.
    /// Rejects adapter accounts that do not match the registry.
    pub fn for_lender_token(
        lender_token: &Account<'info, LenderToken>,
        underlying_vault: &Account<'info, TokenAccount>,
        connector_program: &AccountInfo<'info>,
        connector_position: &AccountInfo<'info>,
        connector_reserve: &AccountInfo<'info>,
        token_program: &Program<'info, Token>,
    ) -> Result<Self> {
        require_keys_eq!(
            connector_program.key(),
            lender_token.connector_program,
            AggregatorError::InvalidConnector
        );
        require!(connector_program.executable, AggregatorError::InvalidConnector);
        require_keys_eq!(
            connector_position.key(),
            lender_token.connector_position,
            AggregatorError::InvalidConnectorPosition
        );
        require_keys_eq!(
            connector_reserve.key(),
            lender_token.connector_reserve,
            AggregatorError::InvalidConnector
        );
        require_keys_eq!(
            underlying_vault.key(),
            lender_token.underlying_vault,
            AggregatorError::InvalidPDA
        );

        Ok(Self {
            connector_program: connector_program.clone(),
            connector_position: connector_position.clone(),
            connector_reserve: connector_reserve.clone(),
            lender_token: lender_token.to_account_info(),
            underlying_vault: underlying_vault.to_account_info(),
            token_program: token_program.to_account_info(),
            lender_mint: lender_token.lender_mint,
            underlying_mint: lender_token.underlying_mint,
            bump: lender_token.bump,
        })
    }

    fn invoke(&self, ix: ConnectorInstruction) -> Result<()> {
        let mut data = Vec::with_capacity(9);
        ix.serialize(&mut data)
            .map_err(|_| AggregatorError::ConnectorCallFailed)?;

        let instruction = Instruction {
            program_id: self.connector_program.key(),
            accounts: vec![
                AccountMeta::new_readonly(self.lender_token.key(), true),
                AccountMeta::new(self.underlying_vault.key(), false),
                AccountMeta::new(self.connector_position.key(), false),
                AccountMeta::new(self.connector_reserve.key(), false),
                AccountMeta::new_readonly(self.token_program.key(), false),
            ],
            data,
        };

        let bump = [self.bump];
        let seeds: &[&[u8]] = &[LENDER_TOKEN_SEED, self.lender_mint.as_ref(), &bump];

        invoke_signed(
            &instruction,
            &[
                self.lender_token.clone(),
                self.underlying_vault.clone(),
                self.connector_position.clone(),
                self.connector_reserve.clone(),
                self.token_program.clone(),
                self.connector_program.clone(),
            ],
            &[seeds],
        )
        .map_err(|err| {
            msg!("Connector {} call failed: {:?}", self.connector_program.key(), err);
            error!(AggregatorError::ConnectorCallFailed)
        })
    }
}

impl<'info> LenderConnector for CpiConnector<'info> {
    fn balance_of_underlying(&self) -> Result<u64> {
        require_keys_eq!(
            *self.connector_position.owner,
            self.connector_program.key(),
            AggregatorError::InvalidConnectorPosition
        );

        let data = self.connector_position.try_borrow_data()?;
        let position = ConnectorPosition::try_from_slice_checked(&data)?;

        require_keys_eq!(
            position.holder,
            self.lender_token.key(),
            AggregatorError::InvalidConnectorPosition
        );
        require_keys_eq!(
            position.underlying_mint,
            self.underlying_mint,
            AggregatorError::InvalidConnectorPosition
        );

        Ok(position.underlying_balance)
    }

    fn supply(&self, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        self.invoke(ConnectorInstruction::Supply { amount })
    }

    fn redeem_underlying(&self, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        self.invoke(ConnectorInstruction::RedeemUnderlying { amount })
    }
}

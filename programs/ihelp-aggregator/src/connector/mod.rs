// =============================================================================
// Lender Connector
// =============================================================================
// The ledger never talks to a lending protocol directly. Each protocol is
// served by an adapter program implementing a small ABI:
//
// - instruction data: Borsh-encoded ConnectorInstruction
// - accounts: [holder (signer), holder_vault (w), position (w), reserve (w), token_program]
// - ConnectorPosition: adapter-owned account, 8-byte discriminator then
//   (holder, underlying_mint, underlying_balance)
//
// The adapter program for a lender token is picked by its registry entry
// (LenderToken::connector_program), never by branching inside the ledger.
// =============================================================================

use anchor_lang::prelude::*;

pub mod cpi;

pub use cpi::*;

/// Discriminator prefix of every ConnectorPosition account
pub const CONNECTOR_POSITION_DISCRIMINATOR: [u8; 8] = *b"lndrposn";

/// Capability interface over one lending market for one holder
pub trait LenderConnector {
    /// Underlying the holder could redeem right now (principal + yield)
    fn balance_of_underlying(&self) -> Result<u64>;

    /// Move `amount` underlying from the holder's vault into the market
    fn supply(&self, amount: u64) -> Result<()>;

    /// Pull `amount` underlying out of the market into the holder's vault
    fn redeem_underlying(&self, amount: u64) -> Result<()>;
}

/// Instructions every adapter program accepts
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectorInstruction {
    Supply { amount: u64 },
    RedeemUnderlying { amount: u64 },
}

/// Adapter-side record of a holder's supplied position
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectorPosition {
    pub holder: Pubkey,
    pub underlying_mint: Pubkey,
    pub underlying_balance: u64,
}

impl ConnectorPosition {
    /// Decode raw account data (discriminator included)
    pub fn try_from_slice_checked(data: &[u8]) -> Result<Self> {
        require!(
            data.len() >= 8 && data[..8] == CONNECTOR_POSITION_DISCRIMINATOR,
            crate::error::AggregatorError::InvalidConnectorPosition
        );
        let mut body = &data[8..];
        ConnectorPosition::deserialize(&mut body)
            .map_err(|_| error!(crate::error::AggregatorError::InvalidConnectorPosition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_decoding() {
        let position = ConnectorPosition {
            holder: Pubkey::new_unique(),
            underlying_mint: Pubkey::new_unique(),
            underlying_balance: 1_234,
        };
        let mut data = CONNECTOR_POSITION_DISCRIMINATOR.to_vec();
        position.serialize(&mut data).unwrap();
        // Adapters may append protocol-specific fields
        data.extend_from_slice(&[0u8; 16]);

        assert_eq!(ConnectorPosition::try_from_slice_checked(&data).unwrap(), position);
    }

    #[test]
    fn test_position_with_wrong_discriminator() {
        let data = vec![0u8; 80];
        assert!(ConnectorPosition::try_from_slice_checked(&data).is_err());
    }
}

//! Ledger logic
//!
//! State transitions shared by the instruction handlers. Nothing here moves
//! SPL tokens; lending markets are reached only through a LenderConnector.

pub mod interest;
pub mod ledger;
pub mod migration;
pub mod rewards;

pub use interest::*;
pub use ledger::*;
pub use migration::*;
pub use rewards::*;

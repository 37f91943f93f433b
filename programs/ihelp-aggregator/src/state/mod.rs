// =============================================================================
// State Module
// =============================================================================
// Account structures owned by the aggregator program. Balances and
// checkpoints are only ever written through the methods defined here.
// =============================================================================

pub mod aggregator;
pub mod charity;
pub mod checkpoint;
pub mod contributor;
pub mod legacy;
pub mod lender_token;

pub use aggregator::*;
pub use charity::*;
pub use checkpoint::*;
pub use contributor::*;
pub use legacy::*;
pub use lender_token::*;

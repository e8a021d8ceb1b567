pub mod action;
pub mod auction;
pub mod bid;
pub mod primitives;
pub mod proposal;
pub mod wallet;

pub use action::*;
pub use auction::*;
pub use bid::*;
pub use primitives::*;
pub use proposal::*;
pub use wallet::*;

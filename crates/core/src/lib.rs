pub mod aggregate;
pub mod blocks;
pub mod chain;
pub mod error;
pub mod indexer;
pub mod probe;
pub mod settings;
pub mod submitter;
pub mod types;
pub mod validation;
pub mod wallet;

pub use aggregate::{Loadable, auction::*, countdown::Countdown, names::*, proposals::*};
pub use blocks::*;
pub use chain::*;
pub use error::*;
pub use indexer::*;
pub use probe::*;
pub use settings::*;
pub use submitter::*;
pub use types::*;
pub use validation::*;
pub use wallet::*;

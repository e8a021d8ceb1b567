pub mod auction_house;
pub mod governor;
pub mod token;

pub use auction_house::INounsAuctionHouse;
pub use governor::{INounsDAOLogic, Receipt};
pub use token::INounsToken;

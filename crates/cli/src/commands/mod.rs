pub mod auction;
pub mod bid;
pub mod dashboard;
pub mod proposals;
pub mod propose;
pub mod settings;
pub mod vote;
pub mod wallet;

pub mod client;
pub mod merge;
pub mod ycharts;

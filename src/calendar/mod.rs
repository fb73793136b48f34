pub mod aggregate;
pub mod client;
pub mod extract;
pub mod session;
pub mod whispers;

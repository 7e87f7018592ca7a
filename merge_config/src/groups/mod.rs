pub mod assets;
pub mod client;
pub mod log;

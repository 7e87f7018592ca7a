pub mod configurations;
pub mod errors;
mod loader;
pub mod logging;
pub mod remote_client_interface;

pub use loader::{MergedFile, PartLoader};

mod provider;
mod record;
mod server;
mod signing;

pub use provider::*;
pub use record::*;
pub use server::*;
pub use signing::*;

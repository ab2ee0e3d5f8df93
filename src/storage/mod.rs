pub mod local;
pub mod provider;
pub mod signer;

pub use local::*;
pub use provider::*;
pub use signer::*;

pub mod factory;
pub mod verifier;

pub use factory::build_session_verifier;
pub use verifier::{SessionVerifier, VerifiedSession};

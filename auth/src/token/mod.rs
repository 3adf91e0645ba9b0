pub mod claims;
pub mod codec;
pub mod errors;
pub mod verifier;

pub use claims::Claims;
pub use claims::Principal;
pub use codec::DecodedToken;
pub use codec::IssuedToken;
pub use codec::TokenCodec;
pub use codec::TokenHeader;
pub use errors::TokenError;
pub use verifier::TokenVerifier;

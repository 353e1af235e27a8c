pub mod access_jwt;

pub use access_jwt::{Claims, JwtVerifier, TokenVerifier, VerificationOptions, VerifyError};

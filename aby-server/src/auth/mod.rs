//! Admin authentication: two-step login (password, then emailed OTP),
//! cookie-carried JWT sessions with lock / logout, and auth rate limiting.

pub mod cookie;
pub mod extractor;
pub mod jwt;
pub mod otp;
pub mod rate_limit;
pub mod session;

pub use extractor::{CurrentAdmin, SessionAdmin, SuperAdmin};
pub use jwt::{Claims, JwtError, JwtService};
pub use rate_limit::RateLimiter;

//! Dual-plane authentication and authorization

pub mod access;
pub mod session;

pub use access::{
    check_space_accessibility, AccessGate, Accessibility, DeniedReason, ScopedHandle,
    StaffIdentity,
};
pub use session::{SessionClaims, SessionSigner};

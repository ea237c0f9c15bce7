//! # filetrack-auth
//!
//! Identifies the caller and decides what they may do.
//!
//! ## Modules
//!
//! - `jwt`: bearer token issuing and validation
//! - `principal`: the authenticated caller
//! - `policy`: the department/role-scoped authorization policy

pub mod jwt;
pub mod policy;
pub mod principal;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use policy::{Action, DenyReason, PolicyDecision, authorize, can_transition};
pub use principal::Principal;

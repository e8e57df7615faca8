//! Value Object Module

pub mod account_status;
pub mod email;
pub mod person_name;
pub mod public_id;
pub mod staff_role;

pub use kernel::id::AccountId;

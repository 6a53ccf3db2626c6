//! Utility types and helpers used throughout `gdbbridge68k`.
//!
//! These are bits of functionality that don't rely on any protocol specific
//! infrastructure.

pub(crate) mod managed_vec;
pub mod range;

//! Trait definitions for extensible components
//!
//! These traits allow users to swap implementations or provide their own
//! for caching and session storage.

pub mod cache;
pub mod session;

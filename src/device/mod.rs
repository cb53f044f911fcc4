//! Device abstraction layer for the Wraith Prism.
//!
//! Provides the transport contract and the high-level device session.

pub mod prism;
pub mod transport;

pub use prism::{Component, ComponentKind, ComponentUpdate, MirageState, WraithPrism};
pub use transport::{HidTransport, Transport};

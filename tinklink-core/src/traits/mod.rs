//! Hardware abstraction traits
//!
//! These traits define the interface between the control logic
//! and the transport implementations.

pub mod link;

pub use link::SerialLink;

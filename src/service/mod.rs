//! HTTP handlers for the two cooperating services.
//!
//! [`orchestrator`] is the downstream service that performs the actual
//! lookups; [`forwarder`] is the entry service that validates and relays.

pub mod forwarder;
pub mod orchestrator;

pub use forwarder::ForwarderState;
pub use orchestrator::OrchestratorState;

//! Activity session engine.
//!
//! Turns a start/pause/resume/stop interaction sequence plus a stream of
//! position deltas into a finalized session record.

pub mod clock;
pub mod sampler;
pub mod session;
pub mod types;

pub use clock::TickClock;
pub use sampler::{BufferedSampler, LocationSampler, SamplerBuffer, SamplerError, SimulatedSampler};
pub use session::SessionEngine;
pub use types::{
    Session, SessionError, SessionOutcome, SessionRecord, SessionSnapshot, SessionState,
};

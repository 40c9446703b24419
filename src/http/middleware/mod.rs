//! Request pipeline stages.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → recovery.rs   (panic guard, outermost)
//!     → instrument.rs (root span + request counter, closest to the handler)
//!     → route handler
//!     → response (untouched by either stage on the success path)
//! ```
//!
//! The stage list is built once per route at startup (`http::server`);
//! ordering is explicit, not an artifact of call-site nesting.

pub mod instrument;
pub mod recovery;

pub use instrument::{instrument_request, RequestContext, RouteLabel};
pub use recovery::recover_panics;

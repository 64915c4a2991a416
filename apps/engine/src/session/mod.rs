//! Session layer: one serializer task per game, plus the directory that
//! tracks them.

pub mod registry;
pub mod runtime;
pub mod signals;

#[cfg(test)]
mod tests_session;

pub use registry::SessionRegistry;
pub use runtime::{AppliedAction, SessionError, SessionHandle, SessionOptions};
pub use signals::SessionSignal;

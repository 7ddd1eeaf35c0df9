//! Session lifecycle state machine
//!
//! Drives a session from `Active` through `Summarizing` to `Terminated`.
//! The transition function is pure with respect to I/O: it mutates the
//! registry and returns the effects the gateway must carry out, in order.

mod machine;

pub use machine::{handle, Effect, LifecycleEvent};

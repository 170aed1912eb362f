//! Testing utilities for roomkit
//!
//! Provides an in-memory [`MediaOutput`](crate::sink::MediaOutput) so sink
//! lifecycle code can be exercised without a browser.

pub mod fake_output;

pub use fake_output::FakeMediaOutput;

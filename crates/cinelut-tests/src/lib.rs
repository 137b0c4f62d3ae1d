//! Integration tests for cinelut crates.
//!
//! End-to-end checks that the serializers, the preview path and the session
//! all agree on one transform.

#[cfg(test)]
mod scenarios;

//! # Gateway Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Cross-subsystem choreography
//!     ├── commitment_flow.rs     # stage -> confirm -> persist -> reload -> prove
//!     └── light_client_flow.rs   # verify -> update -> misbehaviour -> freeze -> commit
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p gw-tests
//!
//! # By category
//! cargo test -p gw-tests integration::
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;

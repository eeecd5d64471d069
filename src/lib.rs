// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # ToadLester Reconcile
//!
//! Declarative reconciliation and drift detection for `ToadLester`
//! sequence generators.
//!
//! ## Overview
//!
//! `ToadLester` exposes looping number generators (`INT`, `FLOAT`, `EXP`,
//! `RAND`) over a tiny HTTP API with no notion of resources. This crate lets
//! a declarative host treat each generator variable as a resource:
//!
//! - Create, update and delete all reseed the generator and check that the
//!   service echoed the request
//! - Read fetches the current snapshot and surfaces the observed value, so
//!   the host can see drift
//! - Every successful operation issues an identity tag `<name>_<timestamp>`
//!
//! ## Modules
//!
//! - [`config`]: Client configuration, manifests, and validation
//! - [`toadlester`]: HTTP client and value types
//! - [`reconciler`]: Lifecycle operations and drift detection
//! - [`identity`]: Identity tags
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```no_run
//! use toadlester_reconcile::{ClientConfig, Reconciler, Setting, ToadlesterClient};
//!
//! # async fn run() -> toadlester_reconcile::Result<()> {
//! let client = ToadlesterClient::new(&ClientConfig::new("http://localhost:8899"))?;
//! let reconciler = Reconciler::new(client);
//!
//! let desired = Setting::new("INT_SIZE", "100", "up");
//! reconciler.create(&desired).await?;
//!
//! let observed = reconciler.read(&desired).await?;
//! if observed.setting.value != desired.value {
//!     reconciler.update(&desired).await?;
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod reconciler;
pub mod toadlester;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ClientConfig, Manifest, ManifestParser, SettingValidator};
pub use error::{ErrorKind, Result, ToadlesterError};
pub use identity::{IdentityStrategy, ResourceIdentity};
pub use reconciler::{
    AggregateRead, DriftReport, DriftStatus, Lifecycle, Reconciled, ReconciliationResult,
    Reconciler,
};
pub use toadlester::{HealthStatus, RemoteConfigSnapshot, SeriesApi, Setting, ToadlesterClient};

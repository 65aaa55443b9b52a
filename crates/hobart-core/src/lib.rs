#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hobartlabs/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod error;
pub mod fact;
pub mod period;
pub mod resolve;
pub mod schema;
pub mod store;
pub mod verify;

pub use builder::{Statement, StatementBuilder};
pub use error::{CoreError, Result};
pub use fact::{Fact, FiscalPeriod, FormType, Period};
pub use resolve::{ResolvedFact, ResolvedValue, TagResolver};
pub use schema::{LineItemSpec, StatementGroup, ValueKind, SCHEMA};
pub use store::FactStore;
pub use verify::{
    LineCheck, LineStatus, Tolerance, VerificationResult, VerificationStatus, Verifier,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Checkout coordinator for mvc.
//!
//! Restores the files of a chosen commit into the working tree. Missing files
//! are written straight away, identical files are left alone, and a file whose
//! content differs is only overwritten after the caller confirms it. Files
//! that are not part of the target commit are never touched.
//!
//! The working tree and the confirmation prompt are collaborators behind the
//! [`WorkingFiles`] and [`ConfirmOverwrite`] traits, so the coordinator runs
//! the same way against a real directory and against in-memory fakes.

pub mod coordinator;
pub mod error;
pub mod working;

pub use coordinator::{CheckoutCoordinator, CheckoutReport, FileOutcome, PreviewStyle};
pub use error::{CheckoutError, CheckoutResult};
pub use working::{ConfirmOverwrite, WorkingFiles};

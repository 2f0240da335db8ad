//! Domain logic for the invitation order form.
//!
//! Everything here is pure and synchronous: the data model for a single
//! order, the palette codec, deadline windows and the booking rule, the
//! price calculation, the wizard step controller, the review summary and
//! the PDF/relay payloads built from it. The API crate owns all I/O.

pub mod deadline;
pub mod document;
pub mod error;
pub mod intro;
pub mod order;
pub mod palette;
pub mod pricing;
pub mod review;
pub mod submission;
pub mod types;
pub mod wizard;

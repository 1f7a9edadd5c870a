//! E2E Description Markup
//!
//! Generation and validation of the wiki markup stored in End-to-end Test
//! ticket descriptions.
//!
//! # Round trip
//!
//! ```text
//! SourceDocument → render → RenderedDescription → (ticket) → validate → Vec<Diagnostic>
//! ```
//!
//! Validating a freshly rendered description yields no diagnostics as long
//! as its business goal matches the configured pattern.
//!
//! # Example
//!
//! ```rust
//! use e2e_description::{render, validate};
//! use e2e_model::{PreconditionSet, SourceDocument, StepRow};
//!
//! let doc = SourceDocument::new(
//!     "PROJ-1",
//!     "Login works",
//!     "User can log in",
//!     PreconditionSet::new(),
//!     vec![StepRow::new("Open login page", "Form is shown")],
//! )
//! .unwrap();
//!
//! let description = render(&doc).unwrap();
//! let diagnostics = validate(description.as_str(), "^User can").unwrap();
//! assert!(diagnostics.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod render;
pub mod validate;

// Re-exports for convenience
pub use error::{RenderError, ValidateError};
pub use render::{render, DescriptionRenderer, RenderedDescription};
pub use validate::{validate, DescriptionValidator, ScanState, Transition};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for rendering and validating descriptions
    pub use crate::{
        render, validate, DescriptionRenderer, DescriptionValidator, RenderError,
        RenderedDescription, ValidateError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Secret masking.
//!
//! Credentials resolved at startup (API tokens, registry passwords) are
//! registered with an [`OutputMasker`] so they never reach the terminal,
//! the logs or the transcript file in clear text.
//!
//! # Example
//!
//! ```
//! use hsdemo::secrets::OutputMasker;
//!
//! let mut masker = OutputMasker::new();
//! masker.add_secret("super-secret-value");
//! let output = masker.mask("The key is super-secret-value here");
//! assert!(!output.contains("super-secret-value"));
//! ```

pub mod mask;

pub use mask::OutputMasker;

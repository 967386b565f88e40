//! envpull - Pull application secrets into a local .env file.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── mod           # Flags with SECRETS_* env fallbacks
//! │   ├── pull          # Runs the pipeline and reports
//! │   └── output        # Terminal output helpers
//! └── core/             # Core library components
//!     ├── config        # Immutable per-run configuration, request URL
//!     ├── fetch         # Secrets API client (one GET, no retry)
//!     ├── extract       # Response shape classification
//!     ├── cipher/       # Payload decryption
//!     │   ├── kdf       # salted / raw-hex / hashed key derivation
//!     │   └── envelope  # ciphertext, iv, tag, salt fields
//!     ├── template      # Expected keys and output order
//!     ├── domain/env    # .env rendering and atomic write
//!     └── pull          # The pipeline
//! ```
//!
//! # Pipeline
//!
//! 1. GET `<base><endpoint>?app=..&env=..` (or an explicit URL)
//! 2. Classify the JSON: `{secrets}`, `{data}` or an AES-256-GCM envelope
//! 3. Check every template key is present; template order, then the rest
//!    sorted
//! 4. Write `KEY=value` lines to a temp file (0600) and rename into place

pub mod cli;
pub mod core;
pub mod error;

//! # ferry-folder
//!
//! Local-directory backends for the `ferry` binary.
//!
//! ## Origin layout
//!
//! ```text
//! <root>/
//! ├── changes.yaml   ordered list of { ref, message, author, timestamp?, path }
//! ├── snapshots/1/   one directory per change, named by `path`
//! └── snapshots/2/
//! ```
//!
//! ## Destination layout
//!
//! ```text
//! <root>/
//! ├── ...            migrated files
//! └── .ferry/
//!     └── history.json   one record per write, newest last
//! ```

pub mod backends;
pub mod destination;
pub mod error;
pub mod history;
pub mod origin;

pub use backends::FolderBackends;
pub use destination::FolderDestination;
pub use error::FolderError;
pub use origin::FolderOrigin;

//! Far: a flat archive format.
//!
//! A far archive is an entry count followed by entries, each a NUL-terminated name, a size, and
//! that many bytes of body. There's no index and no compression: every operation is one pass
//! from the start. See [`format`] for the exact layout.
//!
//! Most uses go through [`Archive`](archive::Archive):
//!
//! ```no_run
//! use far::archive::Archive;
//!
//! let archive = Archive::new("backup.far");
//! let report = archive.add_paths(["notes.txt", "photos"])?;
//! for notice in &report.notices {
//!     eprintln!("{notice}");
//! }
//!
//! for entry in archive.entries()? {
//!     println!("{entry}");
//! }
//! # Ok::<(), far::error::Error>(())
//! ```
//!
//! Adding and deleting rewrite the whole archive into a scratch file next to it, which only
//! replaces the archive once it's complete.

#![warn(clippy::unwrap_used, missing_docs)]
#![deny(rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod archive;
pub mod candidates;
pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod name;
pub mod report;
pub mod selector;

//! Common types defining the binary format structures.
//!
//! An archive is a 4-byte entry count followed by that many entries, packed back to back:
//!
//! ```text
//! [count: u32] ( [name bytes] 0x00 [size: u32] [body: size bytes] )*
//! ```
//!
//! There is no magic, padding, alignment, or index. Integers are little-endian.

#[doc(inline)]
pub use self::entry::*;
#[doc(inline)]
pub use self::header::*;

mod entry;
mod header;

/// Path separator used inside entry names, whatever the host.
pub const SEPARATOR: u8 = b'/';

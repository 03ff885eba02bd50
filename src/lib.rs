//! Locked, bounds-checked per-pixel access to BGRA bitmaps.
//!
//! A [`Bitmap`] owns its pixel bytes behind an exclusive lock. Opening a
//! [`PixelSnoop`] takes that lock once, without blocking, and exposes
//! [`get`](PixelSnoop::get) and [`set`](PixelSnoop::set) in image
//! coordinates; dropping the snoop (or calling
//! [`release`](PixelSnoop::release)) returns the lock on every exit path,
//! panics included.
//!
//! # Access rules
//!
//! - Only [`PixelFormat::Bgra8888`] bitmaps can be snooped, and the format
//!   check runs before any lock attempt.
//! - Lock acquisition is a single try. A bitmap locked elsewhere fails with
//!   [`SnoopError::LockFailure`] rather than waiting.
//! - Every access is bounds-checked; out-of-range coordinates fail with
//!   [`SnoopError::OutOfRange`] and touch nothing.
//! - Rows may be padded: the stride can exceed `width * bytes_per_pixel`,
//!   and padding bytes are never read or written.
//!
//! In-memory pixel bytes are ordered blue, green, red, alpha; [`Color`]
//! carries the same channels as named `a`, `r`, `g`, `b` values. The
//! [`ops`] module holds small whole-image operations built purely on the
//! accessor, both as a demonstration and as coverage for it.

#![forbid(unsafe_code)]

mod bitmap;
mod color;
mod error;
mod snoop;

pub mod ops;

pub use bitmap::{Bitmap, PixelFormat};
pub use color::Color;
pub use error::{SnoopError, SnoopResult};
pub use ops::{box_blur, crop, grayscale, invert};
pub use snoop::PixelSnoop;

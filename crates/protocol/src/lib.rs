//! # wynnparse Protocol Library
//!
//! Text-level building blocks shared by every parser:
//!
//! - [`formatting`] - inline `§x` formatting codes and stripping
//! - [`line`] - [`RawLine`], a chat line with its delivery channel
//! - [`recipient`] - who a chat line is addressed to
//! - [`rank`] - coloured rank badges for login announcements
//! - [`price`] - emerald price shorthand conversion
//!
//! ## Usage Example
//!
//! ```rust
//! use wynnparse_protocol::{RawLine, ChatFormatting};
//!
//! let line = RawLine::foreground("§eCharlie has been added to your friends!");
//! assert_eq!(line.unformatted(), "Charlie has been added to your friends!");
//! assert_eq!(ChatFormatting::Red.to_string(), "§c");
//! ```

pub mod formatting;
pub mod line;
pub mod recipient;
pub mod rank;
pub mod price;

// Re-export commonly used items
pub use formatting::*;
pub use line::*;
pub use recipient::*;
pub use rank::*;
pub use price::*;

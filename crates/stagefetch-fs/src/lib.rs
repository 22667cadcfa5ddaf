//! Staging and atomic publish primitives for downloaded files.
//!
//! A download is written into a private [`StagingFile`] first. Once it is
//! complete it becomes visible through [`publish_move`] or [`publish_copy`],
//! both of which end in a single `rename` on the destination volume, so a
//! reader sees either the previous content or the new one and never a
//! truncated file.

mod error;
mod primitives;

pub use error::{Error, Result};
pub use primitives::{StagingFile, publish_copy, publish_move, relative_to};

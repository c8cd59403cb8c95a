//! Output formats for aligned overlaps.

pub mod sam;

//! Read entities definitions.

pub mod room_type;

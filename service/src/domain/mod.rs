//! Domain definitions.

pub mod booking;
pub mod room;
pub mod room_type;
pub mod user;

pub use self::{booking::Booking, room::Room, room_type::RoomType, user::User};

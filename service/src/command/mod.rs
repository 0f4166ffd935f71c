//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_booking;
pub mod create_room_price;
pub mod create_room_type;
pub mod create_user;
pub mod create_user_session;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    create_booking::CreateBooking, create_room_price::CreateRoomPrice,
    create_room_type::CreateRoomType, create_user::CreateUser,
    create_user_session::CreateUserSession,
};

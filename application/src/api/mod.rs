//! GraphQL API definitions.

pub mod booking;
mod mutation;
mod query;
pub mod room_type;
pub mod scalar;
pub mod user;

use juniper::EmptySubscription;

use crate::{define_error, Context};

pub use self::{
    mutation::Mutation, query::Query, room_type::RoomTypeListing, user::User,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

define_error! {
    enum PrivilegeError {
        #[code = "NOT_ADMINISTRATOR"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be an owner or an administrator"]
        Administrator,
    }
}

define_error! {
    enum RoomTypeError {
        #[code = "ROOM_TYPE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`RoomType` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}

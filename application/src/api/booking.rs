//! Booking-related definitions.

use common::DateTime;
use derive_more::From;
use juniper::{GraphQLObject, GraphQLUnion};
use service::domain::booking;

use crate::{api, Context};

/// Booking request which has passed validation, but is not stored yet.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct ProvisionalBooking {
    /// ID of the `RoomType` to book.
    pub room_type_id: api::room_type::Id,

    /// `DateTime` when the guest checks in.
    pub check_in: DateTime,

    /// `DateTime` when the guest checks out.
    pub check_out: DateTime,
}

impl From<booking::Request> for ProvisionalBooking {
    fn from(request: booking::Request) -> Self {
        let booking::Request {
            room_type_id,
            window,
        } = request;
        Self {
            room_type_id: room_type_id.into(),
            check_in: window.check_in.coerce(),
            check_out: window.check_out.coerce(),
        }
    }
}

/// Issue found in a booking request.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct BookingIssue {
    /// Path of the input fields this `BookingIssue` relates to.
    pub path: Vec<String>,

    /// Human-readable description of this `BookingIssue`.
    pub message: String,
}

impl From<booking::Issue> for BookingIssue {
    fn from(issue: booking::Issue) -> Self {
        Self {
            path: issue.path().iter().copied().map(str::to_owned).collect(),
            message: issue.message().to_owned(),
        }
    }
}

/// Booking request rejected because of its issues.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct BookingValidationErrors {
    /// All the issues found in the booking request.
    pub errors: Vec<BookingIssue>,
}

impl From<Vec<booking::Issue>> for BookingValidationErrors {
    fn from(issues: Vec<booking::Issue>) -> Self {
        Self {
            errors: issues.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of a booking creation.
#[derive(Clone, Debug, From, GraphQLUnion)]
#[graphql(context = Context)]
pub enum CreateBookingResult {
    /// Booking request passed validation.
    Provisional(ProvisionalBooking),

    /// Booking request has issues.
    Rejected(BookingValidationErrors),
}

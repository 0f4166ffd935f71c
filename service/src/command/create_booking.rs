//! [`Command`] for creating a provisional [`Booking`].

use derive_more::{Display, Error, From};
use itertools::Itertools as _;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Booking;
use crate::{
    domain::booking::{self, Issue},
    Service,
};

use super::Command;

/// [`Command`] for creating a provisional [`Booking`] out of raw input.
///
/// Nothing is persisted: the parsed [`booking::Request`] is echoed back.
#[derive(Clone, Debug, From)]
pub struct CreateBooking {
    /// Raw [`booking::Request`] to parse.
    pub request: booking::RawRequest,
}

impl<Db> Command<CreateBooking> for Service<Db> {
    type Ok = booking::Request;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        CreateBooking { request }: CreateBooking,
    ) -> Result<Self::Ok, Self::Err> {
        booking::Request::parse(&request, &self.config().booking)
            .map_err(|issues| {
                log::debug!(
                    "rejected `Booking` request: {}",
                    issues.iter().join("; "),
                );
                ExecutionError::Invalid(issues)
            })
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`CreateBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Raw [`booking::Request`] has [`Issue`]s.
    #[display("`Booking` request has {} issue(s)", _0.len())]
    Invalid(#[error(not(source))] Vec<Issue>),
}

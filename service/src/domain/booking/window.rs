//! [`Window`] definitions.

use common::{Date, DateTime, DateTimeOf};
use derive_more::{Display, Error};
use smart_default::SmartDefault;
use time::macros::time;

use crate::domain::Booking;

use super::{CheckIn, CheckOut, Issue};

/// Policy of normalizing a [`Window`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, SmartDefault)]
pub struct Policy {
    /// Time of a day (in UTC) guests check in at.
    #[default(time!(12:00))]
    pub check_in: time::Time,

    /// Time of a day (in UTC) guests check out at.
    #[default(time!(14:00))]
    pub check_out: time::Time,
}

/// Stay period of a [`Booking`], normalized to the check-in and check-out
/// times of its days.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Window {
    /// [`DateTime`] when a guest checks in.
    pub check_in: CheckInDateTime,

    /// [`DateTime`] when a guest checks out.
    pub check_out: CheckOutDateTime,
}

impl Window {
    /// Normalizes the provided check-in and check-out [`Date`]s into a
    /// [`Window`] according to the provided [`Policy`].
    ///
    /// # Errors
    ///
    /// With a [`ValidationError`] if the normalized check-out doesn't happen
    /// strictly after the normalized check-in.
    pub fn normalize(
        check_in: Date,
        check_out: Date,
        policy: &Policy,
    ) -> Result<Self, ValidationError> {
        let check_in = DateTime::at(check_in, policy.check_in);
        let check_out = DateTime::at(check_out, policy.check_out);
        if check_in >= check_out {
            return Err(ValidationError);
        }
        Ok(Self {
            check_in: check_in.coerce(),
            check_out: check_out.coerce(),
        })
    }

    /// Parses the provided raw check-in and check-out values and
    /// [normalizes][0] them into a [`Window`].
    ///
    /// Ordering is validated only once both values are parsed.
    ///
    /// # Errors
    ///
    /// With all the [`Issue`]s found in the provided values.
    ///
    /// [0]: Window::normalize
    pub fn parse(
        check_in: &str,
        check_out: &str,
        policy: &Policy,
    ) -> Result<Self, Vec<Issue>> {
        match (
            parse_date(Field::CheckIn, check_in),
            parse_date(Field::CheckOut, check_out),
        ) {
            (Ok(check_in), Ok(check_out)) => {
                Self::normalize(check_in, check_out, policy)
                    .map_err(|e| vec![e.into()])
            }
            (check_in, check_out) => Err([check_in.err(), check_out.err()]
                .into_iter()
                .flatten()
                .map(Into::into)
                .collect()),
        }
    }
}

/// Parses a calendar [`Date`] from the provided raw value of a [`Field`].
///
/// Accepted values are:
/// - `YYYY-MM-DD` dates;
/// - [RFC 3339] date-times, converted to UTC before taking their calendar
///   day;
/// - `YYYY-MM-DDTHH:MM[:SS[.fraction]]` date-times without an offset, read as
///   UTC;
/// - Unix timestamps in milliseconds.
///
/// # Errors
///
/// With a [`ParseError`] if the `raw` value is none of the above, or is out
/// of the supported range.
///
/// [RFC 3339]: https://tools.ietf.org/html/rfc3339
pub fn parse_date(field: Field, raw: &str) -> Result<Date, ParseError> {
    let error = || ParseError { field };

    if let Ok(millis) = raw.parse::<i64>() {
        return DateTime::from_unix_timestamp_millis(millis)
            .map(|dt| dt.date())
            .ok_or_else(error);
    }
    Date::from_iso8601(raw)
        .or_else(|_| DateTime::from_rfc3339(raw).map(|dt| dt.date()))
        .or_else(|_| DateTime::from_iso8601_utc(raw).map(|dt| dt.date()))
        .map_err(|_| error())
}

/// Raw input field of a [`Booking`] request.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Field {
    /// ID of the booked room type.
    #[display("roomTypeId")]
    RoomTypeId,

    /// Check-in date.
    #[display("checkIn")]
    CheckIn,

    /// Check-out date.
    #[display("checkOut")]
    CheckOut,
}

impl Field {
    /// Returns the path of this [`Field`] in a request.
    #[must_use]
    pub const fn path(self) -> &'static [&'static str] {
        match self {
            Self::RoomTypeId => &["roomTypeId"],
            Self::CheckIn => &["checkIn"],
            Self::CheckOut => &["checkOut"],
        }
    }
}

/// Error of parsing a raw [`Field`] value.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("Failed to parse `{field}` value")]
pub struct ParseError {
    /// [`Field`] which failed to be parsed.
    #[error(not(source))]
    pub field: Field,
}

impl ParseError {
    /// Returns the human-readable message of this [`ParseError`].
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self.field {
            Field::RoomTypeId => "Invalid room type ID",
            Field::CheckIn | Field::CheckOut => "Invalid date",
        }
    }
}

/// Error of a [`Window`] whose check-out doesn't happen after its check-in.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Error, PartialEq)]
#[display("{}", Self::MESSAGE)]
pub struct ValidationError;

impl ValidationError {
    /// Path of the fields a [`ValidationError`] relates to.
    pub const PATH: &'static [&'static str] = &["checkIn", "checkOut"];

    /// Human-readable message of a [`ValidationError`].
    pub const MESSAGE: &'static str =
        "Check-out date must be after check-in date";
}

/// [`DateTime`] when a guest checks in.
pub type CheckInDateTime = DateTimeOf<(Booking, CheckIn)>;

/// [`DateTime`] when a guest checks out.
pub type CheckOutDateTime = DateTimeOf<(Booking, CheckOut)>;

#[cfg(test)]
mod spec {
    use common::Date;
    use time::macros::{date, time};

    use super::{
        parse_date, Field, Issue, ParseError, Policy, ValidationError, Window,
    };

    fn rfc3339(window: &Window) -> (String, String) {
        (window.check_in.to_rfc3339(), window.check_out.to_rfc3339())
    }

    #[test]
    fn normalizes_to_check_in_and_check_out_times() {
        let window =
            Window::parse("2024-06-10", "2024-06-11", &Policy::default())
                .unwrap();

        assert_eq!(
            rfc3339(&window),
            (
                "2024-06-10T12:00:00Z".to_owned(),
                "2024-06-11T14:00:00Z".to_owned(),
            ),
        );
    }

    #[test]
    fn same_day_passes() {
        let window =
            Window::parse("2024-06-10", "2024-06-10", &Policy::default())
                .unwrap();

        assert_eq!(
            rfc3339(&window),
            (
                "2024-06-10T12:00:00Z".to_owned(),
                "2024-06-10T14:00:00Z".to_owned(),
            ),
        );
    }

    #[test]
    fn rejects_check_out_before_check_in() {
        let issues =
            Window::parse("2024-06-11", "2024-06-10", &Policy::default())
                .unwrap_err();

        assert_eq!(issues, [Issue::Validation(ValidationError)]);
        assert_eq!(issues[0].path(), ["checkIn", "checkOut"]);
        assert_eq!(
            issues[0].message(),
            "Check-out date must be after check-in date",
        );
    }

    #[test]
    fn respects_policy() {
        let policy = Policy {
            check_in: time!(15:00),
            check_out: time!(11:00),
        };

        assert!(Window::parse("2024-06-10", "2024-06-10", &policy).is_err());

        let window = Window::parse("2024-06-10", "2024-06-11", &policy).unwrap();
        assert_eq!(
            rfc3339(&window),
            (
                "2024-06-10T15:00:00Z".to_owned(),
                "2024-06-11T11:00:00Z".to_owned(),
            ),
        );
    }

    #[test]
    fn parses_dates_and_date_times() {
        assert_eq!(
            parse_date(Field::CheckIn, "2024-06-10"),
            Ok(Date::from(date!(2024 - 06 - 10))),
        );
        assert_eq!(
            parse_date(Field::CheckIn, "2024-06-10T08:15:00Z"),
            Ok(Date::from(date!(2024 - 06 - 10))),
        );
        assert_eq!(
            parse_date(Field::CheckIn, "2024-06-10T22:00:00-05:00"),
            Ok(Date::from(date!(2024 - 06 - 11))),
        );
    }

    #[test]
    fn parses_unix_millis_and_offsetless_date_times() {
        assert_eq!(
            parse_date(Field::CheckIn, "1718020800000"),
            Ok(Date::from(date!(2024 - 06 - 10))),
        );
        assert_eq!(
            parse_date(Field::CheckIn, "2024-06-10T23:59:59"),
            Ok(Date::from(date!(2024 - 06 - 10))),
        );

        let window = Window::parse(
            "1718020800000",
            "1718107200000",
            &Policy::default(),
        )
        .unwrap();
        assert_eq!(
            rfc3339(&window),
            (
                "2024-06-10T12:00:00Z".to_owned(),
                "2024-06-11T14:00:00Z".to_owned(),
            ),
        );

        let window = Window::parse(
            "2024-06-10T00:00:00",
            "2024-06-11T00:00",
            &Policy::default(),
        )
        .unwrap();
        assert_eq!(
            rfc3339(&window),
            (
                "2024-06-10T12:00:00Z".to_owned(),
                "2024-06-11T14:00:00Z".to_owned(),
            ),
        );
    }

    #[test]
    fn out_of_range_date_time_is_parse_issue() {
        assert_eq!(
            parse_date(Field::CheckOut, "9999-12-31T23:00:00-05:00"),
            Err(ParseError {
                field: Field::CheckOut
            }),
        );
        assert_eq!(
            parse_date(Field::CheckOut, &i64::MAX.to_string()),
            Err(ParseError {
                field: Field::CheckOut
            }),
        );

        let issues = Window::parse(
            "2024-06-10",
            "9999-12-31T23:30:00-01:00",
            &Policy::default(),
        )
        .unwrap_err();
        assert_eq!(
            issues,
            [Issue::Parse(ParseError {
                field: Field::CheckOut
            })],
        );
        assert_eq!(issues[0].path(), ["checkOut"]);
    }

    #[test]
    fn reports_every_unparseable_field() {
        let issues =
            Window::parse("tomorrow", "2024-13-40", &Policy::default())
                .unwrap_err();

        assert_eq!(
            issues,
            [
                Issue::Parse(ParseError {
                    field: Field::CheckIn
                }),
                Issue::Parse(ParseError {
                    field: Field::CheckOut
                }),
            ],
        );
        assert_eq!(issues[0].path(), ["checkIn"]);
        assert_eq!(issues[1].path(), ["checkOut"]);
        assert_eq!(issues[1].message(), "Invalid date");
    }

    #[test]
    fn skips_ordering_until_parsed() {
        let issues = Window::parse("2024-06-11", "", &Policy::default())
            .unwrap_err();

        assert_eq!(
            issues,
            [Issue::Parse(ParseError {
                field: Field::CheckOut
            })],
        );
    }
}

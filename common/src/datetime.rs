//! Date and time utilities.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{cmp::Ordering, marker::PhantomData, ops, time::Duration};

use derive_more::{Debug, Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    UtcOffset,
};

use crate::DateOf;

/// Untyped date and time.
pub type DateTime = DateTimeOf;

/// UTC date and time.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// Inner representation of the date and time.
    inner: time::OffsetDateTime,

    /// Type parameter describing the kind of date and time.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// Creates a new [`DateTime`] representing the current date and time,
    /// truncated to microseconds, as stored by Postgres.
    #[must_use]
    pub fn now() -> Self {
        let now = time::OffsetDateTime::now_utc();
        let sub_micros = i64::from(now.nanosecond() % 1_000);
        Self {
            inner: now - time::Duration::nanoseconds(sub_micros),
            _of: PhantomData,
        }
    }

    /// Creates a new [`DateTime`] at the provided `time` of the provided UTC
    /// calendar `date`.
    #[must_use]
    pub fn at<D: ?Sized>(date: DateOf<D>, time: time::Time) -> Self {
        Self {
            inner: time::PrimitiveDateTime::new(date.into(), time).assume_utc(),
            _of: PhantomData,
        }
    }

    /// Creates a new [`DateTime`] from the provided Unix timestamp.
    ///
    /// [`None`] is returned if the timestamp is invalid.
    #[must_use]
    pub fn from_unix_timestamp(timestamp: i64) -> Option<Self> {
        Some(Self {
            inner: time::OffsetDateTime::from_unix_timestamp(timestamp).ok()?,
            _of: PhantomData,
        })
    }

    /// Creates a new [`DateTime`] from the provided Unix timestamp in
    /// milliseconds.
    ///
    /// [`None`] is returned if the timestamp is out of range.
    #[must_use]
    pub fn from_unix_timestamp_millis(millis: i64) -> Option<Self> {
        Some(Self {
            inner: time::OffsetDateTime::from_unix_timestamp_nanos(
                i128::from(millis) * 1_000_000,
            )
            .ok()?,
            _of: PhantomData,
        })
    }

    /// Returns the Unix timestamp of this [`DateTime`].
    #[must_use]
    pub fn unix_timestamp(&self) -> i64 {
        self.inner.unix_timestamp()
    }

    /// Creates a new [`DateTime`] from the provided [RFC 3339] string.
    ///
    /// Any offset in the `input` is normalized to UTC.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        use ParseError as E;

        time::OffsetDateTime::parse(input, &Rfc3339)
            .map_err(E::Parse)?
            .try_into()
            .map_err(E::Range)
    }

    /// Creates a new [`DateTime`] from the provided ISO 8601 date and time
    /// without an offset (`YYYY-MM-DDTHH:MM[:SS[.fraction]]`), read as UTC.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not of the format above.
    pub fn from_iso8601_utc(input: &str) -> Result<Self, ParseError> {
        const FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
            "[year]-[month]-[day]T[hour]:[minute][optional [:[second][optional [.[subsecond]]]]]"
        );

        time::PrimitiveDateTime::parse(input, FORMAT)
            .map_err(ParseError::Parse)?
            .assume_utc()
            .try_into()
            .map_err(ParseError::Range)
    }

    /// Returns the [`DateTime`] as an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.inner.format(&Rfc3339).unwrap_or_else(|e| {
            panic!("cannot format `DateTime` as RFC 3339: {e}")
        })
    }

    /// Returns the UTC calendar date of this [`DateTime`].
    #[must_use]
    pub fn date<D: ?Sized>(&self) -> DateOf<D> {
        self.inner.date().into()
    }

    /// Coerces one kind of [`DateTime`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

/// Error of parsing [`DateTime`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// Failed to parse the string into an [`DateTime`].
    Parse(time::error::Parse),

    /// Parsed [`DateTime`] cannot be represented in UTC.
    Range(RangeError),
}

/// Error of representing a [`time::OffsetDateTime`] as a [`DateTime`].
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum RangeError {
    /// UTC date and time falls outside the supported years.
    #[display("date and time is out of range in UTC")]
    Overflow,

    /// Microsecond component is out of range.
    Component(time::error::ComponentRange),
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> TryFrom<time::OffsetDateTime> for DateTimeOf<Of> {
    type Error = RangeError;

    fn try_from(dt: time::OffsetDateTime) -> Result<Self, Self::Error> {
        dt.checked_to_offset(UtcOffset::UTC)
            .ok_or(RangeError::Overflow)?
            .replace_microsecond(dt.microsecond())
            .map_err(RangeError::Component)
            .map(|inner| Self {
                inner,
                _of: PhantomData,
            })
    }
}

impl<Of: ?Sized> ops::Add<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self {
            inner: self.inner + rhs,
            _of: PhantomData,
        }
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> FromSql<'_> for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::OffsetDateTime::from_sql(ty, raw)?
            .try_into()
            .map_err(Box::from)
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> ToSql for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.inner.to_sql(ty, w)
    }
}

#[cfg(feature = "serde")]
pub mod serde {
    //! Module providing integration with [`serde`] crate.

    use super::DateTimeOf;

    pub mod unix_timestamp {
        //! Module providing serialization and deserialization of [`DateTimeOf`]
        //! as a Unix timestamp.

        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        use super::DateTimeOf;

        /// Serializes the [`DateTimeOf`] as a Unix timestamp.
        ///
        /// # Errors
        ///
        /// Returns an error if the timestamp is invalid.
        pub fn serialize<Of, S>(
            dt: &DateTimeOf<Of>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
            Of: ?Sized,
        {
            serializer.serialize_i64(dt.unix_timestamp())
        }

        /// Deserializes the Unix timestamp into a [`DateTimeOf`].
        ///
        /// # Errors
        ///
        /// Returns an error if the timestamp is invalid.
        pub fn deserialize<'de, D, Of>(
            deserializer: D,
        ) -> Result<DateTimeOf<Of>, D::Error>
        where
            D: Deserializer<'de>,
            Of: ?Sized,
        {
            DateTimeOf::from_unix_timestamp(i64::deserialize(deserializer)?)
                .ok_or_else(|| Error::custom("invalid timestamp"))
        }
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Date and time in a [RFC 3339] format with a microsecond precision.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[graphql_scalar(with = Self, parse_token(String))]
    type DateTime = crate::DateTime;

    impl DateTime {
        fn to_output<S: ScalarValue>(dt: &DateTime) -> Value<S> {
            Value::scalar(dt.to_rfc3339())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `DateTime` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_rfc3339(s).map_err(|e| {
                        format!("Cannot parse `DateTime` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use time::macros::{date, time};

    use super::{ParseError, RangeError};
    use crate::{Date, DateTime};

    #[test]
    fn at_time_of_date() {
        let date = Date::from(date!(2024 - 06 - 10));

        assert_eq!(
            DateTime::at(date, time!(12:00)).to_rfc3339(),
            "2024-06-10T12:00:00Z",
        );
        assert_eq!(
            DateTime::at(date, time!(14:00)).to_rfc3339(),
            "2024-06-10T14:00:00Z",
        );
    }

    #[test]
    fn now_has_microsecond_precision() {
        let now = DateTime::now();
        let formatted = now.to_rfc3339();

        let fraction = formatted
            .split_once('.')
            .map_or("", |(_, rest)| rest.trim_end_matches('Z'));
        assert!(fraction.len() <= 6, "too precise: {formatted}");
        assert_eq!(
            DateTime::from_rfc3339(&formatted).unwrap(),
            now,
        );
    }

    #[test]
    fn adds_std_duration() {
        let dt = DateTime::from_rfc3339("2024-06-10T23:45:00Z").unwrap();

        assert_eq!(
            (dt + Duration::from_secs(30 * 60)).to_rfc3339(),
            "2024-06-11T00:15:00Z",
        );
    }

    #[test]
    fn rfc3339_is_normalized_to_utc() {
        let dt = DateTime::from_rfc3339("2024-06-10T23:30:00-05:00").unwrap();

        assert_eq!(dt.to_rfc3339(), "2024-06-11T04:30:00Z");
        assert_eq!(dt.date::<()>(), Date::from(date!(2024 - 06 - 11)));

        assert!(DateTime::from_rfc3339("2024-06-10").is_err());
        assert!(DateTime::from_rfc3339("yesterday").is_err());
    }

    #[test]
    fn rfc3339_beyond_last_utc_year_is_error() {
        assert!(matches!(
            DateTime::from_rfc3339("9999-12-31T23:00:00-05:00"),
            Err(ParseError::Range(RangeError::Overflow)),
        ));
        assert!(DateTime::from_rfc3339("9999-12-31T23:00:00+05:00").is_ok());
    }

    #[test]
    fn unix_timestamp_millis() {
        let dt = DateTime::from_unix_timestamp_millis(1_718_020_800_123).unwrap();

        assert_eq!(dt.to_rfc3339(), "2024-06-10T12:00:00.123Z");
        assert_eq!(
            DateTime::from_unix_timestamp_millis(-86_400_000)
                .unwrap()
                .to_rfc3339(),
            "1969-12-31T00:00:00Z",
        );
        assert!(DateTime::from_unix_timestamp_millis(i64::MAX).is_none());
    }

    #[test]
    fn iso8601_without_offset_is_utc() {
        assert_eq!(
            DateTime::from_iso8601_utc("2024-06-10T22:15").unwrap().to_rfc3339(),
            "2024-06-10T22:15:00Z",
        );
        assert_eq!(
            DateTime::from_iso8601_utc("2024-06-10T22:15:30.5")
                .unwrap()
                .to_rfc3339(),
            "2024-06-10T22:15:30.5Z",
        );
        assert!(DateTime::from_iso8601_utc("2024-06-10").is_err());
        assert!(DateTime::from_iso8601_utc("2024-06-10T22:15:00Z").is_err());
    }
}

//! [`Percent`]-related definitions.

use derive_more::{Display, Into};
use rust_decimal::{prelude::ToPrimitive as _, Decimal};

/// Whole percentage, rounded half-up.
///
/// Might be negative or exceed `100` when describing a change of value.
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, Hash, Into, Ord, PartialEq,
    PartialOrd,
)]
pub struct Percent(i32);

impl Percent {
    /// Zero [`Percent`].
    pub const ZERO: Self = Self(0);

    /// Creates a new [`Percent`] from the provided whole value.
    #[must_use]
    pub const fn new(val: i32) -> Self {
        Self(val)
    }

    /// Calculates the [`Percent`] the `part` makes of the `whole`, rounding
    /// half-up (toward positive infinity) to a whole value.
    ///
    /// [`None`] is returned if the `whole` is zero, or the result doesn't fit
    /// into a [`Percent`].
    #[must_use]
    pub fn of(part: Decimal, whole: Decimal) -> Option<Self> {
        let ratio = part.checked_mul(Decimal::ONE_HUNDRED)?.checked_div(whole)?;
        (ratio + Decimal::new(5, 1)).floor().to_i32().map(Self)
    }

    /// Returns the whole value of this [`Percent`].
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Whole percentage, rounded half-up.
    #[graphql_scalar(with = Self, parse_token(i32))]
    type Percent = super::Percent;

    impl Percent {
        fn to_output<S: ScalarValue>(p: &Percent) -> Value<S> {
            Value::scalar(p.value())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input.as_int_value().map(Self::new).ok_or_else(|| {
                format!(
                    "Cannot parse `Percent` input scalar from \
                     non-integer value: {input}",
                )
            })
        }
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::Percent;

    fn percent_of(part: i64, whole: i64) -> Option<Percent> {
        Percent::of(Decimal::from(part), Decimal::from(whole))
    }

    #[test]
    fn of() {
        assert_eq!(percent_of(200, 1000), Some(Percent::new(20)));
        assert_eq!(percent_of(200, 1200), Some(Percent::new(17)));
        assert_eq!(percent_of(1, 3), Some(Percent::new(33)));
        assert_eq!(percent_of(0, 3), Some(Percent::ZERO));
        assert_eq!(percent_of(3, 3), Some(Percent::new(100)));
    }

    #[test]
    fn of_rounds_half_up() {
        assert_eq!(percent_of(1, 8), Some(Percent::new(13)));
        assert_eq!(percent_of(-1, 8), Some(Percent::new(-12)));
        assert_eq!(percent_of(-200, 1000), Some(Percent::new(-20)));
    }

    #[test]
    fn of_zero_whole() {
        assert_eq!(percent_of(5, 0), None);
    }
}

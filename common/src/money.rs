//! [`Money`]-related definitions.

use derive_more::{Display, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Non-negative amount of money in minor units of the hotel currency.
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, Hash, Into, Ord, PartialEq,
    PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Money(i32);

impl Money {
    /// Zero [`Money`].
    pub const ZERO: Self = Self(0);

    /// Creates a new [`Money`] if the provided `amount` is non-negative.
    #[must_use]
    pub const fn new(amount: i32) -> Option<Self> {
        if amount < 0 {
            None
        } else {
            Some(Self(amount))
        }
    }

    /// Returns the amount of minor units in this [`Money`].
    #[must_use]
    pub const fn amount(self) -> i32 {
        self.0
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        Self::from(money.0)
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Non-negative amount of money in minor currency units.
    #[graphql_scalar(with = Self, parse_token(i32))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.amount())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_int_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-integer value: {input}",
                    )
                })
                .and_then(|amount| {
                    Self::new(amount).ok_or_else(|| {
                        format!(
                            "Cannot parse `Money` input scalar: \
                             negative amount {amount}",
                        )
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Money;

    #[test]
    fn new() {
        assert_eq!(Money::new(0), Some(Money::ZERO));
        assert_eq!(Money::new(1900).map(Money::amount), Some(1900));
        assert_eq!(Money::new(-1), None);
    }

    #[test]
    fn to_string() {
        assert_eq!(Money::new(2400).unwrap().to_string(), "2400");
        assert_eq!(Money::ZERO.to_string(), "0");
    }

    #[test]
    fn ordering() {
        assert!(Money::new(800).unwrap() < Money::new(1000).unwrap());
    }
}

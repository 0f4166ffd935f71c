//! [`Price`] definitions.

use common::{define_kind, unit, Date, DateOf, Money, Percent};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::RoomType;

/// Price of a [`RoomType`] night, effective in some range of dates.
#[derive(Clone, Debug)]
pub struct Price {
    /// ID of this [`Price`].
    pub id: Id,

    /// [`Kind`] of this [`Price`].
    pub kind: Kind,

    /// Amount for a weekday night.
    pub weekday: Money,

    /// Amount for a weekend night.
    pub weekend: Money,

    /// [`PromotionName`] of this [`Price`], if it's a [`Kind::Promotion`].
    pub promotion_name: Option<PromotionName>,

    /// First [`Date`] this [`Price`] is effective on (inclusive).
    pub effective_from: EffectiveFromDate,

    /// Last [`Date`] this [`Price`] is effective on (inclusive).
    ///
    /// [`None`] means that this [`Price`] is effective indefinitely.
    pub effective_to: Option<EffectiveToDate>,
}

impl Price {
    /// Indicates whether this [`Price`] is effective on the provided `date`.
    #[must_use]
    pub fn is_effective_on(&self, date: Date) -> bool {
        self.effective_from.coerce::<()>() <= date
            && self.effective_to.map_or(true, |to| to.coerce::<()>() >= date)
    }
}

/// ID of a [`Price`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Kind of a [`Price`]."]
    enum Kind {
        #[doc = "Regular rate of a room."]
        Standard = 1,

        #[doc = "Time-bounded discounted rate of a room."]
        Promotion = 2,
    }
}

/// Name of a promotional [`Price`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PromotionName(String);

impl PromotionName {
    /// Creates a new [`PromotionName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`PromotionName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 255
    }
}

impl FromStr for PromotionName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `PromotionName`")
    }
}

/// [`Date`] a [`Price`] becomes effective on.
pub type EffectiveFromDate = DateOf<(Price, unit::Start)>;

/// Last [`Date`] a [`Price`] is effective on.
pub type EffectiveToDate = DateOf<(Price, unit::End)>;

/// Selector of [`Price`]s effective on the provided [`Date`].
#[derive(Clone, Copy, Debug, Eq, From, PartialEq)]
pub struct EffectiveOn(pub Date);

impl EffectiveOn {
    /// Selects [`Price`]s effective today (in UTC).
    #[must_use]
    pub fn today() -> Self {
        Self(Date::today())
    }
}

/// Effective [`Price`]s of a [`RoomType`] resolved for displaying.
#[derive(Clone, Debug)]
pub struct Resolution {
    /// Effective [`Kind::Standard`] [`Price`].
    pub standard: Price,

    /// Effective [`Kind::Promotion`] [`Price`], if any.
    pub promotion: Option<Price>,

    /// Savings of the weekday [`promotion`] amount comparing to the
    /// [`standard`] one.
    ///
    /// [`promotion`]: Resolution::promotion
    /// [`standard`]: Resolution::standard
    pub weekday_savings: Percent,

    /// Savings of the weekend [`promotion`] amount comparing to the
    /// [`standard`] one.
    ///
    /// [`promotion`]: Resolution::promotion
    /// [`standard`]: Resolution::standard
    pub weekend_savings: Percent,

    /// Weekday amount to be displayed as the [`RoomType`] price.
    pub display_price: Money,
}

impl Resolution {
    /// Resolves the provided effective [`Price`]s of a [`RoomType`].
    ///
    /// The first [`Price`] of each [`Kind`] wins. [`None`] is returned if
    /// there is no [`Kind::Standard`] [`Price`] at all.
    #[must_use]
    pub fn resolve(prices: &[Price]) -> Option<Self> {
        let standard = prices.iter().find(|p| p.kind == Kind::Standard)?;
        let promotion = prices.iter().find(|p| p.kind == Kind::Promotion);

        let (weekday_savings, weekend_savings) =
            promotion.map_or((Percent::ZERO, Percent::ZERO), |promo| {
                (
                    savings(standard.weekday, promo.weekday),
                    savings(standard.weekend, promo.weekend),
                )
            });

        Some(Self {
            display_price: promotion.unwrap_or(standard).weekday,
            standard: standard.clone(),
            promotion: promotion.cloned(),
            weekday_savings,
            weekend_savings,
        })
    }

    /// Indicates whether a [`Kind::Promotion`] [`Price`] is applied.
    #[must_use]
    pub fn is_promoted(&self) -> bool {
        self.promotion.is_some()
    }
}

/// Calculates the [`Percent`] the `promotion` amount saves from the
/// `standard` one.
///
/// Zero `standard` amount saves nothing.
fn savings(standard: Money, promotion: Money) -> Percent {
    let standard = Decimal::from(standard);
    Percent::of(standard - Decimal::from(promotion), standard)
        .unwrap_or(Percent::ZERO)
}

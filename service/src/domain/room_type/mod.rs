//! [`RoomType`] definitions.

pub mod price;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Room;

pub use self::price::Price;

/// Category of hotel rooms sharing the same pricing.
#[derive(Clone, Debug)]
pub struct RoomType {
    /// ID of this [`RoomType`].
    pub id: Id,

    /// [`Name`] of this [`RoomType`].
    pub name: Name,

    /// Unique [`Code`] of this [`RoomType`].
    pub code: Code,

    /// [`Description`] of this [`RoomType`], if any.
    pub description: Option<Description>,

    /// [`Price`]s of this [`RoomType`].
    ///
    /// Once loaded from the [`Database`], contains only the [`Price`]s
    /// effective on the selected date.
    ///
    /// [`Database`]: crate::infra::Database
    pub prices: Vec<Price>,

    /// [`Room`]s of this [`RoomType`].
    pub rooms: Vec<Room>,

    /// [`DateTime`] when this [`RoomType`] was created.
    pub created_at: CreationDateTime,
}

impl RoomType {
    /// Indicates whether this [`RoomType`] may be shown to guests, meaning
    /// that it has an effective [`price::Kind::Standard`] [`Price`].
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.prices.iter().any(|p| p.kind == price::Kind::Standard)
    }

    /// Resolves the effective [`Price`]s of this [`RoomType`].
    #[must_use]
    pub fn resolve_price(&self) -> Option<price::Resolution> {
        price::Resolution::resolve(&self.prices)
    }
}

/// Filters out [`RoomType`]s which are not [visible][0] to guests,
/// preserving the order of the remaining ones.
///
/// [0]: RoomType::is_visible
#[must_use]
pub fn visible(room_types: Vec<RoomType>) -> Vec<RoomType> {
    room_types.into_iter().filter(RoomType::is_visible).collect()
}

/// ID of a [`RoomType`].
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

/// Name of a [`RoomType`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 255
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `RoomType` name")
    }
}

/// Short unique code of a [`RoomType`], also prefixing its [`Room`] names.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Code(String);

impl Code {
    /// Creates a new [`Code`] if the given `code` is valid.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        Self::check(&code).then_some(Self(code))
    }

    /// Checks whether the given `code` is a valid [`Code`]: 1 to 32 ASCII
    /// letters, digits, `_` or `-`.
    fn check(code: impl AsRef<str>) -> bool {
        let code = code.as_ref();
        (1..=32).contains(&code.len())
            && code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
}

impl FromStr for Code {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `RoomType` code")
    }
}

/// Description of a [`RoomType`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Description`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.trim().is_empty() && text.len() <= 4096
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `RoomType` description")
    }
}

/// [`DateTime`] when a [`RoomType`] was created.
pub type CreationDateTime = DateTimeOf<(RoomType, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{DateTime, Money};
    use time::macros::date;

    use super::{price, Code, Id, Name, Price, RoomType};

    fn room_type(name: &str, kinds: &[price::Kind]) -> RoomType {
        RoomType {
            id: Id::new(),
            name: Name::new(name).unwrap(),
            code: Code::new(name.to_uppercase()).unwrap(),
            description: None,
            prices: kinds
                .iter()
                .map(|&kind| Price {
                    id: price::Id::new(),
                    kind,
                    weekday: Money::new(1000).unwrap(),
                    weekend: Money::new(1200).unwrap(),
                    promotion_name: None,
                    effective_from: date!(2024 - 01 - 01).into(),
                    effective_to: None,
                })
                .collect(),
            rooms: vec![],
            created_at: DateTime::now().coerce(),
        }
    }

    fn names(room_types: &[RoomType]) -> Vec<String> {
        room_types.iter().map(|rt| rt.name.to_string()).collect()
    }

    #[test]
    fn visible_only_with_standard_price() {
        use price::Kind::{Promotion, Standard};

        assert!(room_type("single", &[Standard]).is_visible());
        assert!(room_type("double", &[Promotion, Standard]).is_visible());
        assert!(!room_type("suite", &[Promotion]).is_visible());
        assert!(!room_type("attic", &[]).is_visible());
    }

    #[test]
    fn invisible_room_type_has_no_resolution() {
        use price::Kind::Promotion;

        let rt = room_type("suite", &[Promotion]);

        assert!(!rt.is_visible());
        assert!(rt.resolve_price().is_none());
    }

    #[test]
    fn filters_preserving_order() {
        use price::Kind::{Promotion, Standard};

        let filtered = super::visible(vec![
            room_type("double", &[Standard]),
            room_type("attic", &[]),
            room_type("single", &[Promotion, Standard]),
            room_type("suite", &[Promotion]),
            room_type("family", &[Standard]),
        ]);

        assert_eq!(names(&filtered), ["double", "single", "family"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        use price::Kind::{Promotion, Standard};

        let once = super::visible(vec![
            room_type("attic", &[]),
            room_type("double", &[Standard]),
            room_type("suite", &[Promotion]),
        ]);
        let twice = super::visible(once.clone());

        assert_eq!(names(&once), names(&twice));
    }

    #[test]
    fn code_format() {
        assert!(Code::new("DLX").is_some());
        assert!(Code::new("family_suite-2").is_some());

        assert!(Code::new("").is_none());
        assert!(Code::new("DLX 1").is_none());
        assert!(Code::new("X".repeat(33)).is_none());
    }
}

//! [`RoomType`]-related read definitions.

use crate::domain::{room_type::price, RoomType};

/// [`RoomType`] shown to guests along with its resolved [`price`]s.
#[derive(Clone, Debug)]
pub struct Listing {
    /// Listed [`RoomType`].
    pub room_type: RoomType,

    /// Resolved effective [`price`]s of the [`RoomType`].
    pub pricing: price::Resolution,
}

impl Listing {
    /// Creates a new [`Listing`] of the provided [`RoomType`].
    ///
    /// [`None`] is returned if the [`RoomType`] is not [visible][0].
    ///
    /// [0]: RoomType::is_visible
    #[must_use]
    pub fn new(room_type: RoomType) -> Option<Self> {
        let pricing = room_type.resolve_price()?;
        Some(Self { room_type, pricing })
    }

    /// Lists the provided [`RoomType`]s from the cheapest to the most
    /// expensive [display price][0].
    ///
    /// [`RoomType`]s with equal display prices keep their relative order.
    /// Invisible [`RoomType`]s are skipped.
    ///
    /// [0]: price::Resolution::display_price
    #[must_use]
    pub fn sorted(room_types: Vec<RoomType>) -> Vec<Self> {
        let mut listings = room_types
            .into_iter()
            .filter_map(Self::new)
            .collect::<Vec<_>>();
        listings.sort_by_key(|l| l.pricing.display_price);
        listings
    }

    /// Returns the number of rooms of the listed [`RoomType`].
    #[must_use]
    pub fn rooms_count(&self) -> usize {
        self.room_type.rooms.len()
    }
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Money};
    use time::macros::date;

    use crate::domain::{
        room_type::{self, price, Price},
        Room, RoomType,
    };

    use super::Listing;

    fn price(kind: price::Kind, weekday: i32) -> Price {
        Price {
            id: price::Id::new(),
            kind,
            weekday: Money::new(weekday).unwrap(),
            weekend: Money::new(weekday + 200).unwrap(),
            promotion_name: None,
            effective_from: date!(2024 - 01 - 01).into(),
            effective_to: None,
        }
    }

    fn room_type(code: &str, prices: Vec<Price>) -> RoomType {
        let code = room_type::Code::new(code).unwrap();
        RoomType {
            id: room_type::Id::new(),
            name: room_type::Name::new(code.to_string()).unwrap(),
            rooms: (1..=2).map(|n| Room::numbered(&code, n)).collect(),
            code,
            description: None,
            prices,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn sorts_by_display_price() {
        use price::Kind::{Promotion, Standard};

        let listings = Listing::sorted(vec![
            room_type("SUITE", vec![price(Standard, 3000)]),
            room_type("ATTIC", vec![price(Promotion, 100)]),
            room_type(
                "DOUBLE",
                vec![price(Standard, 2000), price(Promotion, 900)],
            ),
            room_type("SINGLE", vec![price(Standard, 1000)]),
            room_type("TWIN", vec![price(Standard, 1000)]),
        ]);

        assert_eq!(
            listings
                .iter()
                .map(|l| l.room_type.code.to_string())
                .collect::<Vec<_>>(),
            ["DOUBLE", "SINGLE", "TWIN", "SUITE"],
        );
        assert_eq!(listings[0].pricing.display_price, Money::new(900).unwrap());
        assert_eq!(listings[0].rooms_count(), 2);
    }

    #[test]
    fn skips_invisible_room_type() {
        assert!(Listing::new(room_type("ATTIC", vec![])).is_none());
    }
}

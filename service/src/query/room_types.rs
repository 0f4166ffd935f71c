//! [`Query`] collection related to the multiple [`RoomType`]s.

use common::operations::{By, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        room_type::{self, price},
        RoomType,
    },
    infra::{database, Database},
    read, Service,
};

use super::Query;

/// Queries [`RoomType`]s [visible][0] to guests on the provided date, in the
/// [`Database`] order.
///
/// [0]: RoomType::is_visible
#[derive(Clone, Copy, Debug)]
pub struct Visible(pub price::EffectiveOn);

impl Visible {
    /// Queries [`RoomType`]s visible to guests today.
    #[must_use]
    pub fn today() -> Self {
        Self(price::EffectiveOn::today())
    }
}

impl<Db> Query<Visible> for Service<Db>
where
    Db: Database<
        Select<By<Vec<RoomType>, price::EffectiveOn>>,
        Ok = Vec<RoomType>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<RoomType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Visible(on): Visible,
    ) -> Result<Self::Ok, Self::Err> {
        let all = self
            .database()
            .execute(Select(By::new(on)))
            .await
            .map_err(tracerr::wrap!())?;

        let total = all.len();
        let visible = room_type::visible(all);
        if visible.len() < total {
            log::debug!(
                "{} of {total} `RoomType`s have no effective standard price",
                total - visible.len(),
            );
        }

        Ok(visible)
    }
}

/// Queries [`read::room_type::Listing`]s of the [`Visible`] [`RoomType`]s,
/// sorted by their display price.
#[derive(Clone, Copy, Debug)]
pub struct Listing(pub price::EffectiveOn);

impl Listing {
    /// Queries [`read::room_type::Listing`]s effective today.
    #[must_use]
    pub fn today() -> Self {
        Self(price::EffectiveOn::today())
    }
}

impl<Db> Query<Listing> for Service<Db>
where
    Self: Query<Visible, Ok = Vec<RoomType>, Err = Traced<database::Error>>,
{
    type Ok = Vec<read::room_type::Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Listing(on): Listing,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Visible(on))
            .await
            .map_err(tracerr::wrap!())
            .map(read::room_type::Listing::sorted)
    }
}

#[cfg(test)]
mod spec {
    use common::{Date, Money};
    use time::macros::date;

    use crate::{
        domain::room_type::price::{self, EffectiveOn},
        infra::database::mock::{self, Mock},
        Query as _,
    };

    use super::{Listing, Visible};

    fn on() -> EffectiveOn {
        EffectiveOn(Date::from(date!(2024 - 06 - 10)))
    }

    fn seeded() -> Mock {
        use price::Kind::{Promotion, Standard};

        let db = Mock::default();
        db.seed_room_type(mock::room_type("SUITE", &[(Standard, 3000)]));
        db.seed_room_type(mock::room_type("ATTIC", &[(Promotion, 100)]));
        db.seed_room_type(mock::room_type(
            "DOUBLE",
            &[(Standard, 2000), (Promotion, 1500)],
        ));
        db.seed_room_type(mock::room_type("BUNK", &[]));
        db
    }

    #[tokio::test]
    async fn visible_excludes_room_types_without_standard_price() {
        let svc = mock::service(seeded());

        let codes = svc
            .execute(Visible(on()))
            .await
            .unwrap()
            .into_iter()
            .map(|rt| rt.code.to_string())
            .collect::<Vec<_>>();

        assert_eq!(codes, ["DOUBLE", "SUITE"]);
    }

    #[tokio::test]
    async fn listing_is_sorted_by_display_price() {
        let svc = mock::service(seeded());

        let listings = svc.execute(Listing(on())).await.unwrap();

        assert_eq!(
            listings
                .iter()
                .map(|l| (l.room_type.code.to_string(), l.pricing.display_price))
                .collect::<Vec<_>>(),
            [
                ("DOUBLE".to_owned(), Money::new(1500).unwrap()),
                ("SUITE".to_owned(), Money::new(3000).unwrap()),
            ],
        );
    }

    #[tokio::test]
    async fn propagates_database_failure_without_retrying() {
        let db = seeded();
        db.fail();
        let svc = mock::service(db.clone());

        assert!(svc.execute(Visible(on())).await.is_err());
        assert_eq!(db.calls(), 1);

        assert!(svc.execute(Listing(on())).await.is_err());
        assert_eq!(db.calls(), 2);
    }
}

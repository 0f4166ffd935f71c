//! [`Command`] for adding a new [`Price`] to a [`RoomType`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        room_type::{self, price, Price},
        RoomType,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a new [`Price`] to a [`RoomType`].
#[derive(Clone, Debug)]
pub struct CreateRoomPrice {
    /// ID of the [`RoomType`] to add the [`Price`] to.
    pub room_type_id: room_type::Id,

    /// [`price::Kind`] of a new [`Price`].
    pub kind: price::Kind,

    /// Weekday night amount.
    pub weekday: Money,

    /// Weekend night amount.
    pub weekend: Money,

    /// [`price::PromotionName`] of a new [`Price`], if any.
    pub promotion_name: Option<price::PromotionName>,

    /// First date a new [`Price`] is effective on.
    pub effective_from: price::EffectiveFromDate,

    /// Last date a new [`Price`] is effective on, if any.
    pub effective_to: Option<price::EffectiveToDate>,
}

impl<Db> Command<CreateRoomPrice> for Service<Db>
where
    Db: Database<
            Select<By<Option<RoomType>, room_type::Id>>,
            Ok = Option<RoomType>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Insert<(room_type::Id, Price)>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Price;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateRoomPrice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRoomPrice {
            room_type_id,
            kind,
            weekday,
            weekend,
            promotion_name,
            effective_from,
            effective_to,
        } = cmd;

        if effective_to.is_some_and(|to| {
            to.coerce::<()>() < effective_from.coerce::<()>()
        }) {
            return Err(tracerr::new!(E::InvalidPeriod));
        }

        _ = self
            .database()
            .execute(Select(By::new(room_type_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomTypeNotExists(room_type_id))
            .map_err(tracerr::wrap!())?;

        let price = Price {
            id: price::Id::new(),
            kind,
            weekday,
            weekend,
            promotion_name,
            effective_from,
            effective_to,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert((room_type_id, price.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "added {} `Price(id: {})` to `RoomType(id: {room_type_id})`",
            price.kind,
            price.id,
        );

        Ok(price)
    }
}

/// Error of [`CreateRoomPrice`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Price`] would stop being effective before it starts.
    #[display("`Price` effective period ends before it starts")]
    InvalidPeriod,

    /// [`RoomType`] with the provided ID does not exist.
    #[display("`RoomType(id: {_0})` does not exist")]
    #[from(ignore)]
    RoomTypeNotExists(#[error(not(source))] room_type::Id),
}

#[cfg(test)]
mod spec {
    use common::{Date, Money};
    use time::macros::date;

    use crate::{
        domain::room_type::{self, price},
        infra::database::mock::{self, Mock},
        Command as _,
    };

    use super::{CreateRoomPrice, ExecutionError};

    fn promotion(
        room_type_id: room_type::Id,
        from: time::Date,
        to: time::Date,
    ) -> CreateRoomPrice {
        CreateRoomPrice {
            room_type_id,
            kind: price::Kind::Promotion,
            weekday: Money::new(800).unwrap(),
            weekend: Money::new(1000).unwrap(),
            promotion_name: price::PromotionName::new("Summer sale"),
            effective_from: from.into(),
            effective_to: Some(to.into()),
        }
    }

    #[tokio::test]
    async fn adds_promotion_to_room_type() {
        let db = Mock::default();
        let rt = mock::room_type("DLX", &[(price::Kind::Standard, 1000)]);
        let id = rt.id;
        db.seed_room_type(rt);
        let svc = mock::service(db.clone());

        let created = svc
            .execute(promotion(id, date!(2024 - 06 - 01), date!(2024 - 06 - 30)))
            .await
            .unwrap();

        let stored = db.room_types()[0].clone();
        assert_eq!(stored.prices.len(), 2);
        assert_eq!(stored.prices[1].id, created.id);
        assert!(created.is_effective_on(Date::from(date!(2024 - 06 - 30))));
        assert!(!created.is_effective_on(Date::from(date!(2024 - 07 - 01))));
    }

    #[tokio::test]
    async fn allows_single_day_period() {
        let db = Mock::default();
        let rt = mock::room_type("DLX", &[(price::Kind::Standard, 1000)]);
        let id = rt.id;
        db.seed_room_type(rt);
        let svc = mock::service(db);

        assert!(svc
            .execute(promotion(id, date!(2024 - 06 - 01), date!(2024 - 06 - 01)))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn rejects_inverted_period() {
        let db = Mock::default();
        let svc = mock::service(db.clone());

        let err = svc
            .execute(promotion(
                room_type::Id::new(),
                date!(2024 - 06 - 30),
                date!(2024 - 06 - 01),
            ))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::InvalidPeriod));
        assert_eq!(db.calls(), 0);
    }

    #[tokio::test]
    async fn rejects_unknown_room_type() {
        let svc = mock::service(Mock::default());

        let err = svc
            .execute(promotion(
                room_type::Id::new(),
                date!(2024 - 06 - 01),
                date!(2024 - 06 - 30),
            ))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::RoomTypeNotExists(_)));
    }
}

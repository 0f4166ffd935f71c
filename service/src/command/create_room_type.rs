//! [`Command`] for creating a new [`RoomType`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Date, DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::room_type::{Code, Description, Name};
use crate::{
    domain::{
        room_type::{self, price, Price},
        Room, RoomType,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// Name of the unique constraint on [`RoomType`] codes.
const CODE_CONSTRAINT: &str = "room_types_code_key";

/// [`Command`] for creating a new [`RoomType`] along with its [`Room`]s and
/// [`price::Kind::Standard`] [`Price`] effective from today.
#[derive(Clone, Debug)]
pub struct CreateRoomType {
    /// [`Name`] of a new [`RoomType`].
    pub name: room_type::Name,

    /// [`Code`] of a new [`RoomType`].
    pub code: room_type::Code,

    /// [`Description`] of a new [`RoomType`], if any.
    pub description: Option<room_type::Description>,

    /// Number of [`Room`]s to create.
    pub quantity: u16,

    /// Standard weekday night amount.
    pub weekday: Money,

    /// Standard weekend night amount.
    pub weekend: Money,
}

impl<Db> Command<CreateRoomType> for Service<Db>
where
    Db: for<'c> Database<
            Select<By<Option<RoomType>, &'c room_type::Code>>,
            Ok = Option<RoomType>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<RoomType>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = RoomType;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateRoomType,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRoomType {
            name,
            code,
            description,
            quantity,
            weekday,
            weekend,
        } = cmd;

        let existing = self
            .database()
            .execute(Select(By::new(&code)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::CodeOccupied(code)));
        }

        let room_type = RoomType {
            id: room_type::Id::new(),
            rooms: (1..=usize::from(quantity))
                .map(|n| Room::numbered(&code, n))
                .collect(),
            prices: vec![Price {
                id: price::Id::new(),
                kind: price::Kind::Standard,
                weekday,
                weekend,
                promotion_name: None,
                effective_from: Date::today().coerce(),
                effective_to: None,
            }],
            name,
            code,
            description,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Err(e) = tx.execute(Insert(room_type.clone())).await {
            return Err(if e.as_ref().is_unique_violation(CODE_CONSTRAINT) {
                tracerr::new!(E::CodeOccupied(room_type.code))
            } else {
                (tracerr::map_from_and_wrap!(=> E))(e)
            });
        }
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "created `RoomType(id: {})` with {} rooms",
            room_type.id,
            room_type.rooms.len(),
        );

        Ok(room_type)
    }
}

/// Error of [`CreateRoomType`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`room_type::Code`] is already occupied by another [`RoomType`].
    #[display("`{_0}` code is occupied")]
    #[from(ignore)]
    CodeOccupied(#[error(not(source))] room_type::Code),
}

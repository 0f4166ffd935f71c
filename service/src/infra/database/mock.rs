//! In-memory [`Database`] double for exercising use cases.

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::Duration,
};

use common::{
    operations::{By, Commit, Insert, Select, Transact},
    DateTime, Money,
};
use time::macros::date;
use tracerr::Traced;

use crate::{
    domain::{
        booking,
        room_type::{self, price, Price},
        user, Room, RoomType, User,
    },
    infra::{database, postgres, Database},
    Config, Service,
};

/// In-memory [`Database`] counting its calls.
#[derive(Clone, Debug, Default)]
pub(crate) struct Mock(Arc<State>);

/// Shared state of a [`Mock`].
#[derive(Debug, Default)]
pub(crate) struct State {
    /// Stored [`RoomType`]s with all their [`Price`]s.
    room_types: Mutex<Vec<RoomType>>,

    /// Stored [`User`]s.
    users: Mutex<Vec<User>>,

    /// Indicator whether every operation fails.
    failing: AtomicBool,

    /// Number of executed operations.
    calls: AtomicUsize,
}

impl Mock {
    /// Stores the provided [`RoomType`] bypassing the call counter.
    pub(crate) fn seed_room_type(&self, room_type: RoomType) {
        self.room_types().push(room_type);
    }

    /// Stores the provided [`User`] bypassing the call counter.
    pub(crate) fn seed_user(&self, user: User) {
        self.users().push(user);
    }

    /// Makes every following operation fail.
    pub(crate) fn fail(&self) {
        self.0.failing.store(true, Ordering::SeqCst);
    }

    /// Returns the number of executed operations.
    pub(crate) fn calls(&self) -> usize {
        self.0.calls.load(Ordering::SeqCst)
    }

    /// Returns the stored [`RoomType`]s.
    pub(crate) fn room_types(&self) -> MutexGuard<'_, Vec<RoomType>> {
        self.0.room_types.lock().unwrap()
    }

    /// Returns the stored [`User`]s.
    pub(crate) fn users(&self) -> MutexGuard<'_, Vec<User>> {
        self.0.users.lock().unwrap()
    }

    /// Registers an operation call, failing if required.
    fn call(&self) -> Result<(), Traced<database::Error>> {
        _ = self.0.calls.fetch_add(1, Ordering::SeqCst);
        if self.0.failing.load(Ordering::SeqCst) {
            return Err(tracerr::new!(database::Error::from(
                postgres::Error::PoolError(postgres::connection::PoolError::Closed),
            )));
        }
        Ok(())
    }

    /// Returns a copy of the provided [`RoomType`] with only the [`Price`]s
    /// effective on the provided date.
    fn effective(room_type: &RoomType, on: price::EffectiveOn) -> RoomType {
        let mut room_type = room_type.clone();
        room_type.prices.retain(|p| p.is_effective_on(on.0));
        room_type
    }
}

impl Database<Select<By<Vec<RoomType>, price::EffectiveOn>>> for Mock {
    type Ok = Vec<RoomType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<RoomType>, price::EffectiveOn>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call()?;
        let on = by.into_inner();
        let mut all = self
            .room_types()
            .iter()
            .map(|rt| Self::effective(rt, on))
            .collect::<Vec<_>>();
        all.sort_by(|a, b| a.name.to_string().cmp(&b.name.to_string()));
        Ok(all)
    }
}

impl Database<Select<By<Option<RoomType>, room_type::Id>>> for Mock {
    type Ok = Option<RoomType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<RoomType>, room_type::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call()?;
        let id = by.into_inner();
        Ok(self
            .room_types()
            .iter()
            .find(|rt| rt.id == id)
            .map(|rt| Self::effective(rt, price::EffectiveOn::today())))
    }
}

impl<'c> Database<Select<By<Option<RoomType>, &'c room_type::Code>>> for Mock {
    type Ok = Option<RoomType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<RoomType>, &'c room_type::Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call()?;
        let code = by.into_inner();
        Ok(self
            .room_types()
            .iter()
            .find(|rt| &rt.code == code)
            .map(|rt| Self::effective(rt, price::EffectiveOn::today())))
    }
}

impl Database<Insert<RoomType>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(room_type): Insert<RoomType>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call()?;
        self.room_types().push(room_type);
        Ok(())
    }
}

impl Database<Insert<(room_type::Id, Price)>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert((id, price)): Insert<(room_type::Id, Price)>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call()?;
        if let Some(rt) = self.room_types().iter_mut().find(|rt| rt.id == id) {
            rt.prices.push(price);
        }
        Ok(())
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for Mock {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call()?;
        let id = by.into_inner();
        Ok(self.users().iter().find(|u| u.id == id).cloned())
    }
}

impl<'e> Database<Select<By<Option<User>, &'e user::Email>>> for Mock {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'e user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call()?;
        let email = by.into_inner();
        Ok(self.users().iter().find(|u| &u.email == email).cloned())
    }
}

impl Database<Insert<User>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call()?;
        self.users().push(user);
        Ok(())
    }
}

impl Database<Transact> for Mock {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        self.call()?;
        Ok(self.clone())
    }
}

impl Database<Commit> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.call()
    }
}

/// Creates a new [`Service`] backed by the provided [`Mock`].
pub(crate) fn service(db: Mock) -> Service<Mock> {
    let config = Config {
        jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(b"test"),
        jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(b"test"),
        session_ttl: Duration::from_secs(30 * 60),
        booking: booking::Policy::default(),
    };
    Service::new(config, db)
}

/// Creates a new [`RoomType`] with the provided `code` and open-ended
/// [`Price`]s of the provided kinds and weekday amounts.
pub(crate) fn room_type(code: &str, prices: &[(price::Kind, i32)]) -> RoomType {
    let code = room_type::Code::new(code).unwrap();
    RoomType {
        id: room_type::Id::new(),
        name: room_type::Name::new(code.to_string()).unwrap(),
        description: None,
        prices: prices
            .iter()
            .map(|&(kind, weekday)| Price {
                id: price::Id::new(),
                kind,
                weekday: Money::new(weekday).unwrap(),
                weekend: Money::new(weekday + 200).unwrap(),
                promotion_name: None,
                effective_from: date!(2024 - 01 - 01).into(),
                effective_to: None,
            })
            .collect(),
        rooms: vec![Room::numbered(&code, 1)],
        code,
        created_at: DateTime::now().coerce(),
    }
}

/// Creates a new [`User`] with the provided `email`, `password` and
/// [`user::Role`].
pub(crate) fn user(email: &str, password: &str, role: user::Role) -> User {
    User {
        id: user::Id::new(),
        email: user::Email::new(email).unwrap(),
        name: user::Name::new("Jane Doe").unwrap(),
        password_hash: user::PasswordHash::new(
            &user::Password::new(password).unwrap(),
        )
        .unwrap(),
        role,
        created_at: DateTime::now().coerce(),
    }
}

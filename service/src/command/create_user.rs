//! [`Command`] for creating a new [`User`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::user::{Email, Name, Password, Role};
use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// Name of the unique constraint on [`User`] emails.
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// [`Command`] for creating a new [`User`].
#[derive(Clone, Debug)]
pub struct CreateUser {
    /// [`Email`] of a new [`User`].
    pub email: user::Email,

    /// [`Name`] of a new [`User`].
    pub name: user::Name,

    /// [`Password`] of a new [`User`].
    pub password: SecretBox<user::Password>,

    /// [`Role`] of a new [`User`].
    pub role: user::Role,
}

impl<Db> Command<CreateUser> for Service<Db>
where
    Db: for<'l> Database<
            Select<By<Option<User>, &'l user::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUser {
            email,
            name,
            password,
            role,
        } = cmd;

        let existing = self
            .database()
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::EmailOccupied(email)));
        }

        let password_hash = user::PasswordHash::new(password.expose_secret())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let user = User {
            id: user::Id::new(),
            email,
            name,
            password_hash,
            role,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Err(e) = tx.execute(Insert(user.clone())).await {
            // Concurrent registration may slip past the lookup above.
            return Err(if e.as_ref().is_unique_violation(EMAIL_CONSTRAINT) {
                tracerr::new!(E::EmailOccupied(user.email))
            } else {
                (tracerr::map_from_and_wrap!(=> E))(e)
            });
        }
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!("created `User(id: {})` with `{}` role", user.id, user.role);

        Ok(user)
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`user::Email`] is already occupied by another [`User`].
    #[display("`{_0}` email is occupied")]
    #[from(ignore)]
    EmailOccupied(#[error(not(source))] user::Email),

    /// [`Password`] hashing failed.
    #[display("Failed to hash `Password`: {_0}")]
    PasswordHashing(#[error(not(source))] argon2::password_hash::Error),
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{
        domain::user,
        infra::database::mock::{self, Mock},
        Command as _,
    };

    use super::{CreateUser, ExecutionError};

    fn cmd(email: &str) -> CreateUser {
        CreateUser {
            email: user::Email::new(email).unwrap(),
            name: user::Name::new("John Doe").unwrap(),
            password: SecretBox::new(Box::new(
                user::Password::new("correct horse").unwrap(),
            )),
            role: user::Role::Administrator,
        }
    }

    #[tokio::test]
    async fn stores_user_with_hashed_password() {
        let db = Mock::default();
        let svc = mock::service(db.clone());

        let created = svc.execute(cmd("admin@hotel.example")).await.unwrap();

        assert_eq!(created.role, user::Role::Administrator);
        assert!(created
            .password_hash
            .verify(&user::Password::new("correct horse").unwrap()));
        assert_eq!(db.users().len(), 1);
        assert_eq!(db.users()[0].id, created.id);
    }

    #[tokio::test]
    async fn rejects_occupied_email() {
        let db = Mock::default();
        db.seed_user(mock::user(
            "admin@hotel.example",
            "battery staple",
            user::Role::Guest,
        ));
        let svc = mock::service(db.clone());

        let err = svc.execute(cmd("Admin@Hotel.example")).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::EmailOccupied(_)));
        assert_eq!(db.users().len(), 1);
    }
}

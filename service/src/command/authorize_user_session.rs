//! [`Command`] for authorizing a [`User`] by a [`Session`] token.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use jsonwebtoken::{errors::ErrorKind, Validation};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`User`] by a [`Session`] token.
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`session::Token`] to authorize.
    pub token: session::Token,
}

/// Output of [`AuthorizeUserSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Decoded [`Session`].
    pub session: Session,

    /// [`User`] the [`Session`] belongs to.
    pub user: User,
}

impl<Db> Command<AuthorizeUserSession> for Service<Db>
where
    Db: Database<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        AuthorizeUserSession { token }: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let session = jsonwebtoken::decode::<Session>(
            token.as_ref(),
            &self.config().jwt_decoding_key,
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => E::Expired,
            _ => E::JsonWebTokenDecodeError(e),
        })
        .map_err(tracerr::wrap!())?
        .claims;

        let user = self
            .database()
            .execute(Select(By::new(session.user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| {
                log::debug!(
                    "`Session` refers to missing `User(id: {})`",
                    session.user_id,
                );
                E::UserNotExists(session.user_id)
            })
            .map_err(tracerr::wrap!())?;

        Ok(Output { session, user })
    }
}

/// Error of [`AuthorizeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Session`] has expired.
    #[display("`Session` has expired")]
    Expired,

    /// [`jsonwebtoken`] decoding error.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),

    /// [`User`] the [`Session`] belongs to does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{
        domain::user::{self, session, Session},
        infra::database::mock::{self, Mock},
        Command as _,
    };

    use super::{AuthorizeUserSession, ExecutionError};

    fn token(user_id: user::Id, expires_at: DateTime) -> session::Token {
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &Session {
                user_id,
                expires_at: expires_at.coerce(),
            },
            &jsonwebtoken::EncodingKey::from_secret(b"test"),
        )
        .unwrap();
        #[expect(unsafe_code, reason = "test")]
        unsafe {
            session::Token::new_unchecked(token)
        }
    }

    fn in_an_hour() -> DateTime {
        DateTime::now() + std::time::Duration::from_secs(3600)
    }

    #[tokio::test]
    async fn authorizes_existing_user() {
        let db = Mock::default();
        let owner =
            mock::user("owner@hotel.example", "correct horse", user::Role::Owner);
        let id = owner.id;
        db.seed_user(owner);
        let svc = mock::service(db);

        let out = svc
            .execute(AuthorizeUserSession {
                token: token(id, in_an_hour()),
            })
            .await
            .unwrap();

        assert_eq!(out.session.user_id, id);
        assert_eq!(out.user.role, user::Role::Owner);
    }

    #[tokio::test]
    async fn rejects_missing_user() {
        let svc = mock::service(Mock::default());

        let err = svc
            .execute(AuthorizeUserSession {
                token: token(user::Id::new(), in_an_hour()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::UserNotExists(_)));
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let db = Mock::default();
        let guest =
            mock::user("guest@hotel.example", "correct horse", user::Role::Guest);
        let id = guest.id;
        db.seed_user(guest);
        let svc = mock::service(db.clone());

        let err = svc
            .execute(AuthorizeUserSession {
                token: token(id, DateTime::from_rfc3339("2020-01-01T00:00:00Z").unwrap()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Expired));
        assert_eq!(db.calls(), 0);
    }

    #[tokio::test]
    async fn rejects_foreign_signature() {
        let svc = mock::service(Mock::default());
        let forged = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &Session {
                user_id: user::Id::new(),
                expires_at: in_an_hour().coerce(),
            },
            &jsonwebtoken::EncodingKey::from_secret(b"forged"),
        )
        .unwrap();

        let err = svc
            .execute(AuthorizeUserSession {
                token: forged.parse().unwrap(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
    }
}

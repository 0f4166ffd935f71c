//! Bootstrapping of the first hotel owner.

use derive_more::{Display, Error};
use secrecy::{ExposeSecret as _, SecretBox};
use service::{
    command::{self, create_user, Command},
    domain::user,
};
use tracerr::Traced;
use tracing as log;

use crate::config;

/// Creates the configured [`user::Role::Owner`] unless a user with the same
/// email exists already.
///
/// # Errors
///
/// If the configured [`config::Owner`] is invalid, or creating it fails.
pub async fn ensure_owner<S>(
    service: &S,
    owner: &config::Owner,
) -> Result<(), BootstrapError>
where
    S: Command<command::CreateUser, Err = Traced<create_user::ExecutionError>>,
{
    use BootstrapError as E;

    let email =
        user::Email::new(owner.email.as_str()).ok_or(E::InvalidEmail)?;
    let name = user::Name::new(owner.name.as_str()).ok_or(E::InvalidName)?;
    let password = user::Password::new(owner.password.expose_secret())
        .ok_or(E::InvalidPassword)?;

    match service
        .execute(command::CreateUser {
            email: email.clone(),
            name,
            password: SecretBox::new(Box::new(password)),
            role: user::Role::Owner,
        })
        .await
    {
        Ok(_) => {
            log::info!("bootstrapped hotel owner `{email}`");
            Ok(())
        }
        Err(e) => match e.as_ref() {
            create_user::ExecutionError::EmailOccupied(_) => {
                log::debug!("hotel owner `{email}` exists already");
                Ok(())
            }
            create_user::ExecutionError::Db(_)
            | create_user::ExecutionError::PasswordHashing(_) => {
                Err(E::CreateUser(e))
            }
        },
    }
}

/// Error of [`ensure_owner()`].
#[derive(Debug, Display, Error)]
pub enum BootstrapError {
    /// Configured email is not a valid [`user::Email`].
    #[display("owner email is invalid")]
    InvalidEmail,

    /// Configured name is not a valid [`user::Name`].
    #[display("owner name is invalid")]
    InvalidName,

    /// Configured password is not a valid [`user::Password`].
    #[display("owner password must be 8 to 128 characters long")]
    InvalidPassword,

    /// [`command::CreateUser`] failed.
    #[display("failed to create owner: {_0}")]
    CreateUser(Traced<create_user::ExecutionError>),
}

//! [`User`] definitions.

pub mod session;

use std::sync::LazyLock;

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHasher as _, PasswordVerifier as _,
        SaltString,
    },
    Argon2,
};
#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use self::session::Session;

/// Hotel user, either a guest or a staff member.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`]
    pub id: Id,

    /// [`Email`] of this [`User`], used as a login.
    pub email: Email,

    /// [`Name`] of this [`User`].
    pub name: Name,

    /// [`PasswordHash`] of this [`User`].
    pub password_hash: PasswordHash,

    /// [`Role`] of this [`User`].
    pub role: Role,

    /// [`DateTime`] when this [`User`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`User`].
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

/// Name of a [`User`].
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
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Password of a [`User`].
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        let password = password.as_ref();
        password.len() >= 8 && password.len() <= 128
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// [Argon2] hash of a [`User`]'s [`Password`] in a [PHC string format].
///
/// [Argon2]: https://wikipedia.org/wiki/Argon2
/// [PHC string format]: https://tinyurl.com/phc-string-format
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hashes the given [`Password`] with a random salt.
    ///
    /// # Errors
    ///
    /// If [`Argon2`] fails to hash the [`Password`].
    pub fn new(password: &Password) -> Result<Self, password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.0.as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
    }

    /// Returns a [`PasswordHash`] of a random [`Password`] nobody knows.
    ///
    /// Verifying against it costs the same as against a real one, so callers
    /// use it when no [`User`] is found. [`None`] if hashing failed.
    #[must_use]
    pub fn unmatchable() -> Option<&'static Self> {
        /// Lazily computed [`PasswordHash::unmatchable()`].
        static HASH: LazyLock<Option<PasswordHash>> = LazyLock::new(|| {
            let password =
                Password(SaltString::generate(&mut OsRng).as_str().to_owned());
            PasswordHash::new(&password).ok()
        });

        HASH.as_ref()
    }

    /// Verifies whether the given [`Password`] matches this [`PasswordHash`].
    ///
    /// Malformed [`PasswordHash`] matches nothing.
    #[must_use]
    pub fn verify(&self, password: &Password) -> bool {
        password_hash::PasswordHash::new(&self.0).is_ok_and(|hash| {
            Argon2::default()
                .verify_password(password.0.as_bytes(), &hash)
                .is_ok()
        })
    }
}

/// Email address of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    ///
    /// The `address` is lowercased, so the same mailbox always maps to the
    /// same [`User`].
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into().to_lowercase();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 255 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

define_kind! {
    #[doc = "Role of a [`User`]."]
    enum Role {
        #[doc = "Owner of the hotel."]
        Owner = 1,

        #[doc = "Staff member managing the hotel."]
        Administrator = 2,

        #[doc = "Registered loyal guest."]
        Member = 3,

        #[doc = "Regular guest."]
        Guest = 4,
    }
}

impl Role {
    /// Indicates whether this [`Role`] grants access to the hotel
    /// administration.
    #[must_use]
    pub const fn is_administrative(self) -> bool {
        matches!(self, Self::Owner | Self::Administrator)
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Guest
    }
}

/// [`DateTime`] when a [`User`] was created.
pub type CreationDateTime = DateTimeOf<(User, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Email, Password, PasswordHash, Role};

    #[test]
    fn password_hash_verifies_only_original_password() {
        let password = Password::new("correct horse").unwrap();
        let hash = PasswordHash::new(&password).unwrap();

        assert!(hash.to_string().starts_with("$argon2"));
        assert!(hash.verify(&password));
        assert!(!hash.verify(&Password::new("battery staple").unwrap()));
    }

    #[test]
    fn password_hash_is_salted() {
        let password = Password::new("correct horse").unwrap();

        assert_ne!(
            PasswordHash::new(&password).unwrap(),
            PasswordHash::new(&password).unwrap(),
        );
    }

    #[test]
    fn unmatchable_hash_is_real_and_shared() {
        let hash = PasswordHash::unmatchable().unwrap();

        assert!(hash.to_string().starts_with("$argon2"));
        assert!(!hash.verify(&Password::new("correct horse").unwrap()));
        assert!(std::ptr::eq(hash, PasswordHash::unmatchable().unwrap()));
    }

    #[test]
    fn malformed_hash_verifies_nothing() {
        let hash = PasswordHash("correct horse".to_owned());

        assert!(!hash.verify(&Password::new("correct horse").unwrap()));
    }

    #[test]
    fn email_is_lowercased() {
        assert_eq!(
            Email::new("Guest@Hotel.Example").unwrap().to_string(),
            "guest@hotel.example",
        );

        assert!(Email::new("guest").is_none());
        assert!(Email::new("guest@hotel").is_none());
        assert!(Email::new("gu est@hotel.example").is_none());
    }

    #[test]
    fn administrative_roles() {
        assert!(Role::Owner.is_administrative());
        assert!(Role::Administrator.is_administrative());
        assert!(!Role::Member.is_administrative());
        assert!(!Role::default().is_administrative());
        assert_eq!(Role::default(), Role::Guest);
    }
}

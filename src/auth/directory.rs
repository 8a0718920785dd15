//! Principal directory
//!
//! Resolves a login identifier (email) to exactly one principal. Two
//! independent credential tables back the directory: standard users and
//! technicians. The users table is tried first; emails are required to be
//! globally unique across both tables, an invariant enforced at account
//! creation, not here.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::infrastructure::database::entities::{technician, user, user::UserRole};

/// An authenticated identity: standard user or technician.
///
/// The auth core only ever reads principal records; it never mutates them.
#[derive(Clone, Debug)]
pub enum Principal {
    User(user::Model),
    Technician(technician::Model),
}

impl Principal {
    /// The login identifier (email)
    pub fn email(&self) -> &str {
        match self {
            Self::User(u) => &u.email,
            Self::Technician(t) => &t.email,
        }
    }

    /// The stored bcrypt digest
    pub fn password_hash(&self) -> &str {
        match self {
            Self::User(u) => &u.password_hash,
            Self::Technician(t) => &t.password_hash,
        }
    }

    pub fn role(&self) -> UserRole {
        match self {
            Self::User(u) => u.role.clone(),
            Self::Technician(t) => t.role.clone(),
        }
    }

    /// Only standard users can be banned; technicians have no such flag.
    pub fn is_banned(&self) -> bool {
        match self {
            Self::User(u) => u.banned,
            Self::Technician(_) => false,
        }
    }
}

/// Email-keyed lookup across both principal tables
#[derive(Clone)]
pub struct PrincipalDirectory {
    db: DatabaseConnection,
}

impl PrincipalDirectory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Find a principal by email: users first, then technicians.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Principal>, DbErr> {
        if let Some(found) = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
        {
            return Ok(Some(Principal::User(found)));
        }

        let technician = technician::Entity::find()
            .filter(technician::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(technician.map(Principal::Technician))
    }
}

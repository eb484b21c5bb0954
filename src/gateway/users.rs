use chrono::{Duration, Utc};
use uuid::Uuid;

use super::Gateway;
use super::validate::validate_email;
use crate::auth::{SessionTokens, hash_password, token_lookup, verify_password};
use crate::error::{Error, Result};
use crate::types::{Role, Session, User, UserUpdate};

const MAX_TOKEN_RETRIES: u32 = 3;

/// A freshly created session together with the raw bearer token, which is
/// not recoverable afterwards.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session: Session,
    pub user: User,
}

impl Gateway {
    /// The back-office account. Only one is modeled.
    pub async fn get_user(&self) -> Result<User> {
        self.run(|store| store.first_user()?.ok_or(Error::NotFound))
            .await
    }

    pub async fn update_user(&self, update: UserUpdate) -> Result<User> {
        if let Some(email) = &update.email {
            validate_email(email.trim())?;
        }

        self.run(move |store| {
            let mut user = store.first_user()?.ok_or(Error::NotFound)?;

            if let Some(email) = update.email {
                user.email = email.trim().to_string();
            }
            if let Some(password) = update.password {
                user.password_hash = hash_password(&password)?;
            }
            if let Some(role) = update.role {
                // The only back-office account must stay an admin.
                if user.role.is_admin() && !role.is_admin() {
                    return Err(Error::BadRequest(
                        "The admin account cannot be demoted".into(),
                    ));
                }
                user.role = role;
            }

            store.update_user(&user)?;
            Ok(user)
        })
        .await
    }

    /// Creates the admin account on an empty store.
    pub async fn seed_admin(&self, email: String, password: String) -> Result<User> {
        validate_email(email.trim())?;

        self.run(move |store| {
            if store.first_user()?.is_some() {
                return Err(Error::Conflict("An account already exists".into()));
            }
            store.create_user(&User {
                id: 0,
                email: email.trim().to_string(),
                password_hash: hash_password(&password)?,
                role: Role::Admin,
            })
        })
        .await
    }

    /// Checks the credentials and, when they match, opens a session that
    /// expires after `ttl`.
    pub async fn login(
        &self,
        email: String,
        password: String,
        ttl: Duration,
    ) -> Result<IssuedSession> {
        self.run(move |store| {
            let user = store
                .get_user_by_email(email.trim())?
                .ok_or(Error::Unauthorized)?;
            if !verify_password(&password, &user.password_hash) {
                return Err(Error::Unauthorized);
            }

            let tokens = SessionTokens::new();
            for _ in 0..MAX_TOKEN_RETRIES {
                let issued = tokens.issue()?;
                let now = Utc::now();
                let session = Session {
                    id: Uuid::new_v4().to_string(),
                    user_id: user.id,
                    token_hash: issued.hash,
                    token_lookup: issued.lookup,
                    created_at: now,
                    expires_at: now + ttl,
                };

                match store.create_session(&session) {
                    Ok(()) => {
                        return Ok(IssuedSession {
                            token: issued.raw,
                            session,
                            user,
                        });
                    }
                    Err(Error::TokenLookupCollision) => continue,
                    Err(e) => return Err(e),
                }
            }

            Err(Error::TokenLookupCollision)
        })
        .await
    }

    /// Resolves a bearer token to its live session and user.
    pub async fn resolve_session(&self, raw_token: String) -> Result<(Session, User)> {
        let lookup = token_lookup(&raw_token)?.to_string();

        self.run(move |store| {
            let session = store
                .get_session_by_lookup(&lookup)?
                .ok_or(Error::Unauthorized)?;

            if !SessionTokens::new().verify(&raw_token, &session.token_hash)? {
                return Err(Error::Unauthorized);
            }

            if session.is_expired(Utc::now()) {
                if let Err(e) = store.delete_session(&session.id) {
                    tracing::warn!("Failed to remove expired session: {e}");
                }
                return Err(Error::TokenExpired);
            }

            let user = store
                .get_user(session.user_id)?
                .ok_or(Error::Unauthorized)?;
            Ok((session, user))
        })
        .await
    }

    pub async fn revoke_session(&self, id: String) -> Result<()> {
        self.run(move |store| store.delete_session(&id).map(|_| ()))
            .await
    }
}

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::Utc;
use rand::rngs::OsRng;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, users};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Register a new account.
    ///
    /// Stores only the argon2 hash of the password. Shape checks mirror the
    /// signup form: username 3 to 20 chars, password at least 8, email must
    /// look like an address.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ResultEngine<users::Model> {
        let username = normalize_required_text(username, "username")?;
        if username.len() < 3 || username.len() > 20 {
            return Err(EngineError::Validation(
                "username must be between 3 and 20 characters".to_string(),
            ));
        }
        let email = normalize_required_text(email, "email")?.to_ascii_lowercase();
        if !email.contains('@') {
            return Err(EngineError::Validation(format!(
                "invalid email address: {email}"
            )));
        }
        if password.len() < 8 {
            return Err(EngineError::Validation(
                "password must be at least 8 characters".to_string(),
            ));
        }
        let password_hash = hash_password(password)?;

        with_tx!(self, |db_tx| {
            let email_taken = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if email_taken {
                return Err(EngineError::Conflict(email));
            }

            let username_taken = users::Entity::find()
                .filter(users::Column::Username.eq(username.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if username_taken {
                return Err(EngineError::Conflict(username));
            }

            let user = users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                email: ActiveValue::Set(email.clone()),
                password_hash: ActiveValue::Set(password_hash.clone()),
                created_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            Ok(user)
        })
    }

    /// Verify credentials and return the matching user.
    ///
    /// The error never says whether the email or the password was wrong.
    pub async fn authenticate(&self, email: &str, password: &str) -> ResultEngine<users::Model> {
        let invalid = || EngineError::Unauthorized("invalid credentials".to_string());

        let email = email.trim().to_ascii_lowercase();
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.database)
            .await?
            .ok_or_else(invalid)?;

        let parsed = PasswordHash::new(&user.password_hash).map_err(|_| invalid())?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| invalid())?;

        Ok(user)
    }

    /// All users except `excluding`, for the participant picker.
    pub async fn list_users(&self, excluding: i32) -> ResultEngine<Vec<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Id.ne(excluding))
            .order_by_asc(users::Column::Username)
            .all(&self.database)
            .await
            .map_err(Into::into)
    }
}

fn hash_password(password: &str) -> ResultEngine<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| EngineError::Validation(format!("failed to hash password: {err}")))
}

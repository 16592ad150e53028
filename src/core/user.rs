//! User business logic - Registration, login and account administration.
//!
//! New accounts start unapproved. Clients cannot log in until an administrator
//! approves them; administrators are never held back by the approval flag.
//! Every administrative operation is gated by the access policy before it
//! touches the store.

use crate::{
    auth::{Identity, TokenService, approval, password, require_role},
    config::AdminSeed,
    entities::{Order, Role, User, order, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, SqlErr, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Registration input
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name, at least 3 characters
    pub name: String,
    /// Login email, stored trimmed and lower-cased
    pub email: String,
    /// Plain-text password, at least 6 characters
    pub password: String,
    /// Requested role
    pub role: Role,
}

/// Public view of an account, without the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    /// User ID
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Account role
    pub role: Role,
    /// Whether an administrator has approved the account
    pub approved: bool,
}

impl From<user::Model> for UserSummary {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            approved: model.approved,
        }
    }
}

/// Result of a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    /// Signed access token, valid for one hour
    pub token: String,
    /// Role embedded in the token
    pub role: Role,
    /// Authenticated user's ID
    pub user_id: i64,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_new_user(new_user: &NewUser) -> Result<()> {
    if new_user.name.trim().chars().count() < 3 {
        return Err(Error::validation("Name must be at least 3 characters"));
    }
    let email = new_user.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::validation("Email is not valid"));
    }
    if new_user.password.chars().count() < 6 {
        return Err(Error::validation("Password must be at least 6 characters"));
    }
    Ok(())
}

/// Finds an account by its login email.
pub async fn find_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(normalize_email(email)))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Registers a new, unapproved account.
///
/// # Errors
/// Returns an error if:
/// - The name, email or password fail validation
/// - The email is already registered
/// - Hashing or the database insert fails
#[instrument(skip(db, new_user), fields(email = %new_user.email, role = %new_user.role))]
pub async fn register(db: &DatabaseConnection, new_user: NewUser) -> Result<UserSummary> {
    validate_new_user(&new_user)?;
    let email = normalize_email(&new_user.email);

    if find_user_by_email(db, &email).await?.is_some() {
        return Err(Error::EmailTaken { email });
    }

    let password_hash = password::hash_password(&new_user.password)?;
    let account = user::ActiveModel {
        name: Set(new_user.name.trim().to_string()),
        email: Set(email.clone()),
        password_hash: Set(password_hash),
        role: Set(new_user.role),
        approved: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    // The unique index still catches a concurrent registration of the same email.
    let created = account.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::EmailTaken {
            email: email.clone(),
        },
        _ => Error::Database(e),
    })?;

    info!(user_id = created.id, "User registered, waiting approval");
    Ok(created.into())
}

/// Authenticates by email and password and issues an access token.
///
/// # Errors
/// - [`Error::InvalidCredentials`] for an unknown email or wrong password
/// - [`Error::PendingApproval`] for a client that has not been approved
#[instrument(skip(db, tokens, password))]
pub async fn login(
    db: &DatabaseConnection,
    tokens: &TokenService,
    email: &str,
    password: &str,
) -> Result<LoginOutcome> {
    let Some(account) = find_user_by_email(db, email).await? else {
        password::verify_placeholder(password);
        warn!("login_failed: unknown email");
        return Err(Error::InvalidCredentials);
    };

    if !password::verify_password(password, &account.password_hash)? {
        warn!(user_id = account.id, "login_failed: wrong password");
        return Err(Error::InvalidCredentials);
    }

    approval::ensure_can_authenticate(&account).inspect_err(|_| {
        warn!(user_id = account.id, "login_blocked: pending approval");
    })?;

    let identity = Identity::new(account.id, account.role);
    let token = tokens.issue(&identity)?;

    info!(user_id = account.id, role = %account.role, "User logged in");
    Ok(LoginOutcome {
        token,
        role: account.role,
        user_id: account.id,
    })
}

async fn find_user(db: &DatabaseConnection, user_id: i64) -> Result<user::Model> {
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            resource: "User",
            id: user_id,
        })
}

/// Lists every account, ordered by id. Admin only.
pub async fn list_users(db: &DatabaseConnection, identity: &Identity) -> Result<Vec<UserSummary>> {
    require_role(identity, &[Role::Admin])?;

    let users = User::find().order_by_asc(user::Column::Id).all(db).await?;
    Ok(users.into_iter().map(UserSummary::from).collect())
}

/// Fetches one account. Admin only.
pub async fn get_user(
    db: &DatabaseConnection,
    identity: &Identity,
    user_id: i64,
) -> Result<UserSummary> {
    require_role(identity, &[Role::Admin])?;
    find_user(db, user_id).await.map(UserSummary::from)
}

/// Marks an account as approved so a client can log in. Admin only.
///
/// Approving an already approved account is a no-op overwrite.
#[instrument(skip(db))]
pub async fn approve_user(
    db: &DatabaseConnection,
    identity: &Identity,
    user_id: i64,
) -> Result<UserSummary> {
    require_role(identity, &[Role::Admin])?;

    let mut account: user::ActiveModel = find_user(db, user_id).await?.into();
    account.approved = Set(true);
    let approved = account.update(db).await?;

    info!(user_id, approved_by = identity.id(), "User approved");
    Ok(approved.into())
}

/// Permanently removes an account together with the orders it owns. Admin only.
#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, identity: &Identity, user_id: i64) -> Result<()> {
    require_role(identity, &[Role::Admin])?;

    let txn = db.begin().await?;

    let removed_orders = Order::delete_many()
        .filter(order::Column::ClientId.eq(user_id))
        .exec(&txn)
        .await?
        .rows_affected;

    let result = User::delete_by_id(user_id).exec(&txn).await?;
    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Err(Error::NotFound {
            resource: "User",
            id: user_id,
        });
    }

    txn.commit().await?;

    info!(user_id, removed_orders, deleted_by = identity.id(), "User deleted");
    Ok(())
}

/// Creates the configured administrator if no account uses its email yet.
///
/// Returns `true` when an account was created.
#[instrument(skip(db, seed), fields(email = %seed.email))]
pub async fn seed_bootstrap_admin(db: &DatabaseConnection, seed: &AdminSeed) -> Result<bool> {
    let email = normalize_email(&seed.email);
    if find_user_by_email(db, &email).await?.is_some() {
        return Ok(false);
    }

    validate_new_user(&NewUser {
        name: seed.name.clone(),
        email: email.clone(),
        password: seed.password.clone(),
        role: Role::Admin,
    })?;

    let account = user::ActiveModel {
        name: Set(seed.name.trim().to_string()),
        email: Set(email),
        password_hash: Set(password::hash_password(&seed.password)?),
        role: Set(Role::Admin),
        approved: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = account.insert(db).await?;

    info!(user_id = created.id, "Bootstrap administrator created");
    Ok(true)
}

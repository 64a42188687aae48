use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, warn};

use crate::{
    auth::{
        dto::RegisterRequest,
        password::{hash_password, verify_password},
        repo::AccountRepo,
        repo_types::{Account, AccountKind},
    },
    config::AdminSeed,
    error::AppError,
};

const USERNAME_MAX_CHARS: usize = 49;
const PASSWORD_MIN_CHARS: usize = 8;
const PASSWORD_MAX_CHARS: usize = 15;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username must not be empty.".into());
    }
    if username.chars().count() > USERNAME_MAX_CHARS {
        return Err(format!(
            "Username must be at most {USERNAME_MAX_CHARS} characters."
        ));
    }
    if username.chars().any(char::is_whitespace) {
        return Err("Username must not contain spaces.".into());
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<(), String> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&len) {
        return Err(format!(
            "Password must be between {PASSWORD_MIN_CHARS} and {PASSWORD_MAX_CHARS} characters."
        ));
    }
    let lower = password.chars().any(|c| c.is_lowercase());
    let upper = password.chars().any(|c| c.is_uppercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    let special = password.chars().any(|c| !c.is_alphanumeric());
    if !(lower && upper && digit && special) {
        return Err("Password must contain at least one lowercase letter, one uppercase letter, one number, and one special character.".into());
    }
    Ok(())
}

/// Normalizes and validates a registration payload in place.
pub(crate) fn validate_registration(req: &mut RegisterRequest) -> Result<(), AppError> {
    req.username = req.username.trim().to_string();
    req.email = req.email.trim().to_lowercase();

    validate_username(&req.username).map_err(AppError::BadRequest)?;
    if !is_valid_email(&req.email) {
        return Err(AppError::BadRequest("Invalid email".into()));
    }
    validate_password(&req.password).map_err(AppError::BadRequest)?;
    Ok(())
}

pub async fn register_user(
    repo: &dyn AccountRepo,
    mut req: RegisterRequest,
) -> Result<Account, AppError> {
    if let Err(e) = validate_registration(&mut req) {
        warn!(username = %req.username, error = %e, "registration rejected");
        return Err(e);
    }

    let hash = hash_password(&req.password)?;
    match repo
        .create(AccountKind::User, &req.username, &req.email, &hash)
        .await?
    {
        Some(user) => {
            info!(user_id = user.id, username = %user.username, "user registered");
            Ok(user)
        }
        None => {
            warn!(username = %req.username, email = %req.email, "username or email taken");
            Err(AppError::Conflict("Username or email already registered".into()))
        }
    }
}

/// Looks up `identifier` in the table for `kind` and checks the password.
/// Unknown identifiers and wrong passwords yield the same error.
pub async fn authenticate(
    repo: &dyn AccountRepo,
    kind: AccountKind,
    identifier: &str,
    password: &str,
) -> Result<Account, AppError> {
    let identifier = identifier.trim();
    let invalid = || {
        AppError::Unauthorized(match kind {
            AccountKind::User => "Invalid credentials".into(),
            AccountKind::Admin => "Invalid admin credentials".into(),
        })
    };

    let account = match repo.find(kind, identifier).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            warn!(identifier = %identifier, ?kind, "login unknown identifier");
            return Err(invalid());
        }
        Err(e) => {
            error!(error = %e, "account lookup failed");
            return Err(AppError::Internal(e));
        }
    };

    let ok = match verify_password(password, &account.password_hash) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, account_id = account.id, "verify_password failed");
            return Err(AppError::Internal(e));
        }
    };
    if !ok {
        warn!(account_id = account.id, ?kind, "login invalid password");
        return Err(invalid());
    }
    Ok(account)
}

/// Creates the configured admin unless its username or email already exists.
pub async fn ensure_admin(repo: &dyn AccountRepo, seed: &AdminSeed) -> anyhow::Result<()> {
    let hash = hash_password(&seed.password)?;
    match repo
        .create(AccountKind::Admin, &seed.username, &seed.email, &hash)
        .await?
    {
        Some(admin) => info!(admin_id = admin.id, username = %admin.username, "admin created"),
        None => info!(username = %seed.username, "admin already exists"),
    }
    Ok(())
}

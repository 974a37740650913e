use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors from the hosted record store. `AuthRequired` is the one variant
/// with a global policy attached: the caller at the top of the app tears
/// down the session and routes back to login. Everything else is handled
/// where it occurs.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("authentication required")]
    AuthRequired,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store rejected the request ({status} {kind}): {message}")]
    Api {
        status: u16,
        kind: String,
        message: String,
    },

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl StoreError {
    pub fn is_auth_required(&self) -> bool {
        matches!(self, StoreError::AuthRequired)
    }
}

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::models::User;

/// The single persisted session slot: the signed-in user, or nothing.
///
/// The slot is an explicit context object owned by the application state and
/// handed to whichever screen needs it; there is no ambient global. Every
/// change is written through to one JSON file, and the presence of that file
/// is the sole authentication signal checked at startup.
pub struct Session {
    path: PathBuf,
    current: Option<User>,
}

impl Session {
    /// Rehydrates the session from disk. A missing or unreadable file means
    /// signed out; a corrupt one is discarded with a warning.
    pub fn load(path: PathBuf) -> Self {
        let current = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    log::warn!("discarding corrupt session file {}: {err}", path.display());
                    None
                }
            },
            Err(_) => None,
        };
        Self { path, current }
    }

    pub fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// Installs a user as the current session and persists it.
    pub fn sign_in(&mut self, user: User) -> Result<()> {
        self.current = Some(user);
        self.persist()
    }

    /// Replaces the stored user after a profile update.
    pub fn replace(&mut self, user: User) -> Result<()> {
        self.sign_in(user)
    }

    /// Clears the slot and removes the file.
    pub fn sign_out(&mut self) -> Result<()> {
        self.current = None;
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("removing session file {}", self.path.display()))?;
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let Some(user) = &self.current else {
            return Ok(());
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating session directory {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(user)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("writing session file {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: "recU1".into(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            subscription_plan: "free".into(),
            is_active: true,
            company_name: String::new(),
            activity: String::new(),
            description: String::new(),
            b2b2c: String::new(),
        }
    }

    fn temp_session_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("lead-manager-test-{name}-{}", std::process::id()))
            .join("session.json")
    }

    #[test]
    fn sign_in_persists_and_reloads() {
        let path = temp_session_path("roundtrip");
        let mut session = Session::load(path.clone());
        assert!(!session.is_signed_in());

        session.sign_in(sample_user()).unwrap();
        let reloaded = Session::load(path.clone());
        assert_eq!(reloaded.current().unwrap().id, "recU1");

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn sign_out_removes_the_file() {
        let path = temp_session_path("signout");
        let mut session = Session::load(path.clone());
        session.sign_in(sample_user()).unwrap();
        assert!(path.exists());

        session.sign_out().unwrap();
        assert!(!path.exists());
        assert!(!session.is_signed_in());

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn corrupt_file_degrades_to_signed_out() {
        let path = temp_session_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let session = Session::load(path.clone());
        assert!(!session.is_signed_in());

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}

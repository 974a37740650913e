pub mod components;

pub mod analytics;
pub mod forgot_password;
pub mod landing;
pub mod leads_manager;
pub mod leads_searcher;
pub mod leads_table;
pub mod login;
pub mod onboarding;
pub mod profile;
pub mod register;
pub mod search_composer;
pub mod settings;

use crossterm::event::KeyCode;

/// Every navigable view in the application. Public routes are reachable
/// without a session; private routes require one and redirect to Login
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    ForgotPassword,
    Onboarding,
    Profile,
    LeadsSearcher,
    LeadsManager,
    Analytics,
    Settings,
}

impl Route {
    pub fn is_private(self) -> bool {
        matches!(
            self,
            Route::Onboarding
                | Route::Profile
                | Route::LeadsSearcher
                | Route::LeadsManager
                | Route::Analytics
                | Route::Settings
        )
    }

    /// Routes that only make sense signed out (landing, login, register,
    /// forgot-password); a signed-in user is bounced to the working view.
    pub fn is_public_only(self) -> bool {
        !self.is_private()
    }

}

/// Global navigation chords available on every private screen, the terminal
/// stand-in for the sidebar.
pub fn private_route_for_key(code: KeyCode) -> Option<Route> {
    match code {
        KeyCode::F(1) => Some(Route::LeadsSearcher),
        KeyCode::F(2) => Some(Route::LeadsManager),
        KeyCode::F(3) => Some(Route::Analytics),
        KeyCode::F(4) => Some(Route::Settings),
        KeyCode::F(5) => Some(Route::Profile),
        _ => None,
    }
}

pub const NAV_HELP: &str = "F1 Searcher | F2 Manager | F3 Analytics | F4 Settings | F5 Profile";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_and_public_routes_partition() {
        let private = [
            Route::Onboarding,
            Route::Profile,
            Route::LeadsSearcher,
            Route::LeadsManager,
            Route::Analytics,
            Route::Settings,
        ];
        let public = [
            Route::Landing,
            Route::Login,
            Route::Register,
            Route::ForgotPassword,
        ];
        for route in private {
            assert!(route.is_private());
            assert!(!route.is_public_only());
        }
        for route in public {
            assert!(route.is_public_only());
            assert!(!route.is_private());
        }
    }
}

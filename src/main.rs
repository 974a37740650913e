mod config;
mod logger;
mod models;
mod session;
mod store;
mod ui;
mod webhook;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::future;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::models::Lead;
use crate::session::Session;
use crate::store::{Store, StoreError, StoreResult};
use crate::ui::analytics::{self, AnalyticsAction, AnalyticsState};
use crate::ui::forgot_password::{self, ForgotPasswordAction, ForgotPasswordState};
use crate::ui::landing::{self, LandingAction, LandingState};
use crate::ui::leads_manager::{self, LeadsManagerAction, LeadsManagerState};
use crate::ui::leads_searcher::{self, LeadsSearcherAction, LeadsSearcherState};
use crate::ui::leads_table::{LeadsTableAction, LeadsTableState};
use crate::ui::login::{self, LoginAction, LoginState};
use crate::ui::onboarding::{self, OnboardingAction, OnboardingState};
use crate::ui::profile::{self, ProfileAction, ProfileState};
use crate::ui::register::{self, RegisterAction, RegisterState};
use crate::ui::settings::{self, SettingsAction, SettingsState};
use crate::ui::Route;
use crate::webhook::AutomationHook;

/// Terminal client for the hosted lead-generation workspace
#[derive(Parser)]
#[command(name = "lead-manager")]
struct Cli {
    /// Write logs to this file instead of the default location
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Read and write the session from this file
    #[arg(long)]
    session_file: Option<PathBuf>,
    /// Log at debug level
    #[arg(long, short)]
    verbose: bool,
}

/// Which review table an action came from.
#[derive(Clone, Copy)]
enum TableHost {
    Searcher,
    Manager,
}

// Main application state: the shared context handed to every screen plus
// one state slot per screen.
struct AppState {
    store: Store,
    hook: AutomationHook,
    session: Session,
    route: Route,
    /// Private route a signed-out user asked for; honored after sign-in.
    pending_route: Option<Route>,
    landing_state: Option<LandingState>,
    login_state: Option<LoginState>,
    register_state: Option<RegisterState>,
    forgot_password_state: Option<ForgotPasswordState>,
    onboarding_state: Option<OnboardingState>,
    profile_state: Option<ProfileState>,
    searcher_state: Option<LeadsSearcherState>,
    manager_state: Option<LeadsManagerState>,
    analytics_state: Option<AnalyticsState>,
    settings_state: Option<SettingsState>,
}

impl AppState {
    fn new(store: Store, hook: AutomationHook, session: Session) -> Self {
        Self {
            store,
            hook,
            session,
            route: Route::Landing,
            pending_route: None,
            landing_state: None,
            login_state: None,
            register_state: None,
            forgot_password_state: None,
            onboarding_state: None,
            profile_state: None,
            searcher_state: None,
            manager_state: None,
            analytics_state: None,
            settings_state: None,
        }
    }

    fn owner_id(&self) -> String {
        self.session
            .current()
            .map(|user| user.id.clone())
            .unwrap_or_default()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?;

    let log_path = match cli.log_file {
        Some(path) => path,
        None => config.log_path()?,
    };
    logger::setup(&log_path, cli.verbose)?;

    // Rehydrate the persisted session; its presence is the auth signal.
    let session_path = match cli.session_file {
        Some(path) => path,
        None => config.session_path()?,
    };
    let session = Session::load(session_path);

    let store = Store::new(&config);
    let hook = AutomationHook::new(config.webhook_url.clone());

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state and land on the right side of the auth gate
    let mut app_state = AppState::new(store, hook, session);
    let first = if app_state.session.is_signed_in() {
        Route::LeadsSearcher
    } else {
        Route::Landing
    };
    enter_route(&mut app_state, first).await?;

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = result {
        println!("Error: {}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| match app_state.route {
            Route::Landing => {
                if let Some(state) = &mut app_state.landing_state {
                    landing::render_landing(f, state);
                }
            }
            Route::Login => {
                if let Some(state) = &mut app_state.login_state {
                    login::render_login(f, state);
                }
            }
            Route::Register => {
                if let Some(state) = &mut app_state.register_state {
                    register::render_register(f, state);
                }
            }
            Route::ForgotPassword => {
                if let Some(state) = &mut app_state.forgot_password_state {
                    forgot_password::render_forgot_password(f, state);
                }
            }
            Route::Onboarding => {
                if let Some(state) = &mut app_state.onboarding_state {
                    onboarding::render_onboarding(f, state);
                }
            }
            Route::Profile => {
                if let Some(state) = &mut app_state.profile_state {
                    profile::render_profile(f, state);
                }
            }
            Route::LeadsSearcher => {
                if let Some(state) = &mut app_state.searcher_state {
                    leads_searcher::render_leads_searcher(f, state);
                }
            }
            Route::LeadsManager => {
                if let Some(state) = &mut app_state.manager_state {
                    leads_manager::render_leads_manager(f, state);
                }
            }
            Route::Analytics => {
                if let Some(state) = &mut app_state.analytics_state {
                    analytics::render_analytics(f, state);
                }
            }
            Route::Settings => {
                if let Some(state) = &mut app_state.settings_state {
                    settings::render_settings(f, state);
                }
            }
        })?;

        // Handle input for current screen
        let should_quit = match app_state.route {
            Route::Landing => handle_landing_screen(app_state).await?,
            Route::Login => handle_login_screen(app_state).await?,
            Route::Register => handle_register_screen(app_state).await?,
            Route::ForgotPassword => handle_forgot_password_screen(app_state).await?,
            Route::Onboarding => handle_onboarding_screen(app_state).await?,
            Route::Profile => handle_profile_screen(app_state).await?,
            Route::LeadsSearcher => handle_searcher_screen(app_state).await?,
            Route::LeadsManager => handle_manager_screen(app_state).await?,
            Route::Analytics => handle_analytics_screen(app_state).await?,
            Route::Settings => handle_settings_screen(app_state).await?,
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

/// Applies the route guards: private routes demand a session (remembering
/// where the user was headed), public-only routes bounce a signed-in user
/// back into the app.
fn guard(requested: Route, signed_in: bool, pending: &mut Option<Route>) -> Route {
    if requested.is_private() && !signed_in {
        *pending = Some(requested);
        Route::Login
    } else if requested.is_public_only() && signed_in {
        pending.take().unwrap_or(Route::LeadsSearcher)
    } else {
        requested
    }
}

/// Navigates to a route, constructing its screen state. The only store
/// error that escapes construction is authentication-required, which tears
/// the session down and lands on Login instead.
async fn enter_route(app_state: &mut AppState, requested: Route) -> Result<()> {
    let destination = guard(
        requested,
        app_state.session.is_signed_in(),
        &mut app_state.pending_route,
    );
    match build_route(app_state, destination).await {
        Ok(()) => {
            app_state.route = destination;
        }
        Err(err) if err.is_auth_required() => auth_lost(app_state, destination)?,
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

async fn build_route(app_state: &mut AppState, route: Route) -> StoreResult<()> {
    match route {
        Route::Landing => {
            app_state.landing_state = Some(LandingState::new());
        }
        Route::Login => {
            app_state.login_state = Some(LoginState::new());
        }
        Route::Register => {
            app_state.register_state = Some(RegisterState::new());
        }
        Route::ForgotPassword => {
            app_state.forgot_password_state = Some(ForgotPasswordState::new());
        }
        Route::Onboarding => {
            app_state.onboarding_state = Some(OnboardingState::new());
        }
        Route::Profile => {
            if let Some(user) = app_state.session.current() {
                app_state.profile_state = Some(ProfileState::new(user.clone()));
            }
        }
        Route::Settings => {
            if let Some(user) = app_state.session.current() {
                app_state.settings_state = Some(SettingsState::new(
                    user.clone(),
                    app_state.store.endpoint(),
                    app_state.hook.endpoint().map(str::to_string),
                ));
            }
        }
        Route::Analytics => {
            let owner = app_state.owner_id();
            let leads = fetch_leads(app_state, &owner).await?;
            app_state.analytics_state = Some(AnalyticsState::new(&leads));
        }
        Route::LeadsSearcher => {
            let owner = app_state.owner_id();
            let templates = read_or_empty(
                app_state.store.search_templates(&owner).await,
                "search templates",
            )?;
            let leads = fetch_leads(app_state, &owner).await?;
            app_state.searcher_state = Some(LeadsSearcherState::new(templates, leads));
        }
        Route::LeadsManager => {
            let owner = app_state.owner_id();
            let leads = fetch_leads(app_state, &owner).await?;
            app_state.manager_state = Some(LeadsManagerState::new(leads));
        }
    }
    Ok(())
}

/// The global policy for an authentication-required store error: tear down
/// the persisted session and land on Login, keeping the interrupted route
/// for the post-login redirect.
fn auth_lost(app_state: &mut AppState, interrupted: Route) -> Result<()> {
    log::warn!("store demanded re-authentication; clearing the session");
    app_state.session.sign_out()?;
    if interrupted.is_private() {
        app_state.pending_route = Some(interrupted);
    }
    app_state.login_state = Some(LoginState::with_notice(
        "Your session expired. Please sign in again.",
    ));
    app_state.route = Route::Login;
    Ok(())
}

/// Read-path error policy: anything but authentication-required degrades to
/// an empty result after logging, so a failed fetch shows "no data", never
/// a crash.
fn read_or_empty<T>(result: StoreResult<Vec<T>>, what: &str) -> StoreResult<Vec<T>> {
    match result {
        Err(err) if !err.is_auth_required() => {
            log::error!("failed to load {what}: {err}");
            Ok(Vec::new())
        }
        other => other,
    }
}

async fn fetch_leads(app_state: &AppState, owner: &str) -> StoreResult<Vec<Lead>> {
    read_or_empty(app_state.store.leads(owner).await, "leads")
}

fn table_mut(app_state: &mut AppState, host: TableHost) -> Option<&mut LeadsTableState> {
    match host {
        TableHost::Searcher => app_state
            .searcher_state
            .as_mut()
            .map(|state| &mut state.table),
        TableHost::Manager => app_state
            .manager_state
            .as_mut()
            .map(|state| &mut state.table),
    }
}

/// Executes a review-table action against the store. Single updates refresh
/// the list on success; bulk updates run concurrently, log individual
/// failures without rolling back the rest, clear the selection regardless,
/// and refresh afterwards. Only authentication-required escapes.
async fn run_lead_action(
    app_state: &mut AppState,
    host: TableHost,
    action: LeadsTableAction,
) -> StoreResult<()> {
    let owner = app_state.owner_id();
    match action {
        LeadsTableAction::SetStatus { id, status } => {
            match app_state.store.update_lead_status(&id, status).await {
                Ok(()) => {
                    let leads = fetch_leads(app_state, &owner).await?;
                    if let Some(table) = table_mut(app_state, host) {
                        table.set_leads(leads);
                    }
                }
                Err(err) if err.is_auth_required() => return Err(err),
                Err(err) => log::error!("failed to update lead {id}: {err}"),
            }
        }
        LeadsTableAction::BulkSetStatus(status) => {
            let Some(table) = table_mut(app_state, host) else {
                return Ok(());
            };
            let ids = table.selected_ids();
            if ids.is_empty() {
                return Ok(());
            }

            let updates = ids
                .iter()
                .map(|id| app_state.store.update_lead_status(id, status));
            let results = future::join_all(updates).await;

            if let Some(table) = table_mut(app_state, host) {
                table.clear_selection();
            }

            let mut lost_auth = false;
            for (id, result) in ids.iter().zip(results) {
                match result {
                    Ok(()) => {}
                    Err(err) if err.is_auth_required() => lost_auth = true,
                    Err(err) => log::error!("failed to update lead {id}: {err}"),
                }
            }
            if lost_auth {
                return Err(StoreError::AuthRequired);
            }

            let leads = fetch_leads(app_state, &owner).await?;
            if let Some(table) = table_mut(app_state, host) {
                table.set_leads(leads);
            }
        }
        LeadsTableAction::FetchMore { offset } => {
            let more = read_or_empty(
                app_state.store.more_leads(&owner, offset).await,
                "more leads",
            )?;
            if let Some(table) = table_mut(app_state, host) {
                table.append(more);
            }
        }
    }
    Ok(())
}

async fn handle_landing_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match app_state.landing_state.as_mut() {
        Some(state) => landing::handle_input(state)?,
        None => return Ok(false),
    };
    match action {
        Some(LandingAction::GoLogin) => enter_route(app_state, Route::Login).await?,
        Some(LandingAction::GoRegister) => enter_route(app_state, Route::Register).await?,
        Some(LandingAction::Exit) => return Ok(true),
        None => {}
    }
    Ok(false)
}

async fn handle_login_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match app_state.login_state.as_mut() {
        Some(state) => login::handle_input(state)?,
        None => return Ok(false),
    };
    match action {
        Some(LoginAction::Submit { email, password }) => {
            if let Some(state) = app_state.login_state.as_mut() {
                state.busy = true;
                state.error = None;
            }
            match app_state.store.login_user(&email, &password).await {
                Ok(Some(user)) => {
                    app_state.session.sign_in(user)?;
                    let target = app_state
                        .pending_route
                        .take()
                        .unwrap_or(Route::LeadsSearcher);
                    enter_route(app_state, target).await?;
                }
                Ok(None) => {
                    // Unknown email and wrong password are indistinguishable
                    // on purpose.
                    if let Some(state) = app_state.login_state.as_mut() {
                        state.busy = false;
                        state.error = Some("Invalid email or password".to_string());
                    }
                }
                Err(err) => {
                    log::error!("login failed: {err}");
                    if let Some(state) = app_state.login_state.as_mut() {
                        state.busy = false;
                        state.error =
                            Some("Could not reach the workspace. Try again.".to_string());
                    }
                }
            }
        }
        Some(LoginAction::GoRegister) => enter_route(app_state, Route::Register).await?,
        Some(LoginAction::GoForgotPassword) => {
            enter_route(app_state, Route::ForgotPassword).await?
        }
        Some(LoginAction::Back) => enter_route(app_state, Route::Landing).await?,
        None => {}
    }
    Ok(false)
}

async fn handle_register_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match app_state.register_state.as_mut() {
        Some(state) => register::handle_input(state)?,
        None => return Ok(false),
    };
    match action {
        Some(RegisterAction::Submit(new_user)) => {
            if let Some(state) = app_state.register_state.as_mut() {
                state.busy = true;
                state.error = None;
            }
            match app_state.store.register_user(&new_user).await {
                Ok(user) => {
                    app_state.session.sign_in(user)?;
                    enter_route(app_state, Route::Onboarding).await?;
                }
                Err(err) => {
                    log::error!("registration failed: {err}");
                    if let Some(state) = app_state.register_state.as_mut() {
                        state.busy = false;
                        state.error =
                            Some("Could not create the account. Try again.".to_string());
                    }
                }
            }
        }
        Some(RegisterAction::GoLogin) => enter_route(app_state, Route::Login).await?,
        Some(RegisterAction::Back) => enter_route(app_state, Route::Landing).await?,
        None => {}
    }
    Ok(false)
}

async fn handle_forgot_password_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match app_state.forgot_password_state.as_mut() {
        Some(state) => forgot_password::handle_input(state)?,
        None => return Ok(false),
    };
    match action {
        Some(ForgotPasswordAction::GoLogin) => enter_route(app_state, Route::Login).await?,
        None => {}
    }
    Ok(false)
}

async fn handle_onboarding_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match app_state.onboarding_state.as_mut() {
        Some(state) => onboarding::handle_input(state)?,
        None => return Ok(false),
    };
    match action {
        Some(OnboardingAction::Complete(company)) => {
            if let Some(state) = app_state.onboarding_state.as_mut() {
                state.busy = true;
                state.error = None;
            }
            let owner = app_state.owner_id();
            match app_state.store.update_user(&owner, &company).await {
                Ok(updated) => {
                    app_state.session.replace(updated)?;
                    enter_route(app_state, Route::LeadsSearcher).await?;
                }
                Err(err) if err.is_auth_required() => auth_lost(app_state, Route::Onboarding)?,
                Err(err) => {
                    log::error!("saving onboarding data failed: {err}");
                    if let Some(state) = app_state.onboarding_state.as_mut() {
                        state.busy = false;
                        state.error = Some("Could not save your answers. Try again.".to_string());
                    }
                }
            }
        }
        None => {}
    }
    Ok(false)
}

async fn handle_profile_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match app_state.profile_state.as_mut() {
        Some(state) => profile::handle_input(state)?,
        None => return Ok(false),
    };
    match action {
        Some(ProfileAction::Save(company)) => {
            if let Some(state) = app_state.profile_state.as_mut() {
                state.busy = true;
                state.error = None;
            }
            let owner = app_state.owner_id();
            match app_state.store.update_user(&owner, &company).await {
                Ok(updated) => {
                    app_state.session.replace(updated.clone())?;
                    if let Some(state) = app_state.profile_state.as_mut() {
                        state.user = updated;
                        state.busy = false;
                        state.reset_form();
                    }
                }
                Err(err) if err.is_auth_required() => auth_lost(app_state, Route::Profile)?,
                Err(err) => {
                    log::error!("profile update failed: {err}");
                    if let Some(state) = app_state.profile_state.as_mut() {
                        state.busy = false;
                        state.error =
                            Some("Something went wrong while saving your profile".to_string());
                    }
                }
            }
        }
        Some(ProfileAction::SignOut) => {
            app_state.session.sign_out()?;
            app_state.pending_route = None;
            enter_route(app_state, Route::Login).await?;
        }
        Some(ProfileAction::Navigate(route)) => enter_route(app_state, route).await?,
        Some(ProfileAction::Exit) => return Ok(true),
        None => {}
    }
    Ok(false)
}

async fn handle_searcher_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match app_state.searcher_state.as_mut() {
        Some(state) => leads_searcher::handle_input(state)?,
        None => return Ok(false),
    };
    match action {
        Some(LeadsSearcherAction::SubmitSearch(criteria)) => {
            let owner = app_state.owner_id();
            match app_state
                .store
                .create_search_template(&owner, &criteria)
                .await
            {
                Ok(template) => {
                    // Fire-and-forget: the automation reports back through
                    // the store, not this call.
                    app_state.hook.trigger(&criteria).await;

                    let templates = read_or_empty(
                        app_state.store.search_templates(&owner).await,
                        "search templates",
                    );
                    match templates {
                        Ok(templates) => {
                            if let Some(state) = app_state.searcher_state.as_mut() {
                                state.set_templates(templates);
                                state.active_template = Some(template.id);
                                state.composer.clear_after_submit();
                            }
                        }
                        Err(err) if err.is_auth_required() => {
                            auth_lost(app_state, Route::LeadsSearcher)?
                        }
                        Err(err) => log::error!("failed to refresh templates: {err}"),
                    }
                }
                Err(err) if err.is_auth_required() => auth_lost(app_state, Route::LeadsSearcher)?,
                Err(err) => log::error!("search submission failed: {err}"),
            }
        }
        Some(LeadsSearcherAction::Lead(action)) => {
            if let Err(err) = run_lead_action(app_state, TableHost::Searcher, action).await {
                if err.is_auth_required() {
                    auth_lost(app_state, Route::LeadsSearcher)?;
                } else {
                    log::error!("lead action failed: {err}");
                }
            }
        }
        Some(LeadsSearcherAction::Refresh) => {
            enter_route(app_state, Route::LeadsSearcher).await?
        }
        Some(LeadsSearcherAction::Navigate(route)) => enter_route(app_state, route).await?,
        Some(LeadsSearcherAction::Exit) => return Ok(true),
        None => {}
    }
    Ok(false)
}

async fn handle_manager_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match app_state.manager_state.as_mut() {
        Some(state) => leads_manager::handle_input(state)?,
        None => return Ok(false),
    };
    match action {
        Some(LeadsManagerAction::Lead(action)) => {
            if let Err(err) = run_lead_action(app_state, TableHost::Manager, action).await {
                if err.is_auth_required() {
                    auth_lost(app_state, Route::LeadsManager)?;
                } else {
                    log::error!("lead action failed: {err}");
                }
            }
        }
        Some(LeadsManagerAction::Refresh) => enter_route(app_state, Route::LeadsManager).await?,
        Some(LeadsManagerAction::Navigate(route)) => enter_route(app_state, route).await?,
        Some(LeadsManagerAction::Exit) => return Ok(true),
        None => {}
    }
    Ok(false)
}

async fn handle_analytics_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match app_state.analytics_state.as_mut() {
        Some(state) => analytics::handle_input(state)?,
        None => return Ok(false),
    };
    match action {
        Some(AnalyticsAction::Refresh) => enter_route(app_state, Route::Analytics).await?,
        Some(AnalyticsAction::Navigate(route)) => enter_route(app_state, route).await?,
        Some(AnalyticsAction::Exit) => return Ok(true),
        None => {}
    }
    Ok(false)
}

async fn handle_settings_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match app_state.settings_state.as_mut() {
        Some(state) => settings::handle_input(state)?,
        None => return Ok(false),
    };
    match action {
        Some(SettingsAction::SignOut) => {
            app_state.session.sign_out()?;
            app_state.pending_route = None;
            enter_route(app_state, Route::Login).await?;
        }
        Some(SettingsAction::Navigate(route)) => enter_route(app_state, route).await?,
        Some(SettingsAction::Exit) => return Ok(true),
        None => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_routes_redirect_to_login_and_remember_the_target() {
        let mut pending = None;
        let destination = guard(Route::LeadsManager, false, &mut pending);
        assert_eq!(destination, Route::Login);
        assert_eq!(pending, Some(Route::LeadsManager));
    }

    #[test]
    fn public_only_routes_bounce_a_signed_in_user() {
        let mut pending = Some(Route::Analytics);
        let destination = guard(Route::Login, true, &mut pending);
        assert_eq!(destination, Route::Analytics);
        assert_eq!(pending, None);

        let destination = guard(Route::Landing, true, &mut pending);
        assert_eq!(destination, Route::LeadsSearcher);
    }

    #[test]
    fn allowed_routes_pass_through() {
        let mut pending = None;
        assert_eq!(guard(Route::Login, false, &mut pending), Route::Login);
        assert_eq!(
            guard(Route::Settings, true, &mut pending),
            Route::Settings
        );
        assert_eq!(pending, None);
    }
}

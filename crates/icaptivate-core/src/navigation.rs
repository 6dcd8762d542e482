//! Onboarding → Auth → Main navigation, driven by an explicit [`Session`].

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::NavigationError;

/// Flags that decide where the user lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub has_completed_onboarding: bool,
    pub is_authenticated: bool,
}

impl Session {
    pub fn initial_route(&self) -> Route {
        if !self.has_completed_onboarding {
            Route::Onboarding
        } else if !self.is_authenticated {
            Route::Auth
        } else {
            Route::Main(Tab::Home)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    History,
    Settings,
}

impl Tab {
    pub fn all() -> [Tab; 3] {
        [Tab::Home, Tab::History, Tab::Settings]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::History => "History",
            Tab::Settings => "Settings",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::History => 1,
            Tab::Settings => 2,
        }
    }

    pub fn next(&self) -> Tab {
        match self {
            Tab::Home => Tab::History,
            Tab::History => Tab::Settings,
            Tab::Settings => Tab::Home,
        }
    }

    pub fn prev(&self) -> Tab {
        match self {
            Tab::Home => Tab::Settings,
            Tab::History => Tab::Home,
            Tab::Settings => Tab::History,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Onboarding,
    Auth,
    Main(Tab),
}

impl Route {
    /// Position in the linear stack; routes only ever move to a higher stage.
    fn stage(&self) -> u8 {
        match self {
            Route::Onboarding => 0,
            Route::Auth => 1,
            Route::Main(_) => 2,
        }
    }
}

/// The navigation stack. Main is terminal: there is no logout.
///
/// Onboarding → Auth and Auth → Main are the only forward steps. Callers
/// update their [`Session`] only after the matching transition succeeds.
#[derive(Debug, Clone)]
pub struct Navigator {
    route: Route,
}

impl Navigator {
    pub fn new(session: &Session) -> Self {
        Self {
            route: session.initial_route(),
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Onboarding → Auth.
    pub fn complete_onboarding(&mut self) -> Result<(), NavigationError> {
        match self.route {
            Route::Onboarding => {
                self.go(Route::Auth);
                Ok(())
            }
            from => Err(NavigationError {
                from,
                action: "complete onboarding",
            }),
        }
    }

    /// Auth → Main(Home).
    pub fn log_in(&mut self) -> Result<(), NavigationError> {
        match self.route {
            Route::Auth => {
                self.go(Route::Main(Tab::Home));
                Ok(())
            }
            from => Err(NavigationError {
                from,
                action: "log in",
            }),
        }
    }

    pub fn select_tab(&mut self, tab: Tab) -> Result<(), NavigationError> {
        match self.route {
            Route::Main(_) => {
                self.route = Route::Main(tab);
                Ok(())
            }
            from => Err(NavigationError {
                from,
                action: "select a tab",
            }),
        }
    }

    /// Re-evaluate the route after the session changed.
    ///
    /// Only moves forward; returns whether the route changed.
    pub fn sync(&mut self, session: &Session) -> bool {
        let target = session.initial_route();
        if target.stage() > self.route.stage() {
            self.go(target);
            true
        } else {
            false
        }
    }

    fn go(&mut self, route: Route) {
        info!(from = ?self.route, to = ?route, "navigating");
        self.route = route;
    }
}

//! Session gate: authenticated flag plus the visible screen.
//!
//! `Session` is owned by the front end's root state and handed to views by
//! reference. Its methods are the only mutators, which keeps the invariant
//! that an unauthenticated session always shows the login screen.

/// Screens of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
    Search,
    Upload,
    Reference,
}

impl Screen {
    /// Screens reachable once logged in, in tab order.
    pub const NAVIGABLE: [Screen; 4] = [
        Screen::Dashboard,
        Screen::Search,
        Screen::Upload,
        Screen::Reference,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Dashboard => "Dashboard",
            Screen::Search => "Search",
            Screen::Upload => "Upload",
            Screen::Reference => "CID",
        }
    }

    /// Position in `NAVIGABLE`; `None` for the login screen.
    pub fn index(self) -> Option<usize> {
        Screen::NAVIGABLE.iter().position(|s| *s == self)
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Screen::NAVIGABLE.get(i).copied()
    }

    pub fn next(self) -> Screen {
        match self.index() {
            Some(i) => Screen::NAVIGABLE[(i + 1) % Screen::NAVIGABLE.len()],
            None => self,
        }
    }

    pub fn prev(self) -> Screen {
        let n = Screen::NAVIGABLE.len();
        match self.index() {
            Some(i) => Screen::NAVIGABLE[(i + n - 1) % n],
            None => self,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    screen: Screen,
    check_pending: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Unauthenticated,
            screen: Screen::Login,
            check_pending: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// True while the startup session check is in flight.
    pub fn check_pending(&self) -> bool {
        self.check_pending
    }

    /// Mark the startup check as started. Returns false if there is nothing
    /// to check (already authenticated) or a check is already running.
    pub fn begin_check(&mut self) -> bool {
        if self.is_authenticated() || self.check_pending {
            return false;
        }
        self.check_pending = true;
        true
    }

    /// Apply the startup check result. A negative or late answer never
    /// changes an authenticated session.
    pub fn finish_check(&mut self, confirmed: bool) {
        self.check_pending = false;
        if confirmed && !self.is_authenticated() {
            self.login();
        }
    }

    /// Unauthenticated → Authenticated, landing on the dashboard.
    pub fn login(&mut self) {
        self.state = SessionState::Authenticated;
        self.screen = Screen::Dashboard;
    }

    /// Authenticated → Unauthenticated, back to the login screen.
    pub fn logout(&mut self) {
        self.state = SessionState::Unauthenticated;
        self.screen = Screen::Login;
    }

    /// Switch screens. Ignored while unauthenticated; the login screen is
    /// only reachable through `logout`.
    pub fn navigate(&mut self, screen: Screen) -> bool {
        if !self.is_authenticated() || screen == Screen::Login {
            return false;
        }
        self.screen = screen;
        true
    }
}

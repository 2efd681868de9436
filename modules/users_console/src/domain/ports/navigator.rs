/// Screens reachable by navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Login,
    /// `/users`
    UserList,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::UserList => "/users",
        }
    }
}

/// Output port: asynchronous, fire-and-forget route changes.
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, route: Route);

    fn redirect_to_login(&self) {
        self.navigate(Route::Login);
    }

    fn open_user_list(&self) {
        self.navigate(Route::UserList);
    }
}

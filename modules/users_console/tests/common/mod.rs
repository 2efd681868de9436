#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use users_console::contract::client::DirectoryApi;
use users_console::contract::error::DirectoryError;
use users_console::contract::model::{Credentials, SessionToken, UserId, UserRecord, UsersPage};
use users_console::domain::controller::UserListController;
use users_console::domain::ports::{Navigator, Notification, NotificationLevel, Notifier, Route};

pub fn user(id: UserId, first: &str, last: &str, email: &str) -> UserRecord {
    UserRecord {
        id,
        first_name: first.into(),
        last_name: last.into(),
        email: email.into(),
        avatar_url: format!("https://reqres.in/img/faces/{id}-image.jpg"),
    }
}

pub fn ann() -> UserRecord {
    user(1, "Ann", "Lee", "ann@x.com")
}

pub fn bo() -> UserRecord {
    user(2, "Bo", "Kim", "bo@x.com")
}

pub fn page_of(ids: &[UserId], total_pages: u32) -> UsersPage {
    UsersPage::new(
        ids.iter()
            .map(|&id| user(id, &format!("First{id}"), &format!("Last{id}"), &format!("u{id}@x.com")))
            .collect(),
        total_pages,
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(u32),
    Update(UserRecord),
    Delete(UserId),
    Login(String),
}

/// Scriptable in-memory directory.
#[derive(Default)]
pub struct MockDirectory {
    pages: Mutex<HashMap<u32, Result<UsersPage, DirectoryError>>>,
    gates: Mutex<HashMap<u32, oneshot::Receiver<()>>>,
    update_error: Mutex<Option<DirectoryError>>,
    delete_error: Mutex<Option<DirectoryError>>,
    login_result: Mutex<Option<Result<SessionToken, DirectoryError>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_page(&self, n: u32, page: UsersPage) {
        self.pages.lock().insert(n, Ok(page));
    }

    pub fn fail_page(&self, n: u32) {
        self.pages
            .lock()
            .insert(n, Err(DirectoryError::network("HTTP 500 Internal Server Error")));
    }

    /// `list_users(n)` will wait until the returned sender fires (or is dropped).
    pub fn gate_page(&self, n: u32) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(n, rx);
        tx
    }

    pub fn fail_updates(&self) {
        *self.update_error.lock() = Some(DirectoryError::network("HTTP 503"));
    }

    pub fn fail_deletes(&self) {
        *self.delete_error.lock() = Some(DirectoryError::network("HTTP 404"));
    }

    pub fn login_returns(&self, result: Result<SessionToken, DirectoryError>) {
        *self.login_result.lock() = Some(result);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl DirectoryApi for MockDirectory {
    async fn list_users(&self, page: u32) -> Result<UsersPage, DirectoryError> {
        self.calls.lock().push(Call::List(page));
        let gate = self.gates.lock().remove(&page);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.pages
            .lock()
            .get(&page)
            .cloned()
            .unwrap_or_else(|| Err(DirectoryError::network("no such page")))
    }

    async fn update_user(&self, user: &UserRecord) -> Result<(), DirectoryError> {
        self.calls.lock().push(Call::Update(user.clone()));
        match self.update_error.lock().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn delete_user(&self, id: UserId) -> Result<(), DirectoryError> {
        self.calls.lock().push(Call::Delete(id));
        match self.delete_error.lock().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, DirectoryError> {
        self.calls.lock().push(Call::Login(credentials.email.clone()));
        self.login_result
            .lock()
            .clone()
            .unwrap_or_else(|| Err(DirectoryError::network("HTTP 400")))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().last().cloned()
    }

    pub fn count(&self, level: NotificationLevel) -> usize {
        self.seen.lock().iter().filter(|n| n.level == level).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().push(notification);
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().push(route);
    }
}

/// Controller over `directory` with its page 1 already loaded.
pub async fn loaded_controller(
    directory: Arc<MockDirectory>,
    notifier: Arc<RecordingNotifier>,
) -> UserListController {
    let mut c = UserListController::new(directory, notifier);
    c.load_page(1).await;
    c
}

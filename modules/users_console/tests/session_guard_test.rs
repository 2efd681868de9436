mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{RecordingNavigator, RecordingNotifier};
use users_console::contract::model::SessionToken;
use users_console::domain::messages;
use users_console::domain::ports::{NotificationLevel, Route};
use users_console::domain::session_guard::{GuardDecision, SessionGuard};
use users_console::infra::session::MemorySessionStore;

const DELAY: Duration = Duration::from_millis(1500);

fn guard(
    session: MemorySessionStore,
) -> (SessionGuard, Arc<RecordingNavigator>, Arc<RecordingNotifier>) {
    let navigator = RecordingNavigator::new();
    let notifier = RecordingNotifier::new();
    let guard = SessionGuard::new(
        Arc::new(session),
        navigator.clone(),
        notifier.clone(),
        DELAY,
    );
    (guard, navigator, notifier)
}

#[tokio::test(start_paused = true)]
async fn token_present_grants_access_silently() {
    let (guard, navigator, notifier) =
        guard(MemorySessionStore::with_token(SessionToken::new("QpwL5tke4Pnpja7X4")));

    assert_eq!(guard.check(), GuardDecision::Granted);

    tokio::time::sleep(DELAY * 2).await;
    assert!(navigator.routes().is_empty());
    assert!(notifier.all().is_empty());
}

#[tokio::test(start_paused = true)]
async fn missing_token_warns_then_redirects_after_delay() {
    // Arrange
    let (guard, navigator, notifier) = guard(MemorySessionStore::default());

    // Act
    let decision = guard.check();

    // Assert
    assert_eq!(decision, GuardDecision::Redirecting);
    let warning = notifier.last().unwrap();
    assert_eq!(warning.level, NotificationLevel::Failure);
    assert_eq!(warning.message, messages::UNAUTHORIZED);

    tokio::time::sleep(DELAY - Duration::from_millis(1)).await;
    assert!(navigator.routes().is_empty(), "redirect fired too early");

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(navigator.routes(), vec![Route::Login]);
}

#[tokio::test(start_paused = true)]
async fn blank_token_counts_as_no_session() {
    let (guard, navigator, _notifier) =
        guard(MemorySessionStore::with_token(SessionToken::new("   ")));

    assert_eq!(guard.check(), GuardDecision::Redirecting);
    tokio::time::sleep(DELAY + Duration::from_millis(1)).await;
    assert_eq!(navigator.routes(), vec![Route::Login]);
}

#[tokio::test(start_paused = true)]
async fn each_check_is_evaluated_once() {
    let (guard, navigator, notifier) = guard(MemorySessionStore::default());

    guard.check();
    guard.check();
    tokio::time::sleep(DELAY * 2).await;

    assert_eq!(notifier.count(NotificationLevel::Failure), 2);
    assert_eq!(navigator.routes(), vec![Route::Login, Route::Login]);
}

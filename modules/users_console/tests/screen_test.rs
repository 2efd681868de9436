mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;

use common::{ann, bo, page_of, Call, MockDirectory, RecordingNavigator, RecordingNotifier};
use users_console::contract::model::UsersPage;
use users_console::domain::controller::UserListController;
use users_console::domain::error::ConsoleError;
use users_console::domain::ports::Route;
use users_console::domain::session_guard::SessionGuard;
use users_console::domain::state::{ControllerPhase, EditableField, Outcome};
use users_console::infra::session::MemorySessionStore;
use users_console::screen::{
    open_user_list, MountedScreen, Operation, ScreenCommand, ScreenOptions, ScreenUpdate,
    UserListScreen,
};

async fn next_update(updates: &mut UnboundedReceiver<ScreenUpdate>) -> ScreenUpdate {
    timeout(Duration::from_secs(5), updates.recv())
        .await
        .expect("screen stalled")
        .expect("screen stopped")
}

async fn next_finished(updates: &mut UnboundedReceiver<ScreenUpdate>) -> (Operation, Outcome) {
    loop {
        if let ScreenUpdate::Finished { op, outcome } = next_update(updates).await {
            return (op, outcome);
        }
    }
}

async fn next_rejection(updates: &mut UnboundedReceiver<ScreenUpdate>) -> ConsoleError {
    loop {
        if let ScreenUpdate::Rejected(e) = next_update(updates).await {
            return e;
        }
    }
}

fn start(dir: &Arc<MockDirectory>, opts: ScreenOptions) -> MountedScreen {
    let controller = UserListController::new(dir.clone(), RecordingNotifier::new());
    UserListScreen::spawn(controller, opts)
}

fn two_pages() -> Arc<MockDirectory> {
    let dir = MockDirectory::new();
    dir.set_page(1, UsersPage::new(vec![ann(), bo()], 2));
    dir.set_page(2, page_of(&[3, 4], 2));
    dir
}

#[tokio::test]
async fn mount_loads_first_page() {
    let dir = two_pages();
    let mut screen = start(&dir, ScreenOptions::default());

    match next_update(&mut screen.updates).await {
        ScreenUpdate::Changed(snap) => assert_eq!(snap.phase, ControllerPhase::Loading(1)),
        other => panic!("expected initial render, got {other:?}"),
    }
    assert_eq!(
        next_finished(&mut screen.updates).await,
        (Operation::Load(1), Outcome::Applied)
    );

    let snap = screen.handle.snapshot().await.unwrap();
    assert_eq!(snap.records, vec![ann(), bo()]);
    assert_eq!(snap.page.total_pages, 2);
    assert_eq!(snap.phase, ControllerPhase::Idle);
}

#[tokio::test]
async fn slow_earlier_page_does_not_overwrite_newer_one() {
    // Arrange
    let dir = MockDirectory::new();
    dir.set_page(1, page_of(&[1, 2], 3));
    dir.set_page(2, page_of(&[3, 4], 3));
    dir.set_page(3, page_of(&[5, 6], 3));
    let mut screen = start(&dir, ScreenOptions::default());
    next_finished(&mut screen.updates).await;
    let release_page_two = dir.gate_page(2);

    // Act
    screen.handle.send(ScreenCommand::LoadPage(2)).await;
    screen.handle.send(ScreenCommand::LoadPage(3)).await;

    // Assert
    assert_eq!(
        next_finished(&mut screen.updates).await,
        (Operation::Load(3), Outcome::Applied)
    );
    release_page_two.send(()).unwrap();
    assert_eq!(
        next_finished(&mut screen.updates).await,
        (Operation::Load(2), Outcome::Discarded)
    );

    let snap = screen.handle.snapshot().await.unwrap();
    assert_eq!(snap.page.current_page, 3);
    assert_eq!(snap.records.iter().map(|u| u.id).collect::<Vec<_>>(), vec![5, 6]);
}

#[tokio::test]
async fn next_and_prev_respect_bounds() {
    let dir = two_pages();
    let mut screen = start(&dir, ScreenOptions::default());
    next_finished(&mut screen.updates).await;

    screen.handle.send(ScreenCommand::PrevPage).await;
    screen.handle.send(ScreenCommand::NextPage).await;
    assert_eq!(
        next_finished(&mut screen.updates).await,
        (Operation::Load(2), Outcome::Applied)
    );

    screen.handle.send(ScreenCommand::NextPage).await;
    screen.handle.send(ScreenCommand::PrevPage).await;
    assert_eq!(
        next_finished(&mut screen.updates).await,
        (Operation::Load(1), Outcome::Applied)
    );

    assert_eq!(dir.calls(), vec![Call::List(1), Call::List(2), Call::List(1)]);
}

#[tokio::test]
async fn search_filters_without_network() {
    let dir = two_pages();
    let mut screen = start(&dir, ScreenOptions::default());
    next_finished(&mut screen.updates).await;

    screen.handle.send(ScreenCommand::Search("kim".into())).await;
    let snap = screen.handle.snapshot().await.unwrap();

    assert_eq!(snap.query, "kim");
    assert_eq!(snap.filtered, vec![bo()]);
    assert_eq!(snap.records.len(), 2);
    assert_eq!(dir.calls(), vec![Call::List(1)]);
}

#[tokio::test]
async fn edit_and_submit_through_the_screen() {
    let dir = two_pages();
    let mut screen = start(&dir, ScreenOptions::default());
    next_finished(&mut screen.updates).await;

    screen.handle.send(ScreenCommand::BeginEdit(2)).await;
    screen
        .handle
        .send(ScreenCommand::EditField(EditableField::FirstName, "Bob".into()))
        .await;
    let snap = screen.handle.snapshot().await.unwrap();
    assert_eq!(snap.phase, ControllerPhase::Editing(2));

    screen.handle.send(ScreenCommand::SubmitEdit).await;
    assert_eq!(
        next_finished(&mut screen.updates).await,
        (Operation::Update(2), Outcome::Applied)
    );

    let snap = screen.handle.snapshot().await.unwrap();
    assert!(snap.draft.is_none());
    assert_eq!(snap.records[1].first_name, "Bob");
    assert_eq!(snap.records[1].avatar_url, bo().avatar_url);
}

#[tokio::test]
async fn local_precondition_failures_are_reported() {
    let dir = two_pages();
    let mut screen = start(&dir, ScreenOptions::default());
    next_finished(&mut screen.updates).await;

    screen.handle.send(ScreenCommand::BeginEdit(99)).await;
    assert_eq!(
        next_rejection(&mut screen.updates).await,
        ConsoleError::unknown_user(99)
    );

    screen.handle.send(ScreenCommand::SubmitEdit).await;
    assert_eq!(next_rejection(&mut screen.updates).await, ConsoleError::NoDraft);

    screen.handle.send(ScreenCommand::Delete(99)).await;
    assert_eq!(
        next_rejection(&mut screen.updates).await,
        ConsoleError::unknown_user(99)
    );
    assert_eq!(dir.calls(), vec![Call::List(1)]);
}

#[tokio::test]
async fn delete_does_not_reload_by_default() {
    let dir = two_pages();
    let mut screen = start(&dir, ScreenOptions::default());
    next_finished(&mut screen.updates).await;

    screen.handle.send(ScreenCommand::Delete(1)).await;
    assert_eq!(
        next_finished(&mut screen.updates).await,
        (Operation::Delete(1), Outcome::Applied)
    );

    let snap = screen.handle.snapshot().await.unwrap();
    assert_eq!(snap.records, vec![bo()]);
    assert_eq!(dir.calls(), vec![Call::List(1), Call::Delete(1)]);
}

#[tokio::test]
async fn delete_can_reload_current_page() {
    let dir = two_pages();
    let mut screen = start(
        &dir,
        ScreenOptions {
            reload_after_delete: true,
            ..Default::default()
        },
    );
    next_finished(&mut screen.updates).await;
    dir.set_page(1, UsersPage::new(vec![bo()], 1));

    screen.handle.send(ScreenCommand::Delete(1)).await;
    assert_eq!(
        next_finished(&mut screen.updates).await,
        (Operation::Delete(1), Outcome::Applied)
    );
    assert_eq!(
        next_finished(&mut screen.updates).await,
        (Operation::Load(1), Outcome::Applied)
    );

    let snap = screen.handle.snapshot().await.unwrap();
    assert_eq!(snap.page.total_pages, 1);
    assert_eq!(
        dir.calls(),
        vec![Call::List(1), Call::Delete(1), Call::List(1)]
    );
}

#[tokio::test]
async fn dropping_the_handle_stops_the_screen() {
    let dir = two_pages();
    let MountedScreen {
        handle,
        mut updates,
        task,
    } = start(&dir, ScreenOptions::default());
    next_finished(&mut updates).await;

    drop(handle);
    timeout(Duration::from_secs(5), task)
        .await
        .expect("screen did not stop")
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn guard_blocks_screen_without_session() {
    let dir = two_pages();
    let navigator = RecordingNavigator::new();
    let guard = SessionGuard::new(
        Arc::new(MemorySessionStore::default()),
        navigator.clone(),
        RecordingNotifier::new(),
        Duration::from_millis(1500),
    );
    let controller = UserListController::new(dir.clone(), RecordingNotifier::new());

    assert!(open_user_list(&guard, controller, ScreenOptions::default()).is_none());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(navigator.routes(), vec![Route::Login]);
    assert!(dir.calls().is_empty());
}

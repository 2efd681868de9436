//! The user list screen: a single task that owns the controller and serves
//! front-end commands. Requests run as spawned tasks and come back to the
//! loop as completions, so the screen stays responsive while they are in
//! flight.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::contract::error::DirectoryError;
use crate::contract::model::{UserId, UserRecord, UsersPage};
use crate::domain::controller::UserListController;
use crate::domain::error::ConsoleError;
use crate::domain::session_guard::{GuardDecision, SessionGuard};
use crate::domain::state::{
    ControllerPhase, DeleteRequest, EditDraft, EditableField, Outcome, PageRequest, PageState,
    UpdateRequest,
};

/// Front-end input.
#[derive(Debug)]
pub enum ScreenCommand {
    LoadPage(u32),
    NextPage,
    PrevPage,
    Search(String),
    BeginEdit(UserId),
    EditField(EditableField, String),
    SubmitEdit,
    CancelEdit,
    Delete(UserId),
    Snapshot(oneshot::Sender<ScreenSnapshot>),
}

/// Which network operation an [`ScreenUpdate::Finished`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load(u32),
    Update(UserId),
    Delete(UserId),
}

/// Screen output, in the order things happened.
#[derive(Debug, Clone)]
pub enum ScreenUpdate {
    /// State after a change; render this.
    Changed(ScreenSnapshot),
    /// A network operation was reconciled.
    Finished { op: Operation, outcome: Outcome },
    /// A command failed a local precondition and was not executed.
    Rejected(ConsoleError),
}

/// Read-only copy of what the screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSnapshot {
    pub records: Vec<UserRecord>,
    pub filtered: Vec<UserRecord>,
    pub query: String,
    pub page: PageState,
    pub draft: Option<EditDraft>,
    pub phase: ControllerPhase,
}

impl ScreenSnapshot {
    fn of(c: &UserListController) -> Self {
        Self {
            records: c.records().to_vec(),
            filtered: c.filtered().to_vec(),
            query: c.filter().query().to_string(),
            page: c.page(),
            draft: c.draft().cloned(),
            phase: c.phase(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScreenOptions {
    pub reload_after_delete: bool,
    pub command_buffer: usize,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            reload_after_delete: false,
            command_buffer: 64,
        }
    }
}

enum Completion {
    Page(PageRequest, Result<UsersPage, DirectoryError>),
    Update(UpdateRequest, Result<(), DirectoryError>),
    Delete(DeleteRequest, Result<(), DirectoryError>),
}

/// Cloneable command side of a running screen.
#[derive(Clone)]
pub struct ScreenHandle {
    tx: mpsc::Sender<ScreenCommand>,
}

impl ScreenHandle {
    /// Returns false once the screen has stopped.
    pub async fn send(&self, cmd: ScreenCommand) -> bool {
        self.tx.send(cmd).await.is_ok()
    }

    pub async fn snapshot(&self) -> Option<ScreenSnapshot> {
        let (tx, rx) = oneshot::channel();
        if !self.send(ScreenCommand::Snapshot(tx)).await {
            return None;
        }
        rx.await.ok()
    }
}

/// A screen that passed the session guard and is running.
pub struct MountedScreen {
    pub handle: ScreenHandle,
    pub updates: mpsc::UnboundedReceiver<ScreenUpdate>,
    pub task: JoinHandle<()>,
}

/// Gate on the session, then start the screen (which immediately loads page 1).
/// `None` when the guard redirects instead.
pub fn open_user_list(
    guard: &SessionGuard,
    controller: UserListController,
    opts: ScreenOptions,
) -> Option<MountedScreen> {
    match guard.check() {
        GuardDecision::Granted => Some(UserListScreen::spawn(controller, opts)),
        GuardDecision::Redirecting => None,
    }
}

pub struct UserListScreen {
    controller: UserListController,
    opts: ScreenOptions,
    updates: mpsc::UnboundedSender<ScreenUpdate>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl UserListScreen {
    /// Start the loop on the current runtime. Dropping every [`ScreenHandle`]
    /// stops it; requests still in flight then resolve into a closed channel.
    pub fn spawn(controller: UserListController, opts: ScreenOptions) -> MountedScreen {
        let (cmd_tx, cmd_rx) = mpsc::channel(opts.command_buffer.max(1));
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        let screen = Self {
            controller,
            opts,
            updates: updates_tx,
            completions_tx,
            completions_rx,
        };
        let task = tokio::spawn(screen.run(cmd_rx));

        MountedScreen {
            handle: ScreenHandle { tx: cmd_tx },
            updates: updates_rx,
            task,
        }
    }

    #[instrument(name = "users_console.screen.run", skip_all)]
    async fn run(mut self, mut commands: mpsc::Receiver<ScreenCommand>) {
        info!("user list screen mounted");
        let first = self.controller.mount();
        self.spawn_load(first);
        self.emit_changed();

        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                Some(done) = self.completions_rx.recv() => self.handle_completion(done),
            }
        }
        info!("user list screen unmounted");
    }

    fn handle_command(&mut self, cmd: ScreenCommand) {
        debug!(?cmd, "command");
        let result = match cmd {
            ScreenCommand::LoadPage(n) => {
                self.load(n);
                Ok(())
            }
            ScreenCommand::NextPage => {
                let page = self.controller.page();
                if page.has_next() {
                    self.load(page.current_page + 1);
                }
                Ok(())
            }
            ScreenCommand::PrevPage => {
                let page = self.controller.page();
                if page.has_prev() {
                    self.load(page.current_page - 1);
                }
                Ok(())
            }
            ScreenCommand::Search(q) => {
                self.controller.apply_filter(&q);
                Ok(())
            }
            ScreenCommand::BeginEdit(id) => self.controller.begin_edit(id).map(|_| ()),
            ScreenCommand::EditField(field, value) => self.controller.edit_field(field, value),
            ScreenCommand::CancelEdit => {
                self.controller.cancel_edit();
                Ok(())
            }
            ScreenCommand::SubmitEdit => self.controller.begin_submit().map(|req| {
                let directory = self.controller.directory();
                let tx = self.completions_tx.clone();
                tokio::spawn(async move {
                    let result = directory.update_user(&req.payload).await;
                    let _ = tx.send(Completion::Update(req, result));
                });
            }),
            ScreenCommand::Delete(id) => self.controller.begin_delete(id).map(|req| {
                let directory = self.controller.directory();
                let tx = self.completions_tx.clone();
                tokio::spawn(async move {
                    let result = directory.delete_user(req.id).await;
                    let _ = tx.send(Completion::Delete(req, result));
                });
            }),
            ScreenCommand::Snapshot(reply) => {
                let _ = reply.send(ScreenSnapshot::of(&self.controller));
                return;
            }
        };

        match result {
            Ok(()) => self.emit_changed(),
            Err(e) => {
                debug!(error = %e, "command rejected");
                let _ = self.updates.send(ScreenUpdate::Rejected(e));
            }
        }
    }

    fn handle_completion(&mut self, done: Completion) {
        let (op, outcome) = match done {
            Completion::Page(req, result) => {
                (Operation::Load(req.page), self.controller.complete_load(req, result))
            }
            Completion::Update(req, result) => {
                let id = req.payload.id;
                (Operation::Update(id), self.controller.complete_submit(req, result))
            }
            Completion::Delete(req, result) => {
                let id = req.id;
                let outcome = self.controller.complete_delete(req, result);
                if outcome == Outcome::Applied && self.opts.reload_after_delete {
                    let current = self.controller.page().current_page;
                    self.load(current);
                }
                (Operation::Delete(id), outcome)
            }
        };

        let _ = self.updates.send(ScreenUpdate::Finished { op, outcome });
        if outcome != Outcome::Discarded {
            self.emit_changed();
        }
    }

    fn load(&mut self, page: u32) {
        let req = self.controller.begin_load(page);
        self.spawn_load(req);
    }

    fn spawn_load(&self, req: PageRequest) {
        let directory = self.controller.directory();
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = directory.list_users(req.page).await;
            let _ = tx.send(Completion::Page(req, result));
        });
    }

    fn emit_changed(&self) {
        let _ = self
            .updates
            .send(ScreenUpdate::Changed(ScreenSnapshot::of(&self.controller)));
    }
}

//! Line-oriented front-end for the user list screen.

use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use users_console::contract::model::{UserId, UserRecord};
use users_console::domain::ports::Notification;
use users_console::domain::state::{ControllerPhase, EditDraft, EditableField, PageState};
use users_console::infra::navigation::ChannelNavigator;
use users_console::infra::notify::ChannelNotifier;
use users_console::screen::{MountedScreen, ScreenCommand, ScreenSnapshot, ScreenUpdate};
use users_console::UsersConsole;

const HELP: &str = "\
commands:
  page N             load page N
  next | prev        move one page
  search [TEXT]      filter the current page (empty clears)
  edit ID            start editing a user
  set FIELD VALUE    change first, last or email in the draft
  submit | cancel    finish the edit
  delete ID          delete a user
  show               print the current state
  help | quit";

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Page(u32),
    Next,
    Prev,
    Search(String),
    Edit(UserId),
    Set(EditableField, String),
    Submit,
    Cancel,
    Delete(UserId),
    Show,
    Help,
    Quit,
}

impl FromStr for Input {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };

        let id = |what: &str| {
            rest.parse::<UserId>()
                .map_err(|_| format!("{what} needs a numeric user id"))
        };

        match word.to_ascii_lowercase().as_str() {
            "page" => rest
                .parse::<u32>()
                .ok()
                .filter(|n| *n >= 1)
                .map(Input::Page)
                .ok_or_else(|| "page needs a number >= 1".to_string()),
            "next" | "n" => Ok(Input::Next),
            "prev" | "p" => Ok(Input::Prev),
            "search" | "/" => Ok(Input::Search(rest.to_string())),
            "edit" | "e" => id("edit").map(Input::Edit),
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "usage: set first|last|email VALUE".to_string())?;
                let field = field.parse::<EditableField>().map_err(|e| e.to_string())?;
                Ok(Input::Set(field, value.trim().to_string()))
            }
            "submit" | "save" => Ok(Input::Submit),
            "cancel" => Ok(Input::Cancel),
            "delete" | "rm" => id("delete").map(Input::Delete),
            "show" | "ls" => Ok(Input::Show),
            "help" | "?" => Ok(Input::Help),
            "quit" | "exit" | "q" => Ok(Input::Quit),
            "" => Err(String::new()),
            other => Err(format!("unknown command '{other}' (try 'help')")),
        }
    }
}

impl Input {
    /// Screen command for this input; `None` for inputs the front-end handles.
    pub fn into_command(self) -> Option<ScreenCommand> {
        Some(match self {
            Input::Page(n) => ScreenCommand::LoadPage(n),
            Input::Next => ScreenCommand::NextPage,
            Input::Prev => ScreenCommand::PrevPage,
            Input::Search(q) => ScreenCommand::Search(q),
            Input::Edit(id) => ScreenCommand::BeginEdit(id),
            Input::Set(field, value) => ScreenCommand::EditField(field, value),
            Input::Submit => ScreenCommand::SubmitEdit,
            Input::Cancel => ScreenCommand::CancelEdit,
            Input::Delete(id) => ScreenCommand::Delete(id),
            Input::Show | Input::Help | Input::Quit => return None,
        })
    }
}

pub fn format_notification(n: &Notification) -> String {
    format!("[{}] {}", n.level, n.message)
}

pub fn format_table(page: PageState, query: &str, users: &[UserRecord]) -> String {
    let mut out = String::new();
    let _ = write!(out, "page {}/{}", page.current_page, page.total_pages);
    if !query.is_empty() {
        let _ = write!(out, "  search: {query:?}");
    }
    out.push('\n');

    if users.is_empty() {
        out.push_str("  (no users)\n");
        return out;
    }
    let _ = writeln!(out, "{:>6}  {:<28}  {}", "ID", "NAME", "EMAIL");
    for u in users {
        let name = format!("{} {}", u.first_name, u.last_name);
        let _ = writeln!(out, "{:>6}  {:<28}  {}", u.id, name, u.email);
    }
    out
}

fn format_draft(draft: &EditDraft) -> String {
    format!(
        "editing #{}: first={:?} last={:?} email={:?}",
        draft.id(),
        draft.get(EditableField::FirstName),
        draft.get(EditableField::LastName),
        draft.get(EditableField::Email),
    )
}

pub fn format_snapshot(snap: &ScreenSnapshot) -> String {
    if let ControllerPhase::Loading(n) = snap.phase {
        return format!("loading page {n}...\n");
    }
    let mut out = format_table(snap.page, &snap.query, &snap.filtered);
    if let Some(draft) = &snap.draft {
        out.push_str(&format_draft(draft));
        out.push('\n');
    }
    out
}

/// Mount the user list and serve stdin until `quit`, EOF or Ctrl+C.
pub async fn run(users: &UsersConsole) -> Result<()> {
    let (navigator, mut routes) = ChannelNavigator::new();
    let (notifier, mut notes) = ChannelNotifier::new();

    let Some(MountedScreen {
        handle,
        mut updates,
        task,
    }) = users.open_user_list(Arc::new(navigator), Arc::new(notifier))
    else {
        while let Ok(n) = notes.try_recv() {
            println!("{}", format_notification(&n));
        }
        if let Some(route) = routes.recv().await {
            tracing::debug!(path = route.path(), "redirected");
        }
        bail!("no session; run `userdesk login` first");
    };

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = modkit::shutdown::wait_for_shutdown();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            res = &mut shutdown => {
                res?;
                break;
            }
            Some(update) = updates.recv() => match update {
                ScreenUpdate::Changed(snap) => print!("{}", format_snapshot(&snap)),
                ScreenUpdate::Rejected(e) => println!("! {e}"),
                ScreenUpdate::Finished { op, outcome } => {
                    tracing::debug!(?op, ?outcome, "operation finished");
                }
            },
            Some(n) = notes.recv() => println!("{}", format_notification(&n)),
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.parse::<Input>() {
                    Ok(Input::Quit) => break,
                    Ok(Input::Help) => println!("{HELP}"),
                    Ok(Input::Show) => {
                        if let Some(snap) = handle.snapshot().await {
                            print!("{}", format_snapshot(&snap));
                        }
                    }
                    Ok(input) => {
                        if let Some(cmd) = input.into_command() {
                            if !handle.send(cmd).await {
                                break;
                            }
                        }
                    }
                    Err(msg) if msg.is_empty() => {}
                    Err(msg) => println!("! {msg}"),
                }
            }
        }
    }

    drop(handle);
    let _ = task.await;
    Ok(())
}

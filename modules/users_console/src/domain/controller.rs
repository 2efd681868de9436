use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::contract::client::DirectoryApi;
use crate::contract::error::DirectoryError;
use crate::contract::model::{UserId, UserRecord, UsersPage};
use crate::domain::error::ConsoleError;
use crate::domain::filter::SearchFilter;
use crate::domain::messages;
use crate::domain::ports::Notifier;
use crate::domain::state::{
    ControllerPhase, DeleteRequest, EditDraft, EditableField, Outcome, PageRequest, PageState,
    UpdateRequest,
};

/// List/edit controller for one page of the remote user directory.
///
/// Owns the current page's records, the search filter, the pagination cursor
/// and the (at most one) edit draft. Every network-backed operation comes in
/// two halves so an event loop can run the request elsewhere:
///
/// - `begin_*` validates preconditions, snapshots what is needed and returns a
///   ticket describing the request to issue;
/// - `complete_*` takes the ticket and the response and either applies it in
///   full or leaves state untouched.
///
/// `load_page`, `submit_edit` and `delete_user` chain both halves around the
/// injected [`DirectoryApi`].
pub struct UserListController {
    directory: Arc<dyn DirectoryApi>,
    notifier: Arc<dyn Notifier>,
    records: Vec<UserRecord>,
    filtered: Vec<UserRecord>,
    filter: SearchFilter,
    page: PageState,
    draft: Option<EditDraft>,
    // Generation of the most recently issued page read.
    generation: u64,
    pending_load: Option<PageRequest>,
}

impl UserListController {
    pub fn new(directory: Arc<dyn DirectoryApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            directory,
            notifier,
            records: Vec::new(),
            filtered: Vec::new(),
            filter: SearchFilter::default(),
            page: PageState::default(),
            draft: None,
            generation: 0,
            pending_load: None,
        }
    }

    pub fn directory(&self) -> Arc<dyn DirectoryApi> {
        self.directory.clone()
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn filtered(&self) -> &[UserRecord] {
        &self.filtered
    }

    pub fn filter(&self) -> &SearchFilter {
        &self.filter
    }

    pub fn page(&self) -> PageState {
        self.page
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    pub fn phase(&self) -> ControllerPhase {
        if let Some(draft) = &self.draft {
            return ControllerPhase::Editing(draft.id());
        }
        match self.pending_load {
            Some(req) => ControllerPhase::Loading(req.page),
            None => ControllerPhase::Idle,
        }
    }

    /// Screen entry: the first read is always page 1.
    pub fn mount(&mut self) -> PageRequest {
        self.begin_load(1)
    }

    // ---- pagination ----

    /// Issue a read for `page`. Out-of-range pages are left to the server.
    /// Supersedes any read still in flight.
    pub fn begin_load(&mut self, page: u32) -> PageRequest {
        self.generation += 1;
        let req = PageRequest {
            page,
            generation: self.generation,
        };
        self.pending_load = Some(req);
        debug!(page, generation = req.generation, "page read issued");
        req
    }

    #[instrument(
        name = "users_console.controller.complete_load",
        skip(self, result),
        fields(page = req.page, generation = req.generation)
    )]
    pub fn complete_load(
        &mut self,
        req: PageRequest,
        result: Result<UsersPage, DirectoryError>,
    ) -> Outcome {
        if req.generation != self.generation {
            debug!(latest = self.generation, "stale page response discarded");
            return Outcome::Discarded;
        }
        self.pending_load = None;

        match result {
            Ok(page) => {
                self.records = page.data;
                self.page = PageState {
                    current_page: req.page,
                    total_pages: page.total_pages.max(1),
                };
                self.recompute_filtered();
                info!(
                    records = self.records.len(),
                    total_pages = self.page.total_pages,
                    "page loaded"
                );
                Outcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "page read failed");
                self.notifier.notify_failure(messages::FETCH_FAILED);
                Outcome::Failed
            }
        }
    }

    pub async fn load_page(&mut self, page: u32) -> Outcome {
        let req = self.begin_load(page);
        let result = self.directory.list_users(req.page).await;
        self.complete_load(req, result)
    }

    // ---- search ----

    /// Local, synchronous; never touches the network.
    pub fn apply_filter(&mut self, query: &str) -> &[UserRecord] {
        self.filter = SearchFilter::new(query);
        self.recompute_filtered();
        &self.filtered
    }

    fn recompute_filtered(&mut self) {
        self.filtered = self.filter.apply(&self.records);
    }

    // ---- editing ----

    /// Open a draft for `id`, replacing any draft already open.
    pub fn begin_edit(&mut self, id: UserId) -> Result<&EditDraft, ConsoleError> {
        let record = self
            .find(id)
            .ok_or_else(|| ConsoleError::unknown_user(id))?;
        let draft = EditDraft::from_record(record);
        if let Some(prev) = self.draft.take() {
            debug!(previous = prev.id(), "discarding previous draft");
        }
        Ok(self.draft.insert(draft))
    }

    pub fn edit_field(
        &mut self,
        field: EditableField,
        value: impl Into<String>,
    ) -> Result<(), ConsoleError> {
        let draft = self.draft.as_mut().ok_or(ConsoleError::NoDraft)?;
        draft.set(field, value);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.draft = None;
    }

    /// Validate the draft and build the full-record payload to send.
    /// The payload keeps the stored record's id and avatar.
    pub fn begin_submit(&self) -> Result<UpdateRequest, ConsoleError> {
        let draft = self.draft.as_ref().ok_or(ConsoleError::NoDraft)?;
        draft.validate()?;
        let base = self.find(draft.id()).unwrap_or_else(|| draft.record());
        Ok(UpdateRequest {
            payload: draft.merge_into(base),
        })
    }

    #[instrument(
        name = "users_console.controller.complete_submit",
        skip(self, req, result),
        fields(user_id = req.payload.id)
    )]
    pub fn complete_submit(
        &mut self,
        req: UpdateRequest,
        result: Result<(), DirectoryError>,
    ) -> Outcome {
        if let Err(e) = result {
            warn!(error = %e, "update failed");
            self.notifier.notify_failure(messages::UPDATE_FAILED);
            return Outcome::Failed;
        }

        let id = req.payload.id;
        if let Some(slot) = self.records.iter_mut().find(|u| u.id == id) {
            *slot = req.payload;
        } else {
            debug!("updated user no longer on the current page");
        }
        if self.draft.as_ref().is_some_and(|d| d.id() == id) {
            self.draft = None;
        }
        self.recompute_filtered();
        info!("user updated");
        self.notifier.notify_success(messages::UPDATE_OK);
        Outcome::Applied
    }

    pub async fn submit_edit(&mut self) -> Result<Outcome, ConsoleError> {
        let req = self.begin_submit()?;
        let result = self.directory.update_user(&req.payload).await;
        Ok(self.complete_submit(req, result))
    }

    // ---- deletion ----

    pub fn begin_delete(&self, id: UserId) -> Result<DeleteRequest, ConsoleError> {
        self.find(id).ok_or_else(|| ConsoleError::unknown_user(id))?;
        Ok(DeleteRequest { id })
    }

    /// On success exactly the record with `req.id` disappears; `total_pages`
    /// stays as last reported by the server until the next read.
    #[instrument(
        name = "users_console.controller.complete_delete",
        skip(self, result),
        fields(user_id = req.id)
    )]
    pub fn complete_delete(
        &mut self,
        req: DeleteRequest,
        result: Result<(), DirectoryError>,
    ) -> Outcome {
        if let Err(e) = result {
            warn!(error = %e, "delete failed");
            self.notifier.notify_failure(messages::DELETE_FAILED);
            return Outcome::Failed;
        }

        if let Some(pos) = self.records.iter().position(|u| u.id == req.id) {
            self.records.remove(pos);
        }
        if self.draft.as_ref().is_some_and(|d| d.id() == req.id) {
            self.draft = None;
        }
        self.recompute_filtered();
        info!("user deleted");
        self.notifier.notify_success(messages::DELETE_OK);
        Outcome::Applied
    }

    pub async fn delete_user(&mut self, id: UserId) -> Result<Outcome, ConsoleError> {
        let req = self.begin_delete(id)?;
        let result = self.directory.delete_user(req.id).await;
        Ok(self.complete_delete(req, result))
    }

    fn find(&self, id: UserId) -> Option<&UserRecord> {
        self.records.iter().find(|u| u.id == id)
    }
}

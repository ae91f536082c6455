use async_trait::async_trait;
use thiserror::Error;

use crate::client::api::ItemsApi;
use crate::database::Item;

/// Contents of the shared add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub value: String,
}

impl ItemDraft {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.value.trim().is_empty()
    }

    fn clear(&mut self) {
        self.name.clear();
        self.value.clear();
    }
}

/// The intent recorded when the user commits an action, captured before
/// verification starts. Verification is asynchronous; once the token
/// arrives, this variant says which call to make and against what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Create(ItemDraft),
    Update { id: String, draft: ItemDraft },
    Delete { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FormState {
    Idle,
    AwaitingVerification(PendingAction),
    Submitting,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Name and value are required")]
    IncompleteForm,
    #[error("Another action is already pending")]
    Busy,
    #[error("No action is awaiting verification")]
    NotPending,
}

/// Result of completing one user action.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The write landed; the caller should silently refetch the collection.
    Completed(Option<Item>),
    /// The action did not land; the error is recorded on the controller and
    /// the form contents are preserved for retry.
    Failed,
}

/// Source of verification tokens. Stands in for the invisible widget: the
/// controller asks for exactly one token per user action and receives
/// `None` when the challenge expired or errored.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn acquire(&self) -> Option<String>;
}

/// Token already in hand (CLI flag or environment).
pub struct StaticTokenSource(pub Option<String>);

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn acquire(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Drives user edit intents through one shared form.
///
/// One action at a time: `idle -> awaiting verification -> submitting ->
/// idle`. Starting a second action while one is pending is rejected rather
/// than letting it steal the recorded target.
pub struct FormController {
    pub form: ItemDraft,
    editing: Option<String>,
    state: FormState,
    pub error: Option<String>,
}

impl FormController {
    pub fn new() -> Self {
        Self {
            form: ItemDraft::default(),
            editing: None,
            state: FormState::Idle,
            error: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == FormState::Idle
    }

    pub fn is_awaiting_verification(&self) -> bool {
        matches!(self.state, FormState::AwaitingVerification(_))
    }

    pub fn is_submitting(&self) -> bool {
        self.state == FormState::Submitting
    }

    /// Id of the item the form is editing, if in edit mode.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Load an item into the shared form for editing.
    pub fn open_edit(&mut self, item: &Item) {
        self.form = ItemDraft {
            name: item.name.clone(),
            value: item.value.clone(),
        };
        self.editing = Some(item.id.clone());
        self.error = None;
    }

    /// Abandon the current form contents and edit mode. Not allowed while a
    /// submission is in flight.
    pub fn cancel(&mut self) {
        if self.state == FormState::Idle {
            self.form.clear();
            self.editing = None;
            self.error = None;
        }
    }

    /// Commit the shared form: an update when in edit mode, otherwise a
    /// create. Records the intent and moves to awaiting verification.
    pub fn submit(&mut self) -> Result<(), FormError> {
        if self.state != FormState::Idle {
            return Err(FormError::Busy);
        }
        if !self.form.is_complete() {
            return Err(FormError::IncompleteForm);
        }

        let action = match &self.editing {
            Some(id) => PendingAction::Update {
                id: id.clone(),
                draft: self.form.clone(),
            },
            None => PendingAction::Create(self.form.clone()),
        };

        self.error = None;
        self.state = FormState::AwaitingVerification(action);
        Ok(())
    }

    /// Commit a delete for the given item id.
    pub fn request_delete(&mut self, id: &str) -> Result<(), FormError> {
        if self.state != FormState::Idle {
            return Err(FormError::Busy);
        }

        self.error = None;
        self.state = FormState::AwaitingVerification(PendingAction::Delete { id: id.to_string() });
        Ok(())
    }

    /// Verification completion callback. `None` means the challenge expired
    /// or errored: the recorded action is dropped without any API call.
    /// With a token, the single matching API call is issued.
    pub async fn on_verification(
        &mut self,
        api: &ItemsApi,
        token: Option<String>,
    ) -> Result<SubmitOutcome, FormError> {
        let action = match std::mem::replace(&mut self.state, FormState::Submitting) {
            FormState::AwaitingVerification(action) => action,
            other => {
                self.state = other;
                return Err(FormError::NotPending);
            }
        };

        let Some(token) = token else {
            self.state = FormState::Idle;
            self.error = Some("Verification expired or failed".to_string());
            return Ok(SubmitOutcome::Failed);
        };

        let result = match &action {
            PendingAction::Create(draft) => api
                .create_item(&draft.name, &draft.value, &token)
                .await
                .map(Some),
            PendingAction::Update { id, draft } => api
                .update_item(id, &draft.name, &draft.value, &token)
                .await
                .map(Some),
            PendingAction::Delete { id } => api.delete_item(id, &token).await.map(|_| None),
        };

        self.state = FormState::Idle;

        match result {
            Ok(item) => {
                self.form.clear();
                self.editing = None;
                self.error = None;
                Ok(SubmitOutcome::Completed(item))
            }
            Err(e) => {
                // Form contents stay put so the user can retry
                self.error = Some(e.to_string());
                Ok(SubmitOutcome::Failed)
            }
        }
    }
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

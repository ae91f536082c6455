//! Client-side layer: typed API access, the collection view state, and the
//! form/action controller. The CLI front end drives these against a running
//! server; nothing here touches the database directly.

pub mod api;
pub mod form;
pub mod items;

pub use api::{ClientError, ItemsApi};
pub use form::{FormController, ItemDraft, PendingAction, StaticTokenSource, SubmitOutcome, TokenSource};
pub use items::{ItemsView, SortDirection, SortField};

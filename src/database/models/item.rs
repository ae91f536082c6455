use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One sign-up entry: who is bringing what. The id is store-generated and
/// opaque to clients; name and value are free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub value: String,
}

//! Administrator accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AdminId, Email};

/// An administrator as exposed by the API.
///
/// The password hash is kept by the persistence layer and never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccount {
    pub id: AdminId,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

mod repository;
mod service;

pub use repository::*;
pub use service::*;

use serde::{Deserialize, Serialize};

/// User as saved on storage.
///
/// Email is the globally unique key; `save` semantics are full
/// replacement, so there is no separate update path.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
}

//! User domain types.
//!
//! This module contains types representing GitHub user accounts.

use serde::{Deserialize, Serialize};

/// Represents a GitHub user account.
///
/// GitHub attaches one of these to commits whose author or committer email maps to a
/// known account, and to every pull request review.
///
/// # Examples
///
/// ```rust
/// use github_client::User;
///
/// let user = User {
///     id: 12345,
///     login: "octocat".to_string(),
/// };
///
/// println!("User: {} (ID: {})", user.login, user.id);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct User {
    /// The unique numeric ID of the user
    #[serde(default)]
    pub id: u64,
    /// The login name of the user
    pub login: String,
}

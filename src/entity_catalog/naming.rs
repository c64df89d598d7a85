//! Member name to storage column name mapping.
//!
//! **Convention**: snake_case, applied identically in every clause.
//!
//! - `UserName` → `user_name`
//! - `UserID` → `user_id` (acronyms collapse into one word)
//! - `createdAt` → `created_at`
//! - `user_name` → `user_name` (already mapped names are stable)
//!
//! Digits start a new word (`Line2` → `line_2`); declare members accordingly.

use convert_case::{Case, Casing};

/// Map an entity member name to its column name.
///
/// # Examples
/// ```
/// use sqlcraft::entity_catalog::naming::column_name;
///
/// assert_eq!(column_name("UserName"), "user_name");
/// assert_eq!(column_name("Id"), "id");
/// ```
pub fn column_name(member: &str) -> String {
    member.to_case(Case::Snake)
}

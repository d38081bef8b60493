//! The catalog: action identifier to category mapping.
//!
//! A pure function with no state and no failure modes. The category is
//! derived from the action identifier's namespace prefix; a prefix that is
//! not itself a category name (for example `user:`) falls back to `system`.

use rotortrace_contracts::action::{AuditAction, Category};

/// Resolve the category for an action from its namespace prefix.
pub fn category_of(action: &AuditAction) -> Category {
    let prefix = action
        .as_str()
        .split_once(':')
        .map(|(ns, _)| ns)
        .unwrap_or("");

    match prefix {
        "repair" => Category::Repair,
        "state" => Category::State,
        "part" => Category::Part,
        "file" => Category::File,
        "budget" => Category::Budget,
        "notification" => Category::Notification,
        _ => Category::System,
    }
}

//! Category → placeholder table.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::entities::Category;

/// Marker for categories without an entry in the table.
pub const UNKNOWN_PLACEHOLDER: &str = "[UNKNOWN]";

/// Placeholder for person names that look like surnames.
pub const SURNAME_PLACEHOLDER: &str = "[SURNAME]";

/// Immutable mapping from category to its base placeholder.
#[derive(Debug)]
pub struct ReplacementTable {
    entries: HashMap<Category, &'static str>,
}

impl ReplacementTable {
    /// The process-wide table, built on first use.
    pub fn global() -> &'static ReplacementTable {
        static TABLE: OnceLock<ReplacementTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            let mut entries = HashMap::new();
            entries.insert(Category::Person, "[PERSON]");
            entries.insert(Category::Organization, "[ORGANIZATION]");
            entries.insert(Category::Location, "[LOCATION]");
            entries.insert(Category::Misc, "[MISC]");
            entries.insert(Category::Email, "[EMAIL]");
            entries.insert(Category::Phone, "[PHONE]");
            ReplacementTable { entries }
        })
    }

    /// Base placeholder for `category`, or `[UNKNOWN]`.
    pub fn base(&self, category: Category) -> &'static str {
        self.entries.get(&category).copied().unwrap_or(UNKNOWN_PLACEHOLDER)
    }
}

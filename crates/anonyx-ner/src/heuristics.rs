//! Placeholder selection for classifier spans.
//!
//! A pure decision table over (category × casing shape × pattern match).
//! It never looks at offsets, so it can be tested on bare surface strings.

use anonyx_common::casing::{is_alpha, is_lower, is_title, is_upper};
use anonyx_common::replacement::SURNAME_PLACEHOLDER;
use anonyx_common::{Category, ReplacementTable};

pub const PERSON_UPPER: &str = "[PERSON]";
pub const PERSON_LOWER: &str = "[person]";
pub const PERSON_TITLE: &str = "[Person]";

/// Surname endings grouped by naming tradition.
#[derive(Debug)]
pub struct SurnameGroup {
    pub name: &'static str,
    pub suffixes: &'static [&'static str],
}

pub const SURNAME_GROUPS: &[SurnameGroup] = &[
    SurnameGroup { name: "slavic",         suffixes: &["ov", "ev", "ski", "sky", "ova", "eva"] },
    SurnameGroup { name: "east_asian",     suffixes: &["yan", "ian", "jin", "chen", "li", "wang"] },
    SurnameGroup { name: "nordic",         suffixes: &["sen", "sson", "dottir", "dóttir"] },
    SurnameGroup { name: "middle_eastern", suffixes: &["zadeh", "oglu", "pour"] },
    SurnameGroup { name: "indian",         suffixes: &["raj", "kumar", "singh", "patel", "sharma"] },
    SurnameGroup { name: "hispanic",       suffixes: &["ez", "es", "os", "as", "is"] },
];

pub const LOCATION_SUFFIXES: &[&str] = &[
    "burg", "berg", "town", "city", "ville", "polis", "grad", "abad",
    "pur", "nagar", "pore", "stan", "land", "ia", "ya",
];

pub const LOCATION_PREFIXES: &[&str] = &[
    "new", "old", "north", "south", "east", "west", "upper", "lower",
    "port", "fort", "saint", "san", "santa",
];

/// Name of the first surname group whose suffix ends `surface`, if any.
pub fn surname_group(surface: &str) -> Option<&'static str> {
    let lower = surface.to_lowercase();
    SURNAME_GROUPS
        .iter()
        .find(|g| g.suffixes.iter().any(|s| lower.ends_with(s)))
        .map(|g| g.name)
}

pub fn looks_like_surname(surface: &str) -> bool {
    surname_group(surface).is_some()
}

pub fn looks_like_location(surface: &str) -> bool {
    let lower = surface.to_lowercase();
    LOCATION_SUFFIXES.iter().any(|s| lower.ends_with(s))
        || LOCATION_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Casing features the table branches on.
#[derive(Debug, Clone, Copy)]
struct Shape {
    upper_alpha: bool,
    lower: bool,
    title: bool,
    title_alpha: bool,
}

impl Shape {
    fn of(surface: &str) -> Self {
        let alpha = is_alpha(surface);
        let title = is_title(surface);
        Self {
            upper_alpha: alpha && is_upper(surface),
            lower: is_lower(surface),
            title,
            title_alpha: alpha && title,
        }
    }
}

/// Placeholder for a classifier span with the given category and surface.
///
/// - PERSON keeps the surface's casing: `JOHN` → `[PERSON]`, `john` →
///   `[person]`, `John` → `[Person]`; title-case surnames → `[SURNAME]`.
/// - ORGANIZATION and LOCATION surfaces that look like bare capitalized
///   words are treated as person names unless a location affix matches.
/// - Everything else takes the category's base placeholder.
pub fn placeholder_for(category: Category, surface: &str) -> &'static str {
    let table = ReplacementTable::global();
    let shape = Shape::of(surface);

    match category {
        Category::Person => match shape {
            Shape { upper_alpha: true, .. } => PERSON_UPPER,
            Shape { lower: true, .. } => PERSON_LOWER,
            Shape { title: true, .. } if looks_like_surname(surface) => SURNAME_PLACEHOLDER,
            Shape { title: true, .. } => PERSON_TITLE,
            _ => PERSON_UPPER,
        },
        Category::Organization => match shape {
            Shape { upper_alpha: true, .. } => PERSON_UPPER,
            Shape { title_alpha: true, .. } => PERSON_TITLE,
            // non-alphabetic surfaces ("3M", "AT&T") are genuine organizations
            _ => table.base(Category::Organization),
        },
        Category::Location => match shape {
            Shape { upper_alpha: true, .. } => PERSON_UPPER,
            Shape { title_alpha: true, .. } if looks_like_location(surface) => table.base(Category::Location),
            Shape { title_alpha: true, .. } => PERSON_TITLE,
            _ => table.base(Category::Location),
        },
        other => table.base(other),
    }
}

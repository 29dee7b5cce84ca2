//! Independent lookups over the reference tables. No resolver consults another.

mod category;
mod client;
mod department;
mod sector;

pub use category::{categories_for_sector, lookup_category, resolve_category, CategoryLookup};
pub use client::{resolve_client, ClientPolicyView, FieldLock, FieldSuggestion};
pub use department::{resolve_department, DepartmentView};
pub use sector::resolve_sector;

/// Outcome of looking a code up in a reference table.
///
/// `NotSelected` and `Unknown` both mean "no contribution", but callers can
/// prompt for a selection in the first case and stay silent in the second.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    NotSelected,
    Unknown(String),
    Found(T),
}

impl<T> Resolution<T> {
    pub(crate) fn lookup<F>(code: Option<&str>, find: F) -> Self
    where
        F: FnOnce(&str) -> Option<T>,
    {
        match code.map(str::trim).filter(|code| !code.is_empty()) {
            None => Self::NotSelected,
            Some(code) => match find(code) {
                Some(found) => Self::Found(found),
                None => Self::Unknown(code.to_string()),
            },
        }
    }

    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_found(&self) -> Option<&T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_selected(&self) -> bool {
        !matches!(self, Self::NotSelected)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

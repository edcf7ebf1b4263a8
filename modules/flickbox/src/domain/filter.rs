//! Case-insensitive substring filtering for the admin listings.

use crate::contract::model::{Review, User};

/// Indicator shown when a filter matches nothing.
pub const NO_RESULTS: &str = "No results found.";
pub const LOADING: &str = "Loading...";

/// Fixed set of text fields a record is searched by.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Review {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.username.as_str(),
            self.movie_title.as_str(),
            self.review_text.as_str(),
        ]
    }
}

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.username.as_str(),
            self.email.as_str(),
            self.phone.as_deref().unwrap_or_default(),
        ]
    }
}

/// True when any field contains `term`, ignoring case. An empty term matches everything.
pub fn matches<T: Searchable>(item: &T, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// What a filtered listing renders.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Loading,
    NoResults,
    Rows(Vec<T>),
}

impl<T> Listing<T> {
    pub fn rows(&self) -> &[T] {
        match self {
            Self::Rows(rows) => rows,
            Self::Loading | Self::NoResults => &[],
        }
    }

    /// Literal placeholder text, if the listing shows one instead of rows.
    pub fn indicator(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some(LOADING),
            Self::NoResults => Some(NO_RESULTS),
            Self::Rows(_) => None,
        }
    }
}

pub fn filter_listing<T: Searchable + Clone>(items: &[T], term: &str, loading: bool) -> Listing<T> {
    if loading {
        return Listing::Loading;
    }
    let rows: Vec<T> = items.iter().filter(|i| matches(*i, term)).cloned().collect();
    if rows.is_empty() {
        Listing::NoResults
    } else {
        Listing::Rows(rows)
    }
}

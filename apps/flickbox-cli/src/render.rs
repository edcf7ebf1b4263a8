//! Plain-text rendering of the views.

use flickbox::domain::film_search::SearchDisplay;
use flickbox::domain::filter::Listing;
use flickbox::domain::like_control::{LikeSnapshot, LikeState};
use flickbox::domain::list_collection::{ListState, DEFAULT_LIST_DESCRIPTION};
use flickbox::model::{FilmList, MetadataFilm, Review, User};

const CARD_DESCRIPTION_FALLBACK: &str = "No description provided.";

pub fn list_card(list: &FilmList) -> String {
    let (preview, overflow) = list.poster_preview();
    let mut out = format!(
        "#{} {} ({})\n  {}\n  created {}\n",
        list.id,
        list.name,
        list.film_count_label(),
        list.description_or(CARD_DESCRIPTION_FALLBACK),
        list.created_label()
    );
    for film in preview {
        out.push_str(&format!(
            "  [poster] {}\n",
            film.poster.as_deref().unwrap_or("-")
        ));
    }
    if overflow > 0 {
        out.push_str(&format!("  +{overflow}\n"));
    }
    out
}

pub fn list_detail(state: &ListState) -> String {
    match state {
        ListState::Loading => "Loading...\n".to_string(),
        ListState::Missing => "List not found.\n".to_string(),
        ListState::Ready(list) if list.films.is_empty() => format!(
            "{}\n{}\n\nYour list is empty\nAdd your favorite films to get started\n",
            list.name,
            list.description_or(DEFAULT_LIST_DESCRIPTION)
        ),
        ListState::Ready(list) => {
            let mut out = format!(
                "{}\n{}\n\n",
                list.name,
                list.description_or(DEFAULT_LIST_DESCRIPTION)
            );
            for film in &list.films {
                out.push_str(&format!(
                    "{:>8}  {} ({})  {}\n",
                    film.tmdb_id,
                    film.title,
                    film.year_label(),
                    film.rating
                ));
            }
            out
        }
    }
}

pub fn search_results(display: &SearchDisplay) -> String {
    match display {
        SearchDisplay::Closed => String::new(),
        SearchDisplay::Loading => "Loading...\n".to_string(),
        SearchDisplay::NoResults => "No films found.\n".to_string(),
        SearchDisplay::Films(films) => films
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{i:>3}. {}\n", metadata_line(f)))
            .collect(),
    }
}

pub fn metadata_line(film: &MetadataFilm) -> String {
    let year = film
        .release_date
        .as_deref()
        .and_then(|d| d.get(..4))
        .unwrap_or("N/A");
    format!("{} ({year})  {}  [tmdb {}]", film.title, film.rating(), film.id)
}

pub fn reviews(listing: &Listing<Review>) -> String {
    if let Some(indicator) = listing.indicator() {
        return format!("{indicator}\n");
    }
    listing
        .rows()
        .iter()
        .map(|r| {
            format!(
                "#{} [{}] {} on \"{}\" ({} likes)\n    {}\n",
                r.id, r.status, r.username, r.movie_title, r.likes, r.review_text
            )
        })
        .collect()
}

pub fn users(listing: &Listing<User>) -> String {
    if let Some(indicator) = listing.indicator() {
        return format!("{indicator}\n");
    }
    listing
        .rows()
        .iter()
        .map(|u| {
            format!(
                "#{} {} <{}> {} {} {}\n",
                u.id,
                u.username,
                u.email,
                u.phone.as_deref().unwrap_or("-"),
                u.role.label(),
                u.status
            )
        })
        .collect()
}

pub fn like(snapshot: &LikeSnapshot) -> String {
    let state = match snapshot.state {
        LikeState::Unknown => "unknown",
        LikeState::Checked { liked: true } => "liked",
        LikeState::Checked { liked: false } => "not liked",
    };
    format!("{state}, {} likes\n", snapshot.likes)
}

//! Plain-text rendering of a view model.
//!
//! The renderer is a stand-in for a real front end: it turns a
//! [`UIViewModel`] into lines of text for the line-oriented terminal shim.
//! All decisions (which cards, fallback or poster, labels) are already made
//! in the view model; this module only lays them out.
//!
//! # Layout
//!
//! ```text
//!              Search (2)
//! saved: 3   query: bat
//! --------------------------------------------------------------
//!  1. [Bat]man (1989) movie ♥
//!     poster: https://...
//!  2. [Bat]man Returns (1992) movie
//!     poster: none
//! --------------------------------------------------------------
//! type <text>: search as you type  ...
//! ```

use crate::ui::helpers::{centered, highlight, truncate};
use crate::ui::viewmodel::{Card, DetailView, EmptyState, OverlayView, PosterView, UIViewModel};
use std::fmt::Write;

const MAX_TITLE_WIDTH: usize = 48;

/// Renders `vm` as text for a terminal `cols` characters wide.
///
/// # Example
///
/// ```rust
/// use marquee::app::EngineState;
/// use marquee::ui::render;
///
/// let text = render(&EngineState::default().compute_viewmodel(), 60);
/// assert!(text.contains("Start exploring movies"));
/// ```
#[must_use]
pub fn render(vm: &UIViewModel, cols: usize) -> String {
    let mut out = String::new();
    let rule = "-".repeat(cols.max(1));

    let _ = writeln!(out, "{}", centered(vm.header.title.trim(), cols));
    let saved = if vm.header.saved_button_enabled {
        format!("saved: {}", vm.header.saved_count)
    } else {
        "saved: none".to_string()
    };
    let searching = if vm.search_bar.searching { "  (searching...)" } else { "" };
    let _ = writeln!(out, "{saved}   query: {}{searching}", vm.search_bar.query);
    let _ = writeln!(out, "{rule}");

    if let Some(empty) = &vm.empty_state {
        render_empty_state(&mut out, empty, cols);
    }
    for (idx, card) in vm.cards.iter().enumerate() {
        render_card(&mut out, idx + 1, card);
    }

    match &vm.overlay {
        OverlayView::Hidden => {}
        OverlayView::Loading => {
            let _ = writeln!(out, "{rule}");
            let _ = writeln!(out, "{}", centered("Loading details...", cols));
        }
        OverlayView::Detail(detail) => {
            let _ = writeln!(out, "{rule}");
            render_detail(&mut out, detail);
        }
    }

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{}", vm.footer.keybindings);
    out
}

fn render_card(out: &mut String, number: usize, card: &Card) {
    let title = highlight(&truncate(&card.title, MAX_TITLE_WIDTH), &card.highlight_ranges);
    let kind = card.kind.as_deref().map(|k| format!(" {k}")).unwrap_or_default();
    let saved = if card.is_saved { " ♥" } else { "" };
    let _ = writeln!(out, "{number:>2}. {title} ({}){kind}{saved}", card.year);
    let _ = writeln!(out, "    poster: {}", poster_text(&card.poster));
}

fn render_empty_state(out: &mut String, empty: &EmptyState, cols: usize) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", centered(&empty.message, cols));
    let _ = writeln!(out, "{}", centered(&empty.subtitle, cols));

    if !empty.preview.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Your saved movies:");
        for item in &empty.preview {
            let _ = writeln!(out, "  - {} ({})", item.title, item.year);
        }
    }
    let _ = writeln!(out);
}

fn render_detail(out: &mut String, detail: &DetailView) {
    let _ = writeln!(out, "{} ({})  [{}]", detail.title, detail.year, detail.save_label);
    let score = detail
        .score
        .map_or_else(|| "N/A".to_string(), |s| format!("{s:.1}/10"));
    let _ = writeln!(out, "{} | {} | {} | score {score}", detail.rating, detail.runtime, detail.genre);
    let _ = writeln!(out, "Released: {}", detail.release_date);
    let _ = writeln!(out, "Director: {}", detail.director);
    let _ = writeln!(out, "Writer:   {}", detail.writer);
    let _ = writeln!(out, "Cast:     {}", detail.cast);
    let _ = writeln!(out, "Poster:   {}", poster_text(&detail.poster));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", detail.plot);
    if let Some(url) = &detail.trailer_url {
        let _ = writeln!(out, "Trailer:  {url}");
    }
}

fn poster_text(poster: &PosterView) -> &str {
    match poster {
        PosterView::Image(url) => url,
        PosterView::Fallback { .. } => "none",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{EngineState, Overlay, ViewMode};
    use crate::domain::{ItemDetail, Poster, SearchResultItem};

    #[test]
    fn renders_cards_with_highlights_and_saved_marker() {
        let saved: ItemDetail =
            serde_json::from_value(serde_json::json!({"imdbID": "tt1", "Title": "Batman", "Year": "1989"}))
                .unwrap();
        let state = EngineState {
            query_text: "bat".to_string(),
            current_results: vec![SearchResultItem {
                id: "tt1".to_string(),
                title: "Batman".to_string(),
                year: "1989".to_string(),
                kind: "movie".to_string(),
                poster: Poster::Unavailable,
            }],
            saved: vec![saved],
            min_query_len: 3,
            ..EngineState::default()
        };

        let text = render(&state.compute_viewmodel(), 60);
        assert!(text.contains(" 1. [Bat]man (1989) movie ♥"));
        assert!(text.contains("poster: none"));
        assert!(text.contains("saved: 1"));
    }

    #[test]
    fn renders_detail_overlay() {
        let detail: ItemDetail = serde_json::from_value(serde_json::json!({
            "imdbID": "tt2", "Title": "Heat", "Year": "1995", "imdbRating": "N/A", "Plot": "A heist."
        }))
        .unwrap();
        let state = EngineState {
            view_mode: ViewMode::SavedCollection,
            selected_detail: Some(detail),
            overlay: Overlay::ShowingDetail,
            ..EngineState::default()
        };

        let text = render(&state.compute_viewmodel(), 60);
        assert!(text.contains("Heat (1995)  [Save]"));
        assert!(text.contains("score N/A"));
        assert!(text.contains("A heist."));
        assert!(text.contains("Trailer:  https://www.youtube.com/results?search_query="));
    }
}

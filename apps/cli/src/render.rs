//! Plain-text views of sessions and recommendation items.

use std::fmt::Write as _;

use client_core::SessionSummary;
use shared::domain::Item;

pub const HELP_TEXT: &str = "\
How to use
  Type what you feel like watching and press Enter. Each answered query
  becomes a session you can reopen later.

Commands
  /new                 start a fresh chat (history is kept)
  /sessions            list saved sessions, newest first
  /open <n>            show the results of session n
  /rename <n> <title>  rename session n
  /delete <n>          delete session n (asks first)
  /show <n>            details for item n of the current results
  /help                this guide
  /quit                leave

What you can ask for
  Era-based filtering       \"80s action movies\", \"classic 70s thrillers\"
  Region-based filtering    \"European detective films\", \"Nordic noir\", \"Japanese anime\"
  Quality tags              mainstream, cult, niche, popular, classic, legendary
  Negative themes           \"space movies without aliens\"
  Franchise-aware picks     Marvel, DC, Harry Potter, Star Wars or similar universes
  Duration filtering        short or long movies, series with short or long episodes

Tips
  Be specific about genres, time periods or themes.
  Try a different phrasing if the results miss.
  Use /show to get the IMDb link for an item.

Examples
  Sci-fi movies like Blade Runner
  Comedy series similar to The Office
  Horror movies from the 1980s
";

/// Numbered one-line cards, capped at `cap` items.
pub fn result_cards(items: &[Item], cap: usize) -> String {
    let mut out = String::new();
    if items.is_empty() {
        out.push_str("No recommendations returned.\n");
        return out;
    }
    for (position, item) in items.iter().take(cap).enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {} ({}) [{}] {:.1}/10",
            position + 1,
            item.title,
            item.year_label(),
            item.media_type,
            item.rating_value,
        );
        if !item.genres.is_empty() {
            let _ = writeln!(out, "     {}", item.genres.join(", "));
        }
    }
    if items.len() > cap {
        let _ = writeln!(out, "     ... {} more not shown", items.len() - cap);
    }
    out
}

pub fn item_detail(item: &Item) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", item.title);
    let _ = writeln!(out, "  Type:     {}", item.media_type);
    let _ = writeln!(out, "  Year:     {}", item.year_label());
    let runtime = match item.runtime_minutes {
        0 => item.runtime_label(),
        _ => format!("{} min", item.runtime_label()),
    };
    let _ = writeln!(out, "  Runtime:  {runtime}");
    let _ = writeln!(out, "  Rating:   {:.1}/10", item.rating_value);
    let _ = writeln!(out, "  Country:  {}", item.origin_country);
    if let Some(url) = item.imdb_url() {
        let _ = writeln!(out, "  IMDb:     {url}");
    }
    if !item.genres.is_empty() {
        let _ = writeln!(out, "  Genres:   {}", item.genres.join(", "));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", item.description);
    out
}

pub fn session_list(sessions: &[SessionSummary]) -> String {
    if sessions.is_empty() {
        return "No sessions yet.\n".to_string();
    }
    let mut out = String::new();
    for (position, session) in sessions.iter().enumerate() {
        let marker = if session.is_active { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker}{:>3}. {} ({} results)",
            position + 1,
            session.title,
            session.result_count
        );
    }
    out
}

pub fn found_line(result_count: usize, query: &str) -> String {
    format!("Found {result_count} recommendations for \"{query}\".")
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;

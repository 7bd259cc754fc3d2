//! Character-by-character disclosure of a freshly created session title.

use std::time::Duration;

use shared::domain::SessionId;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use crate::controller::QueryController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    Progress,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEnd {
    Completed,
    /// Renamed or deleted while revealing.
    Cancelled,
    /// Already revealed, or unknown.
    NotRevealing,
}

#[derive(Debug, Clone)]
pub struct TitleReveal {
    title: String,
    shown: usize,
    total: usize,
}

impl TitleReveal {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let total = title.chars().count();
        Self {
            title,
            shown: 0,
            total,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn advance(&mut self) -> RevealStep {
        if self.shown < self.total {
            self.shown += 1;
            RevealStep::Progress
        } else {
            RevealStep::Complete
        }
    }

    pub fn visible(&self) -> &str {
        match self.title.char_indices().nth(self.shown) {
            Some((byte, _)) => &self.title[..byte],
            None => &self.title,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.shown == self.total
    }
}

/// Plays the reveal for `session_id`, calling `on_frame` with the visible
/// prefix after each tick. Clears the session's reveal flag on completion.
pub async fn play<F>(
    controller: &QueryController,
    session_id: SessionId,
    period: Duration,
    mut on_frame: F,
) -> RevealEnd
where
    F: FnMut(&str),
{
    let Some(title) = controller.reveal_target(session_id) else {
        return RevealEnd::NotRevealing;
    };
    let mut reveal = TitleReveal::new(title);
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick resolves immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        if controller.reveal_target(session_id).as_deref() != Some(reveal.title()) {
            debug!(session_id = session_id.0, "title reveal cancelled");
            return RevealEnd::Cancelled;
        }
        match reveal.advance() {
            RevealStep::Progress => on_frame(reveal.visible()),
            RevealStep::Complete => {
                controller.finish_reveal(session_id);
                return RevealEnd::Completed;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/title_reveal_tests.rs"]
mod tests;

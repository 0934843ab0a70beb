use super::{EventView, Highlight, SearchEvent};
use crate::player::ai::cancel::CancelToken;
use crate::player::ai::config::SearchConfig;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Timing for replaying a finished search to an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub step_delay: Duration,
    /// Nodes deeper than this replay without delay.
    pub paced_plies: usize,
}

impl Pacing {
    pub fn none() -> Self {
        Pacing {
            step_delay: Duration::ZERO,
            paced_plies: 0,
        }
    }

    pub fn from_config(search: &SearchConfig) -> Self {
        Pacing {
            step_delay: Duration::from_millis(search.step_delay_ms),
            paced_plies: search.paced_plies,
        }
    }

    fn delay_for(&self, event: &SearchEvent) -> Option<Duration> {
        match event {
            SearchEvent::Node {
                ply,
                tag: Highlight::Visiting,
                ..
            } if *ply <= self.paced_plies && !self.step_delay.is_zero() => Some(self.step_delay),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    Completed(usize),
    Cancelled(usize),
}

/// Feeds queued events to `view` until the channel closes or `cancel` fires.
pub async fn replay<V: EventView + ?Sized>(
    rx: &mut UnboundedReceiver<SearchEvent>,
    view: &mut V,
    pacing: Pacing,
    cancel: &CancelToken,
) -> ReplayOutcome {
    let mut shown = 0;
    loop {
        if cancel.is_cancelled() {
            return ReplayOutcome::Cancelled(shown);
        }
        let Some(event) = rx.recv().await else {
            return ReplayOutcome::Completed(shown);
        };
        view.on_event(&event);
        shown += 1;
        if let Some(delay) = pacing.delay_for(&event) {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::ai::tree::NodeId;
    use tokio::sync::mpsc::unbounded_channel;

    struct Collect(Vec<SearchEvent>);

    impl EventView for Collect {
        fn on_event(&mut self, event: &SearchEvent) {
            self.0.push(event.clone());
        }
    }

    fn visit(ply: usize) -> SearchEvent {
        SearchEvent::Node {
            node: NodeId(ply),
            ply,
            tag: Highlight::Visiting,
            score: None,
        }
    }

    #[tokio::test]
    async fn test_replay_until_channel_closes() {
        let (tx, mut rx) = unbounded_channel();
        tx.send(visit(0)).unwrap();
        tx.send(SearchEvent::AlphaBeta { alpha: 1, beta: 2 }).unwrap();
        tx.send(visit(1)).unwrap();
        drop(tx);

        let mut view = Collect(Vec::new());
        let pacing = Pacing {
            step_delay: Duration::from_millis(1),
            paced_plies: 1,
        };
        let outcome = replay(&mut rx, &mut view, pacing, &CancelToken::new()).await;
        assert_eq!(outcome, ReplayOutcome::Completed(3));
        assert_eq!(view.0[1], SearchEvent::AlphaBeta { alpha: 1, beta: 2 });
    }

    #[tokio::test]
    async fn test_replay_stops_when_cancelled() {
        let (tx, mut rx) = unbounded_channel();
        for ply in 0..5 {
            tx.send(visit(ply)).unwrap();
        }
        let cancel = CancelToken::new();
        cancel.cancel();

        let mut view = Collect(Vec::new());
        let outcome = replay(&mut rx, &mut view, Pacing::none(), &cancel).await;
        assert_eq!(outcome, ReplayOutcome::Cancelled(0));
        assert!(view.0.is_empty());
    }

    #[test]
    fn test_only_shallow_visits_are_paced() {
        let pacing = Pacing {
            step_delay: Duration::from_millis(5),
            paced_plies: 1,
        };
        assert!(pacing.delay_for(&visit(1)).is_some());
        assert!(pacing.delay_for(&visit(2)).is_none());
        assert!(pacing
            .delay_for(&SearchEvent::AlphaBeta { alpha: 0, beta: 0 })
            .is_none());
        assert!(Pacing::none().delay_for(&visit(0)).is_none());
    }
}

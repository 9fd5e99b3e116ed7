use tracing::debug;

use super::step::StepId;

/// Identity of one outstanding prefill request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub step: StepId,
    pub generation: u64,
}

/// Hands out tickets and decides whether a finished request still applies.
///
/// Only the most recently issued ticket is live. Leaving the step (or
/// issuing a newer request) makes older results stale.
#[derive(Debug, Default)]
pub struct PrefetchTracker {
    generation: u64,
    live: Option<RequestTicket>,
}

impl PrefetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, step: &StepId) -> RequestTicket {
        self.generation += 1;
        let ticket = RequestTicket {
            step: step.clone(),
            generation: self.generation,
        };
        self.live = Some(ticket.clone());
        ticket
    }

    /// Drop the live ticket, e.g. when the user navigates away
    pub fn cancel(&mut self) {
        if let Some(ticket) = self.live.take() {
            debug!(step = ticket.step.as_str(), generation = ticket.generation, "Prefetch cancelled");
        }
    }

    /// Consume the ticket if it is live and still belongs to `current_step`
    pub fn accept(&mut self, ticket: &RequestTicket, current_step: &StepId) -> bool {
        let ok = self.live.as_ref() == Some(ticket) && &ticket.step == current_step;
        if ok {
            self.live = None;
        }
        ok
    }

    pub fn is_loading(&self, step: &StepId) -> bool {
        self.live.as_ref().is_some_and(|t| &t.step == step)
    }
}

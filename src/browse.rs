use crate::catalog::AnimeSummary;

/// Where the paginated list currently stands. Everything except `Loading`
/// is at rest and may receive a new trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Exhausted,
    Failed,
}

/// Tag handed out when a page request is issued. Responses carry it back so
/// arrivals for an abandoned query lineage can be discarded instead of
/// mutating the current list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub lineage: u64,
    pub page: u32,
}

/// Paginated search list state. Pure transitions, no I/O; the app layer
/// drives the actual network call between `begin_fetch` and `apply_*`.
pub struct BrowseState {
    pub query: String,
    pub page: u32,
    pub items: Vec<AnimeSummary>,
    pub has_more: bool,
    pub error: Option<String>,
    phase: Phase,
    lineage: u64,
}

impl BrowseState {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            page: 1,
            items: Vec::new(),
            has_more: true,
            error: None,
            phase: Phase::Idle,
            lineage: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Start a fresh lineage for `query`. Valid from any phase; does not
    /// itself fetch. Tickets issued before the reset become stale.
    pub fn reset(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
        self.items.clear();
        self.has_more = true;
        self.error = None;
        self.phase = Phase::Idle;
        self.lineage += 1;
    }

    /// Claim the next page request. Returns `None` while a request is in
    /// flight or once the lineage is exhausted or failed, so at most one
    /// request is ever in flight and nothing fetches past the end.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if self.phase == Phase::Loading || !self.has_more {
            return None;
        }

        self.phase = Phase::Loading;
        self.error = None;
        Some(FetchTicket {
            lineage: self.lineage,
            page: self.page,
        })
    }

    /// Merge a successful page response. An empty page marks the lineage
    /// exhausted without counting as a fetched page.
    pub fn apply_success(&mut self, ticket: FetchTicket, new_items: Vec<AnimeSummary>) {
        if ticket.lineage != self.lineage {
            return;
        }

        if new_items.is_empty() {
            self.has_more = false;
            self.phase = Phase::Exhausted;
        } else {
            self.items.extend(new_items);
            self.page += 1;
            self.phase = Phase::Loaded;
        }
    }

    /// Record a failed page response. Permanent stop for this lineage; only
    /// `reset` recovers.
    pub fn apply_failure(&mut self, ticket: FetchTicket, message: String) {
        if ticket.lineage != self.lineage {
            return;
        }

        self.has_more = false;
        self.error = Some(message);
        self.phase = Phase::Failed;
    }
}

impl Default for BrowseState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summaries(ids: &[u64]) -> Vec<AnimeSummary> {
        ids.iter()
            .map(|&id| AnimeSummary {
                mal_id: id,
                title: format!("title {}", id),
                ..Default::default()
            })
            .collect()
    }

    fn item_ids(state: &BrowseState) -> Vec<u64> {
        state.items.iter().map(|a| a.mal_id).collect()
    }

    #[test]
    fn only_one_request_in_flight() {
        let mut state = BrowseState::new();
        state.reset("naruto");

        let ticket = state.begin_fetch().expect("first fetch should start");
        // Rapid re-triggers while loading are no-ops
        assert!(state.begin_fetch().is_none());
        assert!(state.begin_fetch().is_none());

        state.apply_success(ticket, summaries(&[1]));
        assert!(state.begin_fetch().is_some());
    }

    #[test]
    fn reset_restores_initial_list_from_any_phase() {
        let mut state = BrowseState::new();
        state.reset("a");
        let ticket = state.begin_fetch().unwrap();
        state.apply_failure(ticket, "boom".into());
        assert_eq!(state.phase(), Phase::Failed);

        state.reset("b");
        assert_eq!(state.query, "b");
        assert!(state.items.is_empty());
        assert_eq!(state.page, 1);
        assert!(state.has_more);
        assert!(state.error.is_none());
        assert_eq!(state.phase(), Phase::Idle);

        let ticket = state.begin_fetch().unwrap();
        state.apply_success(ticket, Vec::new());
        assert_eq!(state.phase(), Phase::Exhausted);

        state.reset("c");
        assert!(state.has_more);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn empty_page_exhausts_without_counting() {
        let mut state = BrowseState::new();
        state.reset("obscure");

        let ticket = state.begin_fetch().unwrap();
        state.apply_success(ticket, Vec::new());

        assert_eq!(state.phase(), Phase::Exhausted);
        assert!(!state.has_more);
        assert_eq!(state.page, 1);
        assert!(state.items.is_empty());

        // Further requests are no-ops
        assert!(state.begin_fetch().is_none());
        assert_eq!(state.page, 1);
    }

    #[test]
    fn pages_append_in_arrival_order() {
        let mut state = BrowseState::new();
        state.reset("q");

        let ticket = state.begin_fetch().unwrap();
        state.apply_success(ticket, summaries(&[10, 11, 12]));

        let ticket = state.begin_fetch().unwrap();
        assert_eq!(ticket.page, 2);
        state.apply_success(ticket, summaries(&[13, 10]));

        // Page 1 untouched, page 2 appended, duplicates preserved
        assert_eq!(item_ids(&state), vec![10, 11, 12, 13, 10]);
    }

    #[test]
    fn full_page_then_empty_page() {
        let mut state = BrowseState::new();
        state.reset("naruto");

        let ticket = state.begin_fetch().unwrap();
        let ids: Vec<u64> = (1..=25).collect();
        state.apply_success(ticket, summaries(&ids));

        assert_eq!(state.phase(), Phase::Loaded);
        assert_eq!(state.page, 2);
        assert_eq!(state.items.len(), 25);
        assert!(state.has_more);

        let ticket = state.begin_fetch().unwrap();
        state.apply_success(ticket, Vec::new());

        assert_eq!(state.phase(), Phase::Exhausted);
        assert!(!state.has_more);
        assert_eq!(state.page, 2);
        assert_eq!(state.items.len(), 25);
    }

    #[test]
    fn failure_halts_lineage() {
        let mut state = BrowseState::new();
        state.reset("q");

        let ticket = state.begin_fetch().unwrap();
        state.apply_success(ticket, summaries(&[1, 2]));

        let ticket = state.begin_fetch().unwrap();
        state.apply_failure(ticket, "connection refused".into());

        assert_eq!(state.phase(), Phase::Failed);
        assert!(!state.has_more);
        assert_eq!(state.error.as_deref(), Some("connection refused"));
        // Loaded items are kept, but no further fetches happen
        assert_eq!(state.items.len(), 2);
        assert!(state.begin_fetch().is_none());
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut state = BrowseState::new();
        state.reset("first");
        let stale = state.begin_fetch().unwrap();

        // Query changes while the request is still in flight
        state.reset("second");
        let current = state.begin_fetch().unwrap();

        // The slow response for the abandoned lineage lands late
        state.apply_success(stale, summaries(&[99]));
        assert!(state.items.is_empty());
        assert_eq!(state.phase(), Phase::Loading);

        // A stale failure is ignored too
        state.apply_failure(stale, "timeout".into());
        assert!(state.error.is_none());
        assert_eq!(state.phase(), Phase::Loading);

        state.apply_success(current, summaries(&[1]));
        assert_eq!(item_ids(&state), vec![1]);
        assert_eq!(state.phase(), Phase::Loaded);
    }
}

//! Debounced quick-filter input.
//!
//! The caller supplies the clock (milliseconds), so the same state machine
//! drives browser timers in the frontend and fixed timelines in tests.
//! Matching is not done here: settled text goes to a [`QuickFilterSink`],
//! normally the grid widget.

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Receiver of settled search text.
pub trait QuickFilterSink {
    fn apply_quick_filter(&mut self, text: &str);
}

impl<F: FnMut(&str)> QuickFilterSink for F {
    fn apply_quick_filter(&mut self, text: &str) {
        self(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchInputOutcome {
    /// Text is pending until `deadline` (ms); call `poll` at or after it.
    Scheduled { deadline: u64 },
    /// Text was forwarded immediately (input cleared).
    Forwarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    text: String,
    deadline: u64,
}

#[derive(Debug, Clone)]
pub struct DebouncedSearch {
    debounce_ms: u64,
    text: String,
    pending: Option<Pending>,
    last_forwarded: Option<String>,
}

impl Default for DebouncedSearch {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl DebouncedSearch {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            text: String::new(),
            pending: None,
            last_forwarded: None,
        }
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms
    }

    /// Current input text (what the user sees, not what was forwarded).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn last_forwarded(&self) -> Option<&str> {
        self.last_forwarded.as_deref()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Registers a keystroke. Replaces any pending text and restarts the
    /// window; an empty input bypasses the window and is forwarded at once.
    pub fn on_input(
        &mut self,
        text: impl Into<String>,
        now: u64,
        sink: &mut impl QuickFilterSink,
    ) -> SearchInputOutcome {
        let text = text.into();
        if text.is_empty() {
            self.clear(sink);
            return SearchInputOutcome::Forwarded;
        }

        let deadline = now.saturating_add(self.debounce_ms);
        self.text = text.clone();
        self.pending = Some(Pending { text, deadline });
        SearchInputOutcome::Scheduled { deadline }
    }

    /// Forwards the pending text if its window has elapsed. Returns the
    /// forwarded text. Text equal to the last forwarded value is dropped.
    pub fn poll(&mut self, now: u64, sink: &mut impl QuickFilterSink) -> Option<String> {
        match &self.pending {
            Some(p) if now >= p.deadline => {}
            _ => return None,
        }
        let pending = self.pending.take()?;
        if self.last_forwarded.as_deref() == Some(pending.text.as_str()) {
            return None;
        }
        sink.apply_quick_filter(&pending.text);
        self.last_forwarded = Some(pending.text.clone());
        Some(pending.text)
    }

    /// Empties the input and forwards `""` immediately, whatever the timer state.
    pub fn clear(&mut self, sink: &mut impl QuickFilterSink) {
        self.text.clear();
        self.pending = None;
        sink.apply_quick_filter("");
        self.last_forwarded = Some(String::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drives the search with keystrokes at given times, polling every 10 ms.
    fn run_timeline(
        search: &mut DebouncedSearch,
        keystrokes: &[(u64, &str)],
        until: u64,
    ) -> Vec<(u64, String)> {
        let mut forwarded: Vec<(u64, String)> = Vec::new();
        let mut now = 0;
        while now <= until {
            for (at, text) in keystrokes {
                if *at == now {
                    let mut sink = |t: &str| forwarded.push((now, t.to_string()));
                    search.on_input(*text, now, &mut sink);
                }
            }
            let mut sink = |t: &str| forwarded.push((now, t.to_string()));
            search.poll(now, &mut sink);
            now += 10;
        }
        forwarded
    }

    #[test]
    fn test_burst_forwards_once_with_last_text() {
        let mut search = DebouncedSearch::new(300);
        let forwarded = run_timeline(
            &mut search,
            &[(0, "i"), (50, "in"), (100, "inv"), (300, "inv-2")],
            1500,
        );
        assert_eq!(forwarded, vec![(600, "inv-2".to_string())]);
        assert_eq!(search.next_deadline(), None);
    }

    #[test]
    fn test_pauses_longer_than_window_forward_each_value() {
        let mut search = DebouncedSearch::default();
        let forwarded = run_timeline(&mut search, &[(0, "ab"), (400, "abc")], 1000);
        assert_eq!(
            forwarded,
            vec![(300, "ab".to_string()), (700, "abc".to_string())]
        );
    }

    #[test]
    fn test_clear_forwards_immediately() {
        let mut search = DebouncedSearch::new(300);
        let mut seen: Vec<String> = Vec::new();
        {
            let mut sink = |t: &str| seen.push(t.to_string());
            search.on_input("acme", 0, &mut sink);
            search.on_input("", 100, &mut sink);
        }
        assert_eq!(seen, vec![String::new()]);
        assert_eq!(search.next_deadline(), None);

        // the cancelled text never arrives
        let mut sink = |t: &str| seen.push(t.to_string());
        assert_eq!(search.poll(1000, &mut sink), None);
        assert_eq!(seen, vec![String::new()]);
    }

    #[test]
    fn test_clear_without_pending_still_forwards() {
        let mut search = DebouncedSearch::new(300);
        let mut seen: Vec<String> = Vec::new();
        let mut sink = |t: &str| seen.push(t.to_string());
        search.clear(&mut sink);
        search.clear(&mut sink);
        assert_eq!(seen, vec![String::new(), String::new()]);
    }

    #[test]
    fn test_same_text_not_forwarded_twice() {
        let mut search = DebouncedSearch::new(100);
        let mut seen: Vec<String> = Vec::new();
        let mut sink = |t: &str| seen.push(t.to_string());
        search.on_input("abc", 0, &mut sink);
        assert_eq!(search.poll(100, &mut sink), Some("abc".to_string()));
        search.on_input("abcd", 150, &mut sink);
        search.on_input("abc", 160, &mut sink);
        assert_eq!(search.poll(260, &mut sink), None);
        assert_eq!(seen, vec!["abc".to_string()]);
        assert_eq!(search.text(), "abc");
    }

    #[test]
    fn test_early_poll_keeps_pending() {
        let mut search = DebouncedSearch::new(300);
        let mut sink = |_: &str| {};
        let outcome = search.on_input("x", 10, &mut sink);
        assert_eq!(outcome, SearchInputOutcome::Scheduled { deadline: 310 });
        assert_eq!(search.poll(309, &mut sink), None);
        assert_eq!(search.next_deadline(), Some(310));
        assert_eq!(search.poll(310, &mut sink), Some("x".to_string()));
    }
}

//! Report view model
//!
//! Holds the per-card presentation state of a compliance report and the
//! client-side full-text search over it. Cards are filtered by toggling
//! their visibility; they are never removed.

use thiserror::Error;

use crate::domain::report::ReportEntry;

/// Default minimum search input length
pub const DEFAULT_MIN_SEARCH_LEN: usize = 3;

/// Prefixes that switch a search into keyword mode
const KEYWORD_PREFIXES: &[&str] = &["explain", "show", "объяснить", "показать"];

/// Keywords this short or shorter are ignored in keyword mode
const MAX_IGNORED_KEYWORD_LEN: usize = 2;

/// Rejected search input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("enter at least {min} characters to search")]
    TooShort { min: usize },
}

/// Parsed search input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Whole-phrase substring match
    Literal(String),
    /// Match when any keyword is a substring
    Keywords(Vec<String>),
}

impl SearchQuery {
    /// Parses raw input, rejecting anything shorter than `min_len` characters
    pub fn parse(input: &str, min_len: usize) -> Result<Self, SearchError> {
        let term = input.trim().to_lowercase();
        if term.chars().count() < min_len {
            return Err(SearchError::TooShort { min: min_len });
        }

        for prefix in KEYWORD_PREFIXES {
            let Some(rest) = term.strip_prefix(prefix) else {
                continue;
            };
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                let keywords = rest
                    .split_whitespace()
                    .filter(|word| word.chars().count() > MAX_IGNORED_KEYWORD_LEN)
                    .map(str::to_string)
                    .collect();
                return Ok(SearchQuery::Keywords(keywords));
            }
        }

        Ok(SearchQuery::Literal(term))
    }

    /// Tests a case-folded haystack
    pub fn matches(&self, haystack: &str) -> bool {
        match self {
            SearchQuery::Literal(term) => haystack.contains(term.as_str()),
            SearchQuery::Keywords(keywords) => {
                keywords.iter().any(|k| haystack.contains(k.as_str()))
            }
        }
    }

    pub fn is_keyword_mode(&self) -> bool {
        matches!(self, SearchQuery::Keywords(_))
    }
}

/// Presentation state of one report entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub entry: ReportEntry,
    /// Criticality and analysis panel shown
    pub expanded: bool,
    pub visible: bool,
    pub highlighted: bool,
}

impl Card {
    fn new(entry: ReportEntry) -> Self {
        Self {
            entry,
            expanded: false,
            visible: true,
            highlighted: false,
        }
    }
}

/// Explanation shown in the side panel for a keyword-mode match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelEntry {
    /// Index of the matching card
    pub card: usize,
    pub requirement: String,
    pub analysis: String,
    pub section: String,
}

impl PanelEntry {
    /// Query that shows every card of this entry's section
    pub fn reference_query(&self) -> String {
        format!("show section {}", self.section)
    }
}

/// Result set of one search, derived fresh each time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Indices of matching cards, in report order
    pub matched: Vec<usize>,
    /// Side panel entries; empty for literal searches
    pub panel: Vec<PanelEntry>,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }
}

/// Ordered set of report cards
#[derive(Debug, Clone, Default)]
pub struct ReportView {
    cards: Vec<Card>,
}

impl ReportView {
    pub fn new(entries: Vec<ReportEntry>) -> Self {
        Self {
            cards: entries.into_iter().map(Card::new).collect(),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards currently shown, with their indices
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Card)> {
        self.cards.iter().enumerate().filter(|(_, c)| c.visible)
    }

    /// Flips the "show more" panel of one card
    ///
    /// Returns the new state, or `None` for an out-of-range index.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let card = self.cards.get_mut(index)?;
        card.expanded = !card.expanded;
        Some(card.expanded)
    }

    /// Shows every card again and drops highlighting
    pub fn reset(&mut self) {
        for card in &mut self.cards {
            card.visible = true;
            card.highlighted = false;
        }
    }

    /// Filters the cards by `input`
    ///
    /// Cards are reset first. Input shorter than `min_len` is rejected and
    /// leaves every card visible. Matching cards are highlighted and
    /// expanded; the rest are hidden.
    pub fn search(&mut self, input: &str, min_len: usize) -> Result<SearchOutcome, SearchError> {
        self.reset();
        let query = SearchQuery::parse(input, min_len)?;
        Ok(self.apply(&query))
    }

    fn apply(&mut self, query: &SearchQuery) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();

        for (index, card) in self.cards.iter_mut().enumerate() {
            if query.matches(&card.entry.haystack()) {
                card.highlighted = true;
                card.expanded = true;
                outcome.matched.push(index);

                if query.is_keyword_mode() {
                    outcome.panel.push(PanelEntry {
                        card: index,
                        requirement: card.entry.requirement.clone(),
                        analysis: card.entry.analysis.clone(),
                        section: card.entry.section().to_string(),
                    });
                }
            } else {
                card.visible = false;
            }
        }

        outcome
    }
}

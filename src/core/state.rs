//! Application state owned by the controller.
use crate::core::conversion::{Conversion, parse_amount};
use crate::core::currency::{CurrencyCatalog, RateSnapshot};
use crate::core::history::{ConversionRecord, History, SortOrder};
use crate::core::pagination::PageCursor;
use anyhow::anyhow;
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Convert,
    Rates,
    History,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Convert, Tab::Rates, Tab::History];
}

impl Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Tab::Convert => "convert",
                Tab::Rates => "rates",
                Tab::History => "history",
            }
        )
    }
}

impl FromStr for Tab {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "convert" | "main" => Ok(Tab::Convert),
            "rates" | "popular" => Ok(Tab::Rates),
            "history" => Ok(Tab::History),
            _ => Err(anyhow!("Invalid tab: {}", s)),
        }
    }
}

/// A conversion request waiting for its rate.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConversion {
    pub request_id: u64,
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// Outcome of the most recent conversion attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    Converted(Conversion),
    Failed(String),
}

/// One page of the popular rates panel, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct RatesView {
    pub base: String,
    pub entries: Vec<(String, f64)>,
    pub page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// One page of the history panel, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryView {
    pub entries: Vec<ConversionRecord>,
    pub sort_order: SortOrder,
    pub page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl HistoryView {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Navigation is only shown when there is more than one page.
    pub fn show_pagination(&self) -> bool {
        self.total_pages > 1
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    catalog: CurrencyCatalog,
    from: Option<String>,
    to: Option<String>,
    default_from: String,
    default_to: String,
    amount_input: String,
    pending: Option<PendingConversion>,
    next_request_id: u64,
    last_conversion: Option<ConversionOutcome>,
    popular_base: String,
    snapshot: Option<RateSnapshot>,
    rates_cursor: PageCursor,
    history: History,
    history_cursor: PageCursor,
    sort_order: SortOrder,
    active_tab: Tab,
    confirm_clear_pending: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new("USD", History::default())
    }
}

impl AppState {
    pub fn new(popular_base: &str, history: History) -> Self {
        Self {
            catalog: CurrencyCatalog::default(),
            from: None,
            to: None,
            default_from: "USD".to_string(),
            default_to: "EUR".to_string(),
            amount_input: String::new(),
            pending: None,
            next_request_id: 1,
            last_conversion: None,
            popular_base: popular_base.to_string(),
            snapshot: None,
            rates_cursor: PageCursor::default(),
            history,
            history_cursor: PageCursor::default(),
            sort_order: SortOrder::default(),
            active_tab: Tab::default(),
            confirm_clear_pending: false,
        }
    }

    /// Currencies selected once the catalog arrives, if the user hasn't
    /// picked valid ones already.
    pub fn with_defaults(mut self, from: &str, to: &str) -> Self {
        self.default_from = from.to_string();
        self.default_to = to.to_string();
        self
    }

    pub fn catalog(&self) -> &CurrencyCatalog {
        &self.catalog
    }

    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to(&self) -> Option<&str> {
        self.to.as_deref()
    }

    pub fn amount_input(&self) -> &str {
        &self.amount_input
    }

    pub fn amount(&self) -> Option<f64> {
        parse_amount(&self.amount_input)
    }

    pub fn pending(&self) -> Option<&PendingConversion> {
        self.pending.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// The convert control is usable with a valid amount and nothing in flight.
    pub fn convert_enabled(&self) -> bool {
        self.amount().is_some() && !self.is_busy()
    }

    pub fn last_conversion(&self) -> Option<&ConversionOutcome> {
        self.last_conversion.as_ref()
    }

    pub fn popular_base(&self) -> &str {
        &self.popular_base
    }

    pub fn snapshot(&self) -> Option<&RateSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn rates_page(&self) -> usize {
        self.rates_cursor.current_page()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_page(&self) -> usize {
        self.history_cursor.current_page()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn confirm_clear_pending(&self) -> bool {
        self.confirm_clear_pending
    }

    pub(crate) fn set_catalog(&mut self, catalog: CurrencyCatalog) {
        self.catalog = catalog;
        let from = self.valid_or_default(self.from.clone(), &self.default_from);
        let to = self.valid_or_default(self.to.clone(), &self.default_to);
        self.from = from;
        self.to = to;
    }

    fn valid_or_default(&self, current: Option<String>, default: &str) -> Option<String> {
        match current {
            Some(code) if self.catalog.contains(&code) => Some(code),
            _ if self.catalog.contains(default) => Some(default.to_string()),
            _ => self.catalog.first_code().map(str::to_string),
        }
    }

    pub(crate) fn set_from(&mut self, code: String) {
        self.from = Some(code);
    }

    pub(crate) fn set_to(&mut self, code: String) {
        self.to = Some(code);
    }

    pub(crate) fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    pub(crate) fn set_amount_input(&mut self, input: String) {
        self.amount_input = input;
    }

    pub(crate) fn begin_conversion(&mut self, from: &str, to: &str, amount: f64) -> u64 {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.pending = Some(PendingConversion {
            request_id,
            from: from.to_string(),
            to: to.to_string(),
            amount,
        });
        request_id
    }

    /// Takes the pending conversion if `request_id` is the latest request.
    pub(crate) fn finish_conversion(&mut self, request_id: u64) -> Option<PendingConversion> {
        match &self.pending {
            Some(pending) if pending.request_id == request_id => self.pending.take(),
            _ => None,
        }
    }

    /// Drops the pending conversion so its response is treated as stale.
    pub(crate) fn cancel_conversion(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(request_id = pending.request_id, "Cancelled pending conversion");
        }
    }

    pub(crate) fn set_last_conversion(&mut self, outcome: ConversionOutcome) {
        self.last_conversion = Some(outcome);
    }

    pub(crate) fn replace_snapshot(&mut self, snapshot: RateSnapshot) {
        self.snapshot = Some(snapshot);
        self.rates_cursor.reset();
    }

    fn snapshot_len(&self) -> usize {
        self.snapshot.as_ref().map_or(0, RateSnapshot::len)
    }

    pub(crate) fn next_rates_page(&mut self) -> bool {
        let len = self.snapshot_len();
        self.rates_cursor.next(len)
    }

    pub(crate) fn prev_rates_page(&mut self) -> bool {
        self.rates_cursor.prev()
    }

    pub(crate) fn go_to_rates_page(&mut self, page: usize) {
        let len = self.snapshot_len();
        self.rates_cursor.go_to(page, len);
    }

    pub(crate) fn add_record(&mut self, record: ConversionRecord) {
        self.history.add(record);
    }

    pub(crate) fn clear_history(&mut self) {
        self.history.clear();
    }

    pub(crate) fn next_history_page(&mut self) -> bool {
        self.history_cursor.next(self.history.len())
    }

    pub(crate) fn prev_history_page(&mut self) -> bool {
        self.history_cursor.prev()
    }

    pub(crate) fn go_to_history_page(&mut self, page: usize) {
        self.history_cursor.go_to(page, self.history.len());
    }

    pub(crate) fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
    }

    pub(crate) fn set_active_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub(crate) fn set_confirm_clear_pending(&mut self, pending: bool) {
        self.confirm_clear_pending = pending;
    }

    /// Current page of popular rates, or `None` before the first snapshot.
    pub fn rates_view(&mut self) -> Option<RatesView> {
        let snapshot = self.snapshot.as_ref()?;
        let page = self.rates_cursor.slice(snapshot.rates());
        Some(RatesView {
            base: snapshot.base.clone(),
            entries: page.items.to_vec(),
            page: page.number,
            total_pages: page.total_pages,
            has_prev: page.has_prev(),
            has_next: page.has_next(),
        })
    }

    /// Current history page in the selected order. Clamps the cursor.
    pub fn history_view(&mut self) -> HistoryView {
        let sorted = self.history.sorted(self.sort_order);
        let page = self.history_cursor.slice(&sorted);
        HistoryView {
            entries: page.items.to_vec(),
            sort_order: self.sort_order,
            page: page.number,
            total_pages: page.total_pages,
            has_prev: page.has_prev(),
            has_next: page.has_next(),
        }
    }
}

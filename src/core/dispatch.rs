//! Typed messages, effects and the pure state transition between them.
//!
//! `update` never performs I/O. Network calls, persistence and rendering are
//! returned as [`Effect`]s for the controller to carry out; their results come
//! back in as further [`Msg`]s.
use crate::core::conversion::Conversion;
use crate::core::currency::{CurrencyCatalog, RateSnapshot, normalize_code};
use crate::core::history::{History, SortOrder};
use crate::core::state::{AppState, ConversionOutcome, HistoryView, RatesView, Tab};
use chrono::{DateTime, Utc};
use tracing::{debug, error, warn};

pub const INVALID_AMOUNT_ALERT: &str = "Please enter a valid amount";
pub const CONVERSION_FAILED_ALERT: &str = "Error converting currency. Please try again.";
pub const RESULT_PLACEHOLDER: &str = "Error";
pub const RATE_PLACEHOLDER: &str = "Unable to fetch rate";

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Init,
    CatalogLoaded(CurrencyCatalog),
    CatalogFailed(String),
    AmountChanged(String),
    FromChanged(String),
    ToChanged(String),
    Convert,
    Swap,
    RateFetched {
        request_id: u64,
        rate: f64,
        at: DateTime<Utc>,
    },
    RateFailed {
        request_id: u64,
        error: String,
    },
    RefreshPopularRates,
    PopularRatesLoaded(RateSnapshot),
    PopularRatesFailed(String),
    NextRatesPage,
    PrevRatesPage,
    GoToRatesPage(usize),
    QuickSet(String),
    NextHistoryPage,
    PrevHistoryPage,
    GoToHistoryPage(usize),
    SortHistory(SortOrder),
    RequestClearHistory,
    ConfirmClearHistory,
    CancelClearHistory,
    SelectTab(Tab),
}

/// Something for the view to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Render {
    CurrencyOptions {
        options: Vec<(String, String)>,
        from: Option<String>,
        to: Option<String>,
    },
    CatalogUnavailable,
    Selection {
        from: Option<String>,
        to: Option<String>,
    },
    ConvertControl {
        enabled: bool,
        busy: bool,
    },
    ConversionResult {
        result: String,
        rate_text: String,
    },
    PopularRates(RatesView),
    PopularRatesUnavailable,
    History(HistoryView),
    Tabs(Tab),
    ConfirmClear {
        count: usize,
    },
    Alert(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchCatalog,
    FetchPopularRates {
        base: String,
    },
    FetchRate {
        request_id: u64,
        from: String,
        to: String,
    },
    PersistHistory(History),
    Render(Render),
}

/// Applies `msg` to `state`, returning the new state and the effects to run.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let mut effects = Vec::new();
    match msg {
        Msg::Init => {
            effects.push(Effect::FetchCatalog);
            effects.push(render_history(&mut state));
            effects.push(render_convert_control(&state));
            effects.push(Effect::Render(Render::Tabs(state.active_tab())));
        }
        Msg::CatalogLoaded(catalog) => {
            debug!(count = catalog.len(), "Currency catalog loaded");
            state.set_catalog(catalog);
            effects.push(Effect::Render(Render::CurrencyOptions {
                options: state.catalog().entries().to_vec(),
                from: state.from().map(str::to_string),
                to: state.to().map(str::to_string),
            }));
            effects.push(Effect::FetchPopularRates {
                base: state.popular_base().to_string(),
            });
        }
        Msg::CatalogFailed(e) => {
            error!(error = %e, "Error loading currencies");
            effects.push(Effect::Render(Render::CatalogUnavailable));
        }
        Msg::AmountChanged(input) => {
            state.set_amount_input(input);
            effects.push(render_convert_control(&state));
        }
        Msg::FromChanged(code) => {
            if let Some(code) = accept_code(&state, &code, &mut effects) {
                state.set_from(code);
                effects.push(render_selection(&state));
                convert_if_amount(&mut state, &mut effects);
            }
        }
        Msg::ToChanged(code) => {
            if let Some(code) = accept_code(&state, &code, &mut effects) {
                state.set_to(code);
                effects.push(render_selection(&state));
                convert_if_amount(&mut state, &mut effects);
            }
        }
        Msg::Convert => convert(&mut state, &mut effects),
        Msg::Swap => {
            state.swap();
            effects.push(render_selection(&state));
            convert_if_amount(&mut state, &mut effects);
        }
        Msg::RateFetched {
            request_id,
            rate,
            at,
        } => {
            let Some(pending) = state.finish_conversion(request_id) else {
                debug!(request_id, "Ignoring stale rate response");
                return (state, effects);
            };
            if !(rate.is_finite() && rate > 0.0) {
                let e = format!("Rate not found for {}/{}", pending.from, pending.to);
                conversion_failed(&mut state, &mut effects, e);
                return (state, effects);
            }

            let conversion = Conversion::at_rate(&pending.from, &pending.to, pending.amount, rate);
            effects.push(Effect::Render(Render::ConversionResult {
                result: conversion.result.clone(),
                rate_text: conversion.rate_text(),
            }));
            state.set_last_conversion(ConversionOutcome::Converted(conversion.clone()));
            state.add_record(conversion.into_record(at));
            effects.push(render_history(&mut state));
            effects.push(Effect::PersistHistory(state.history().clone()));
            effects.push(render_convert_control(&state));
        }
        Msg::RateFailed { request_id, error } => {
            if state.finish_conversion(request_id).is_none() {
                debug!(request_id, "Ignoring stale rate failure");
                return (state, effects);
            }
            conversion_failed(&mut state, &mut effects, error);
        }
        Msg::RefreshPopularRates => {
            effects.push(Effect::FetchPopularRates {
                base: state.popular_base().to_string(),
            });
        }
        Msg::PopularRatesLoaded(mut snapshot) => {
            if !state.catalog().is_empty() {
                let dropped = snapshot.retain_known(state.catalog());
                if dropped > 0 {
                    debug!(dropped, "Dropped rates for currencies outside the catalog");
                }
            }
            state.replace_snapshot(snapshot);
            effects.extend(render_rates(&mut state));
        }
        Msg::PopularRatesFailed(e) => {
            error!(error = %e, "Error loading rates");
            effects.push(Effect::Render(Render::PopularRatesUnavailable));
        }
        Msg::NextRatesPage => {
            if state.next_rates_page() {
                effects.extend(render_rates(&mut state));
            }
        }
        Msg::PrevRatesPage => {
            if state.prev_rates_page() {
                effects.extend(render_rates(&mut state));
            }
        }
        Msg::GoToRatesPage(page) => {
            state.go_to_rates_page(page);
            effects.extend(render_rates(&mut state));
        }
        Msg::QuickSet(code) => {
            if let Some(code) = accept_code(&state, &code, &mut effects) {
                let base = state.popular_base().to_string();
                state.set_from(base);
                state.set_to(code);
                effects.push(render_selection(&state));
                convert_if_amount(&mut state, &mut effects);
                state.set_active_tab(Tab::Convert);
                effects.push(Effect::Render(Render::Tabs(Tab::Convert)));
            }
        }
        Msg::NextHistoryPage => {
            if state.next_history_page() {
                effects.push(render_history(&mut state));
            }
        }
        Msg::PrevHistoryPage => {
            if state.prev_history_page() {
                effects.push(render_history(&mut state));
            }
        }
        Msg::GoToHistoryPage(page) => {
            state.go_to_history_page(page);
            effects.push(render_history(&mut state));
        }
        Msg::SortHistory(order) => {
            state.set_sort_order(order);
            effects.push(render_history(&mut state));
        }
        Msg::RequestClearHistory => {
            state.set_confirm_clear_pending(true);
            effects.push(Effect::Render(Render::ConfirmClear {
                count: state.history().len(),
            }));
        }
        Msg::ConfirmClearHistory => {
            if !state.confirm_clear_pending() {
                warn!("Clear confirmed without a pending request, ignoring");
                return (state, effects);
            }
            state.set_confirm_clear_pending(false);
            state.clear_history();
            effects.push(render_history(&mut state));
            effects.push(Effect::PersistHistory(state.history().clone()));
        }
        Msg::CancelClearHistory => {
            state.set_confirm_clear_pending(false);
        }
        Msg::SelectTab(tab) => {
            state.set_active_tab(tab);
            effects.push(Effect::Render(Render::Tabs(tab)));
        }
    }
    (state, effects)
}

/// Normalizes `code` and checks it against a loaded catalog.
fn accept_code(state: &AppState, code: &str, effects: &mut Vec<Effect>) -> Option<String> {
    let code = normalize_code(code);
    if code.is_empty() || (!state.catalog().is_empty() && !state.catalog().contains(&code)) {
        effects.push(Effect::Render(Render::Alert(format!(
            "Unknown currency: {code}"
        ))));
        return None;
    }
    Some(code)
}

fn convert_if_amount(state: &mut AppState, effects: &mut Vec<Effect>) {
    if state.amount().is_some() {
        convert(state, effects);
    }
}

fn convert(state: &mut AppState, effects: &mut Vec<Effect>) {
    let Some(amount) = state.amount() else {
        effects.push(Effect::Render(Render::Alert(
            INVALID_AMOUNT_ALERT.to_string(),
        )));
        effects.push(render_convert_control(state));
        return;
    };
    let (Some(from), Some(to)) = (state.from(), state.to()) else {
        effects.push(Effect::Render(Render::Alert(
            "Please select both currencies".to_string(),
        )));
        return;
    };
    let (from, to) = (from.to_string(), to.to_string());

    if from == to {
        state.cancel_conversion();
        let conversion = Conversion::identity(&from, amount);
        effects.push(Effect::Render(Render::ConversionResult {
            result: conversion.result.clone(),
            rate_text: conversion.rate_text(),
        }));
        state.set_last_conversion(ConversionOutcome::Converted(conversion));
        effects.push(render_convert_control(state));
        return;
    }

    let request_id = state.begin_conversion(&from, &to, amount);
    debug!(request_id, %from, %to, amount, "Requesting conversion rate");
    effects.push(render_convert_control(state));
    effects.push(Effect::FetchRate {
        request_id,
        from,
        to,
    });
}

fn conversion_failed(state: &mut AppState, effects: &mut Vec<Effect>, e: String) {
    error!(error = %e, "Error converting");
    effects.push(Effect::Render(Render::ConversionResult {
        result: RESULT_PLACEHOLDER.to_string(),
        rate_text: RATE_PLACEHOLDER.to_string(),
    }));
    effects.push(Effect::Render(Render::Alert(
        CONVERSION_FAILED_ALERT.to_string(),
    )));
    state.set_last_conversion(ConversionOutcome::Failed(e));
    effects.push(render_convert_control(state));
}

fn render_convert_control(state: &AppState) -> Effect {
    Effect::Render(Render::ConvertControl {
        enabled: state.convert_enabled(),
        busy: state.is_busy(),
    })
}

fn render_selection(state: &AppState) -> Effect {
    Effect::Render(Render::Selection {
        from: state.from().map(str::to_string),
        to: state.to().map(str::to_string),
    })
}

fn render_history(state: &mut AppState) -> Effect {
    Effect::Render(Render::History(state.history_view()))
}

fn render_rates(state: &mut AppState) -> Option<Effect> {
    state
        .rates_view()
        .map(|view| Effect::Render(Render::PopularRates(view)))
}

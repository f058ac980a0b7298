//! Runs the state machine: applies messages, then carries out the effects.
use crate::core::dispatch::{Effect, Msg, Render, update};
use crate::core::state::AppState;
use crate::core::storage::KeyValueStorage;
use crate::providers::FrankfurterClient;
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error};

/// Draws whatever the state machine asks for.
pub trait View {
    fn render(&mut self, render: &Render);
}

pub struct Controller<V: View> {
    state: AppState,
    client: FrankfurterClient,
    storage: Arc<dyn KeyValueStorage>,
    view: V,
    tasks: JoinSet<Msg>,
}

impl<V: View> Controller<V> {
    pub fn new(
        state: AppState,
        client: FrankfurterClient,
        storage: Arc<dyn KeyValueStorage>,
        view: V,
    ) -> Self {
        Self {
            state,
            client,
            storage,
            view,
            tasks: JoinSet::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Number of fetches still running.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Applies `msg` and runs the resulting effects. Fetches are spawned;
    /// their results arrive through [`Controller::next_message`].
    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Render(render) => self.view.render(&render),
            Effect::PersistHistory(history) => {
                if let Err(e) = history.save(self.storage.as_ref()) {
                    error!(error = %e, "Failed to save conversion history");
                    self.view.render(&Render::Alert(format!(
                        "Could not save conversion history: {e}"
                    )));
                }
            }
            Effect::FetchCatalog => {
                let client = self.client.clone();
                self.tasks.spawn(async move {
                    match client.fetch_currencies().await {
                        Ok(catalog) => Msg::CatalogLoaded(catalog),
                        Err(e) => Msg::CatalogFailed(format!("{e:#}")),
                    }
                });
            }
            Effect::FetchPopularRates { base } => {
                let client = self.client.clone();
                self.tasks.spawn(async move {
                    match client.fetch_latest(&base, None).await {
                        Ok(snapshot) => Msg::PopularRatesLoaded(snapshot),
                        Err(e) => Msg::PopularRatesFailed(format!("{e:#}")),
                    }
                });
            }
            Effect::FetchRate {
                request_id,
                from,
                to,
            } => {
                let client = self.client.clone();
                self.tasks.spawn(async move {
                    match client.fetch_rate(&from, &to).await {
                        Ok(rate) => Msg::RateFetched {
                            request_id,
                            rate,
                            at: Utc::now(),
                        },
                        Err(e) => Msg::RateFailed {
                            request_id,
                            error: format!("{e:#}"),
                        },
                    }
                });
            }
        }
    }

    /// Waits for the next finished fetch. Returns `None` when nothing is in
    /// flight.
    pub async fn next_message(&mut self) -> Option<Msg> {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(msg) => return Some(msg),
                Err(e) => error!(error = %e, "Fetch task failed"),
            }
        }
        None
    }

    /// Dispatches fetch results until no fetch is left running.
    pub async fn settle(&mut self) {
        while let Some(msg) = self.next_message().await {
            debug!(?msg, "Fetch finished");
            self.dispatch(msg);
        }
    }
}

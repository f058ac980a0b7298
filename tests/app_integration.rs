use chrono::Utc;
use std::fs;
use std::sync::Arc;
use tracing::info;
use xfx::app::{Controller, View};
use xfx::core::dispatch::{Msg, Render};
use xfx::core::history::{HISTORY_STORAGE_KEY, History, SortOrder};
use xfx::core::state::{AppState, ConversionOutcome};
use xfx::core::storage::KeyValueStorage;
use xfx::providers::FrankfurterClient;
use xfx::store::MemoryStorage;

mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const CURRENCIES: &str = r#"{
        "AUD": "Australian Dollar",
        "EUR": "Euro",
        "GBP": "British Pound",
        "INR": "Indian Rupee",
        "JPY": "Japanese Yen",
        "USD": "United States Dollar"
    }"#;

    pub const USD_RATES: &str = r#"{
        "amount": 1.0,
        "base": "USD",
        "date": "2024-05-01",
        "rates": {"AUD": 1.5301, "EUR": 0.92, "GBP": 0.7981, "INR": 83.41, "JPY": 151.2, "XAU": 0.0004}
    }"#;

    pub async fn create_mock_server() -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/currencies"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CURRENCIES))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("base", "USD"))
            .and(query_param("symbols", "EUR"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"amount": 1.0, "base": "USD", "date": "2024-05-01", "rates": {"EUR": 0.92}}"#,
            ))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("base", "USD"))
            .respond_with(ResponseTemplate::new(200).set_body_string(USD_RATES))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub async fn create_failing_server() -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;
        mock_server
    }
}

/// Keeps every render for inspection.
#[derive(Default)]
struct RecordingView {
    renders: Vec<Render>,
}

impl View for RecordingView {
    fn render(&mut self, render: &Render) {
        self.renders.push(render.clone());
    }
}

impl RecordingView {
    fn alerts(&self) -> Vec<&str> {
        self.renders
            .iter()
            .filter_map(|r| match r {
                Render::Alert(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn controller(
    base_url: &str,
    storage: Arc<MemoryStorage>,
) -> Controller<RecordingView> {
    let client = FrankfurterClient::new(base_url).unwrap();
    let state = AppState::new("USD", History::load(storage.as_ref()))
        .with_defaults("USD", "EUR");
    Controller::new(state, client, storage, RecordingView::default())
}

#[test_log::test(tokio::test)]
async fn test_startup_loads_catalog_and_popular_rates() {
    let mock_server = test_utils::create_mock_server().await;
    let storage = Arc::new(MemoryStorage::new());
    let mut controller = controller(&mock_server.uri(), storage);

    controller.dispatch(Msg::Init);
    controller.settle().await;

    let state = controller.state();
    assert_eq!(state.catalog().len(), 6);
    assert_eq!(state.from(), Some("USD"));
    assert_eq!(state.to(), Some("EUR"));

    // XAU is not in the catalog
    let snapshot = state.snapshot().expect("popular rates should be loaded");
    assert_eq!(snapshot.len(), 5);
    assert_eq!(snapshot.get("XAU"), None);

    let rates = controller
        .view()
        .renders
        .iter()
        .find_map(|r| match r {
            Render::PopularRates(view) => Some(view.clone()),
            _ => None,
        })
        .expect("popular rates should be rendered");
    info!(?rates, "Rendered popular rates");
    assert_eq!(rates.page, 1);
    assert_eq!(rates.total_pages, 1);
    assert_eq!(rates.entries.first().map(|(c, _)| c.as_str()), Some("AUD"));
}

#[test_log::test(tokio::test)]
async fn test_conversion_is_recorded_and_persisted() {
    let mock_server = test_utils::create_mock_server().await;
    let storage = Arc::new(MemoryStorage::new());
    let mut controller = controller(&mock_server.uri(), Arc::clone(&storage));

    controller.dispatch(Msg::Init);
    controller.settle().await;
    controller.dispatch(Msg::AmountChanged("100".to_string()));
    controller.dispatch(Msg::Convert);
    assert!(controller.state().is_busy());
    assert_eq!(controller.in_flight(), 1);
    controller.settle().await;

    assert!(!controller.state().is_busy());
    assert_eq!(controller.in_flight(), 0);
    match controller.state().last_conversion() {
        Some(ConversionOutcome::Converted(conversion)) => {
            assert_eq!(conversion.result, "92.00");
            assert_eq!(conversion.rate_text(), "Rate: 1 USD = 0.9200 EUR");
        }
        other => panic!("Expected a conversion, got {other:?}"),
    }
    assert!(controller.view().renders.contains(&Render::ConversionResult {
        result: "92.00".to_string(),
        rate_text: "Rate: 1 USD = 0.9200 EUR".to_string(),
    }));

    let stored = storage.get(HISTORY_STORAGE_KEY).unwrap().unwrap();
    let reloaded = History::load(storage.as_ref());
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.records()[0].from, "USD");
    assert_eq!(reloaded.records()[0].to, "EUR");
    assert!(stored.contains("\"result\":\"92.00\""));
    assert!(reloaded.records()[0].timestamp <= Utc::now());
}

#[test_log::test(tokio::test)]
async fn test_history_survives_restart_and_clear_persists() {
    let mock_server = test_utils::create_mock_server().await;
    let storage = Arc::new(MemoryStorage::new());

    let mut first = controller(&mock_server.uri(), Arc::clone(&storage));
    for amount in ["1", "2", "3"] {
        first.dispatch(Msg::AmountChanged(amount.to_string()));
        first.dispatch(Msg::Convert);
        first.settle().await;
    }
    assert_eq!(first.state().history().len(), 3);

    let mut second = controller(&mock_server.uri(), Arc::clone(&storage));
    assert_eq!(second.state().history().len(), 3);
    let oldest = second.state().history().sorted(SortOrder::Oldest);
    assert_eq!(oldest[0].amount, 1.0);
    assert_eq!(oldest[2].amount, 3.0);

    second.dispatch(Msg::RequestClearHistory);
    assert!(second.view().renders.contains(&Render::ConfirmClear { count: 3 }));
    second.dispatch(Msg::ConfirmClearHistory);

    assert!(second.state().history().is_empty());
    assert_eq!(
        storage.get(HISTORY_STORAGE_KEY).unwrap(),
        Some("[]".to_string())
    );
}

#[test_log::test(tokio::test)]
async fn test_failed_rate_shows_placeholders_and_alert() {
    let mock_server = test_utils::create_failing_server().await;
    let storage = Arc::new(MemoryStorage::new());
    let mut controller = controller(&mock_server.uri(), Arc::clone(&storage));

    controller.dispatch(Msg::Init);
    controller.settle().await;
    assert!(controller.view().renders.contains(&Render::CatalogUnavailable));

    controller.dispatch(Msg::AmountChanged("10".to_string()));
    controller.dispatch(Msg::Convert);
    controller.settle().await;

    assert!(matches!(
        controller.state().last_conversion(),
        Some(ConversionOutcome::Failed(_))
    ));
    assert!(controller.view().renders.contains(&Render::ConversionResult {
        result: "Error".to_string(),
        rate_text: "Unable to fetch rate".to_string(),
    }));
    assert!(!controller.view().alerts().is_empty());
    assert!(controller.state().history().is_empty());
    assert_eq!(storage.get(HISTORY_STORAGE_KEY).unwrap(), None);
}

#[test_log::test(tokio::test)]
async fn test_run_convert_command_with_config() {
    let mock_server = test_utils::create_mock_server().await;
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("config.yaml");
    let data_path = temp_dir.path().join("data");

    let config = format!(
        "provider:\n  base_url: \"{}\"\npopular_base: USD\ndata_path: \"{}\"\n",
        mock_server.uri(),
        data_path.display()
    );
    fs::write(&config_path, config).unwrap();

    let result = xfx::run_command(
        xfx::AppCommand::Convert {
            amount: "25".to_string(),
            from: "usd".to_string(),
            to: "eur".to_string(),
        },
        config_path.to_str(),
    )
    .await;

    assert!(result.is_ok(), "Convert failed: {:?}", result.err());
    assert!(data_path.join("storage").exists());
}

#[test_log::test(tokio::test)]
async fn test_run_convert_command_reports_failure() {
    let mock_server = test_utils::create_failing_server().await;
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("config.yaml");

    let config = format!(
        "provider:\n  base_url: \"{}\"\ndata_path: \"{}\"\n",
        mock_server.uri(),
        temp_dir.path().join("data").display()
    );
    fs::write(&config_path, config).unwrap();

    let result = xfx::run_command(
        xfx::AppCommand::Convert {
            amount: "25".to_string(),
            from: "USD".to_string(),
            to: "EUR".to_string(),
        },
        config_path.to_str(),
    )
    .await;

    let err = result.expect_err("Convert should fail when the provider is down");
    assert!(err.to_string().contains("Conversion failed"));
}

#[test_log::test(tokio::test)]
async fn test_run_convert_command_rejects_bad_amount() {
    let mock_server = test_utils::create_mock_server().await;
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("config.yaml");

    let config = format!(
        "provider:\n  base_url: \"{}\"\ndata_path: \"{}\"\n",
        mock_server.uri(),
        temp_dir.path().join("data").display()
    );
    fs::write(&config_path, config).unwrap();

    let result = xfx::run_command(
        xfx::AppCommand::Convert {
            amount: "-3".to_string(),
            from: "USD".to_string(),
            to: "EUR".to_string(),
        },
        config_path.to_str(),
    )
    .await;

    assert!(result.is_err());
}

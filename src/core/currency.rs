//! Currency catalog and rate snapshot types

/// Upper-cases and trims a currency code typed by the user.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Supported currencies as `(code, display name)` pairs, in the order the
/// API listed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrencyCatalog {
    entries: Vec<(String, String)>,
}

impl CurrencyCatalog {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.iter().any(|(c, _)| c == code)
    }

    pub fn name(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, name)| name.as_str())
    }

    pub fn first_code(&self) -> Option<&str> {
        self.entries.first().map(|(c, _)| c.as_str())
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All rates for one base currency at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSnapshot {
    pub base: String,
    pub date: Option<String>,
    rates: Vec<(String, f64)>,
}

impl RateSnapshot {
    pub fn new(base: &str, date: Option<String>, rates: Vec<(String, f64)>) -> Self {
        Self {
            base: base.to_string(),
            date,
            rates,
        }
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, rate)| *rate)
    }

    pub fn rates(&self) -> &[(String, f64)] {
        &self.rates
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Drops every rate whose code the catalog doesn't know. Returns how
    /// many were dropped.
    pub fn retain_known(&mut self, catalog: &CurrencyCatalog) -> usize {
        let before = self.rates.len();
        self.rates.retain(|(code, _)| catalog.contains(code));
        before - self.rates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CurrencyCatalog {
        CurrencyCatalog::new(vec![
            ("EUR".to_string(), "Euro".to_string()),
            ("GBP".to_string(), "British Pound".to_string()),
            ("USD".to_string(), "United States Dollar".to_string()),
        ])
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = catalog();
        assert!(catalog.contains("GBP"));
        assert!(!catalog.contains("XYZ"));
        assert_eq!(catalog.name("EUR"), Some("Euro"));
        assert_eq!(catalog.first_code(), Some("EUR"));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_snapshot_retains_known_codes_in_order() {
        let mut snapshot = RateSnapshot::new(
            "USD",
            None,
            vec![
                ("GBP".to_string(), 0.79),
                ("XYZ".to_string(), 3.0),
                ("EUR".to_string(), 0.92),
            ],
        );
        assert_eq!(snapshot.retain_known(&catalog()), 1);
        let codes: Vec<&str> = snapshot.rates().iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(codes, vec!["GBP", "EUR"]);
        assert_eq!(snapshot.get("EUR"), Some(0.92));
        assert_eq!(snapshot.get("XYZ"), None);
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" eur "), "EUR");
    }
}

// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use serde::Deserialize;

use crate::models::Country;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    GdpDesc,
}

impl SortOrder {
    /// Unknown keys yield `None` and leave the order untouched.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "gdp_desc" => Some(Self::GdpDesc),
            _ => None,
        }
    }
}

/// Query-string filters for `GET /countries`. Empty values are ignored.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CountryFilter {
    pub region: Option<String>,
    pub currency: Option<String>,
    pub sort: Option<String>,
}

impl CountryFilter {
    pub fn apply(&self, countries: Vec<Country>) -> Vec<Country> {
        let region = self.region.as_deref().filter(|r| !r.is_empty());
        let currency = self.currency.as_deref().filter(|c| !c.is_empty());

        let mut countries: Vec<Country> = countries
            .into_iter()
            .filter(|c| region.map_or(true, |r| c.region.as_deref() == Some(r)))
            .filter(|c| currency.map_or(true, |code| c.currency_code.as_deref() == Some(code)))
            .collect();

        if let Some(SortOrder::GdpDesc) = self.sort.as_deref().and_then(SortOrder::parse) {
            sort_by_gdp_desc(&mut countries);
        }

        countries
    }
}

/// Stable: equal estimates keep their input order.
pub fn sort_by_gdp_desc(countries: &mut [Country]) {
    countries.sort_by(|a, b| b.estimated_gdp.total_cmp(&a.estimated_gdp));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn country(id: i64, name: &str, region: Option<&str>, currency: Option<&str>, gdp: f64) -> Country {
        Country {
            id,
            name: name.to_string(),
            capital: None,
            region: region.map(str::to_string),
            population: 1_000,
            currency_code: currency.map(str::to_string),
            exchange_rate: None,
            estimated_gdp: gdp,
            flag_url: None,
            last_refreshed_at: Utc::now(),
        }
    }

    fn snapshot() -> Vec<Country> {
        vec![
            country(1, "Nigeria", Some("Africa"), Some("NGN"), 250.0),
            country(2, "Ghana", Some("Africa"), Some("GHS"), 900.0),
            country(3, "France", Some("Europe"), Some("EUR"), 4_000.0),
            country(4, "Germany", Some("Europe"), Some("EUR"), 4_000.0),
            country(5, "Antarctica", None, None, 0.0),
        ]
    }

    fn names(countries: &[Country]) -> Vec<&str> {
        countries.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_no_filter_returns_everything_in_order() {
        let result = CountryFilter::default().apply(snapshot());
        assert_eq!(names(&result), ["Nigeria", "Ghana", "France", "Germany", "Antarctica"]);
    }

    #[test]
    fn test_region_filter_is_exact() {
        let filter = CountryFilter {
            region: Some("Africa".to_string()),
            ..Default::default()
        };
        let result = filter.apply(snapshot());
        assert_eq!(names(&result), ["Nigeria", "Ghana"]);
        assert!(result.iter().all(|c| c.region.as_deref() == Some("Africa")));

        let lowercase = CountryFilter {
            region: Some("africa".to_string()),
            ..Default::default()
        };
        assert!(lowercase.apply(snapshot()).is_empty());
    }

    #[test]
    fn test_unknown_region_is_empty() {
        let filter = CountryFilter {
            region: Some("Atlantis".to_string()),
            ..Default::default()
        };
        assert!(filter.apply(snapshot()).is_empty());
    }

    #[test]
    fn test_filters_compose_with_and() {
        let filter = CountryFilter {
            region: Some("Europe".to_string()),
            currency: Some("EUR".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&filter.apply(snapshot())), ["France", "Germany"]);

        let filter = CountryFilter {
            region: Some("Africa".to_string()),
            currency: Some("EUR".to_string()),
            ..Default::default()
        };
        assert!(filter.apply(snapshot()).is_empty());
    }

    #[test]
    fn test_sort_gdp_desc_is_non_increasing_and_stable() {
        let filter = CountryFilter {
            sort: Some("gdp_desc".to_string()),
            ..Default::default()
        };
        let result = filter.apply(snapshot());
        assert!(result
            .windows(2)
            .all(|pair| pair[0].estimated_gdp >= pair[1].estimated_gdp));
        assert_eq!(names(&result), ["France", "Germany", "Ghana", "Nigeria", "Antarctica"]);
    }

    #[test]
    fn test_empty_values_and_unknown_sort_are_ignored() {
        let filter = CountryFilter {
            region: Some(String::new()),
            currency: Some(String::new()),
            sort: Some("population_asc".to_string()),
        };
        assert_eq!(filter.apply(snapshot()).len(), 5);
        assert_eq!(filter.apply(snapshot())[0].name, "Nigeria");
    }
}

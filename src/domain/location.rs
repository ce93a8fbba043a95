use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
    /// Stable identifier for the place; also names its artwork set.
    pub prefix: String,
    #[serde(default)]
    pub tag: Option<String>,
}

impl Location {
    pub fn new(name: &str, latitude: f64, longitude: f64, prefix: &str, tag: &str) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
            prefix: prefix.to_string(),
            tag: Some(tag.to_string()),
        }
    }

    #[must_use]
    pub fn from_coords(latitude: f64, longitude: f64) -> Self {
        Self {
            name: format!("{latitude:.4}, {longitude:.4}"),
            latitude,
            longitude,
            prefix: format!("coords_{latitude:.2}_{longitude:.2}"),
            tag: None,
        }
    }

    /// Case-insensitive match on prefix or display name.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        self.prefix.eq_ignore_ascii_case(query) || self.name.eq_ignore_ascii_case(query)
    }
}

#[must_use]
pub fn default_cities() -> Vec<Location> {
    vec![
        Location::new("PARIS", 48.8534, 2.3488, "paris", "france"),
        Location::new("LILLE", 50.6330, 3.0586, "lille", "france"),
        Location::new("BESANCON", 47.2488, 6.0181, "besancon", "france"),
        Location::new("MT ST MICHEL", 48.6364, -1.5103, "MtStMichel", "france"),
        Location::new("LONDON", 51.5085, -0.1257, "london", "world"),
        Location::new("BERLIN", 52.5244, 13.4105, "berlin", "world"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_list_starts_with_paris() {
        let cities = default_cities();
        assert_eq!(cities.len(), 6);
        assert_eq!(cities[0].prefix, "paris");
    }

    #[test]
    fn matches_prefix_or_name_ignoring_case() {
        let cities = default_cities();
        assert!(cities[3].matches("mtstmichel"));
        assert!(cities[3].matches("Mt St Michel"));
        assert!(!cities[3].matches("paris"));
    }

    #[test]
    fn deserializes_short_coordinate_keys() {
        let city: Location = serde_json::from_str(
            r#"{"name":"OSLO","lat":59.91,"lon":10.75,"prefix":"oslo"}"#,
        )
        .expect("valid city json");
        assert!((city.latitude - 59.91).abs() < f64::EPSILON);
        assert_eq!(city.tag, None);
    }
}

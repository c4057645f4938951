use parley_core::ParleyResult;
use parley_skills::{Skill, SkillDescriptor};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One day of a [`CityWeather`] forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    pub day: String,
    pub temperature: String,
    pub condition: String,
}

/// Current conditions and a short forecast for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityWeather {
    pub city: String,
    pub temperature: String,
    pub condition: String,
    pub forecast: Vec<DayForecast>,
}

/// Weather lookup over a fixed table of cities.
///
/// Matching is a case-insensitive substring search on the city name, so
/// "york" finds New York. No match yields JSON `null`.
pub struct WeatherSkill {
    descriptor: SkillDescriptor,
    cities: Vec<CityWeather>,
}

impl WeatherSkill {
    pub fn new() -> Self {
        Self::with_cities(default_cities())
    }

    /// Build the skill over a custom table.
    pub fn with_cities(cities: Vec<CityWeather>) -> Self {
        Self {
            descriptor: SkillDescriptor {
                name: "get_current_weather".to_string(),
                description:
                    "Get current weather for a city (case-insensitive, partial match supported)"
                        .to_string(),
                parameters_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "location": {
                            "type": "string",
                            "description": "City name, e.g. \"New York\""
                        }
                    },
                    "required": ["location"]
                }),
            },
            cities,
        }
    }

    /// First city whose name contains `location`, ignoring case and
    /// surrounding whitespace.
    pub fn lookup(&self, location: &str) -> Option<&CityWeather> {
        let query = location.trim().to_lowercase();
        self.cities
            .iter()
            .find(|c| c.city.to_lowercase().contains(&query))
    }
}

impl Default for WeatherSkill {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Skill for WeatherSkill {
    fn descriptor(&self) -> &SkillDescriptor {
        &self.descriptor
    }

    async fn execute(&self, arguments: &serde_json::Value) -> ParleyResult<serde_json::Value> {
        let location = arguments["location"].as_str().unwrap_or_default();
        let found = self.lookup(location);
        info!(location = %location, matched = found.is_some(), "Weather lookup");

        match found {
            Some(city) => Ok(serde_json::to_value(city)?),
            None => Ok(serde_json::Value::Null),
        }
    }
}

fn city(name: &str, now: (&str, &str), today: (&str, &str), tomorrow: (&str, &str)) -> CityWeather {
    let day = |label: &str, (temperature, condition): (&str, &str)| DayForecast {
        day: label.to_string(),
        temperature: temperature.to_string(),
        condition: condition.to_string(),
    };
    CityWeather {
        city: name.to_string(),
        temperature: now.0.to_string(),
        condition: now.1.to_string(),
        forecast: vec![day("Today", today), day("Tomorrow", tomorrow)],
    }
}

fn default_cities() -> Vec<CityWeather> {
    vec![
        city(
            "San Francisco",
            ("15°C", "Partly Cloudy"),
            ("16°C", "Sunny"),
            ("17°C", "Partly Cloudy"),
        ),
        city(
            "New York",
            ("20°C", "Sunny"),
            ("21°C", "Sunny"),
            ("22°C", "Partly Cloudy"),
        ),
        city(
            "Los Angeles",
            ("25°C", "Sunny"),
            ("26°C", "Sunny"),
            ("27°C", "Partly Cloudy"),
        ),
        city(
            "Chicago",
            ("10°C", "Cloudy"),
            ("11°C", "Cloudy"),
            ("12°C", "Rain"),
        ),
    ]
}

//! Built-in tools for Parley.
//!
//! # Main entry points
//!
//! - [`register_builtins()`] — Register every built-in tool.
//! - [`WeatherSkill`] — `get_current_weather`, a canned weather lookup.
//! - [`AddSkill`] — `add_two_numbers`.

/// Arithmetic tools.
pub mod arithmetic;
/// Weather lookup tool.
pub mod weather;

pub use arithmetic::AddSkill;
pub use weather::{CityWeather, DayForecast, WeatherSkill};

use parley_skills::SkillRegistry;
use std::sync::Arc;

/// Register all built-in tools into the given registry.
pub fn register_builtins(registry: &mut SkillRegistry) {
    registry.register(Arc::new(WeatherSkill::new()));
    registry.register(Arc::new(AddSkill::new()));
}

use std::fmt::Write;

use cityweather_core::CityWeather;

/// Render cities as a plain-text table, one row per city.
pub fn city_table(cities: &[CityWeather]) -> String {
    if cities.is_empty() {
        return "No matching cities.\n".to_string();
    }

    let name_width = cities
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("City".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_width$}  {:<7}  {:>7}  {:>15}  Conditions",
        "City", "Country", "Temp", "Min / Max"
    );

    for city in cities {
        let conditions = city
            .conditions
            .iter()
            .map(|c| c.category.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let min_max = format!("{:.1} / {:.1}", city.temperature.min, city.temperature.max);

        let _ = writeln!(
            out,
            "{:<name_width$}  {:<7}  {:>6.1}°  {:>15}  {}",
            city.name, city.country, city.temperature.current, min_max, conditions
        );
    }

    out
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily temperature summary in °C
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl Temperature {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            avg: (min + max) / 2.0,
        }
    }
}

/// One day of observed or forecast weather.
///
/// History and forecast series share this shape. Series are expected to be
/// sorted by date; the engine does not sort or deduplicate them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    pub date: NaiveDate,
    pub temperature: Temperature,
    pub rainfall_mm: f64,
    pub humidity_pct: f64,
    pub wind_kmh: f64,
}

impl WeatherDay {
    pub fn new(
        date: NaiveDate,
        temperature: Temperature,
        rainfall_mm: f64,
        humidity_pct: f64,
        wind_kmh: f64,
    ) -> Self {
        Self {
            date,
            temperature,
            rainfall_mm,
            humidity_pct,
            wind_kmh,
        }
    }

    /// True when every numeric field is a finite number
    pub fn is_finite(&self) -> bool {
        [
            self.temperature.min,
            self.temperature.max,
            self.temperature.avg,
            self.rainfall_mm,
            self.humidity_pct,
            self.wind_kmh,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Find the entry for a given date in a weather series
pub fn day_for(series: &[WeatherDay], date: NaiveDate) -> Option<&WeatherDay> {
    series.iter().find(|d| d.date == date)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn temperature_new_computes_average() {
        let t = Temperature::new(18.0, 30.0);
        assert!((t.avg - 24.0).abs() < 1e-9);
    }

    #[test]
    fn weather_day_finite_check() {
        let mut day = WeatherDay::new(date(1), Temperature::new(20.0, 30.0), 2.0, 60.0, 8.0);
        assert!(day.is_finite());

        day.humidity_pct = f64::NAN;
        assert!(!day.is_finite());
    }

    #[test]
    fn day_for_matches_by_date() {
        let series = vec![
            WeatherDay::new(date(1), Temperature::new(20.0, 30.0), 0.0, 50.0, 5.0),
            WeatherDay::new(date(2), Temperature::new(21.0, 31.0), 4.0, 55.0, 6.0),
        ];

        assert_eq!(day_for(&series, date(2)).map(|d| d.rainfall_mm), Some(4.0));
        assert!(day_for(&series, date(3)).is_none());
    }

    #[test]
    fn weather_day_deserializes_from_json() {
        let json = r#"{
            "date": "2024-06-01",
            "temperature": {"min": 18.0, "max": 31.0, "avg": 24.5},
            "rainfall_mm": 3.2,
            "humidity_pct": 64.0,
            "wind_kmh": 11.0
        }"#;

        let day: WeatherDay = serde_json::from_str(json).unwrap();
        assert_eq!(day.date, date(1));
        assert_eq!(day.temperature.max, 31.0);
    }
}

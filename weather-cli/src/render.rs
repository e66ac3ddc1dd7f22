//! Human-friendly text for weather data.

use chrono::DateTime;
use weather_core::{CurrentConditions, DailySummary, WeatherAlert};

/// Icon for how warm it feels, in °C.
pub fn feels_like_icon(temp_c: f64) -> &'static str {
    if temp_c < 5.0 {
        "❄️"
    } else if temp_c < 15.0 {
        "🌬️"
    } else if temp_c < 25.0 {
        "🙂"
    } else {
        "🔥"
    }
}

/// Icon picked from keywords in a condition description.
pub fn condition_icon(description: &str) -> &'static str {
    let lower = description.to_lowercase();
    if lower.contains("cloud") {
        "☁️"
    } else if lower.contains("rain") {
        "🌧"
    } else if lower.contains("clear") {
        "☀️"
    } else if lower.contains("snow") {
        "❄️"
    } else if lower.contains("storm") || lower.contains("thunder") {
        "⛈"
    } else {
        "🌤"
    }
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn current_report(c: &CurrentConditions) -> String {
    format!(
        "{name}\n\
         🌡 Temp: {temp} °C\n\
         {feels_icon} Feels Like: {feels} °C\n\
         💧 Humidity: {humidity}%\n\
         💨 Wind: {wind} m/s\n\
         {cond_icon} {cond}\n\
         Updated: {updated}\n",
        name = c.location_name,
        temp = c.temperature_c,
        feels_icon = feels_like_icon(c.feels_like_c),
        feels = c.feels_like_c,
        humidity = c.humidity_pct,
        wind = c.wind_speed_mps,
        cond_icon = condition_icon(&c.condition),
        cond = capitalize(&c.condition),
        updated = c.observation_time.format("%Y-%m-%d %H:%M UTC"),
    )
}

pub fn forecast_report(days: &[DailySummary]) -> String {
    let lines: String = days
        .iter()
        .map(|day| {
            let e = &day.entry;
            format!(
                "{}  {} {:<20} 🌡 {} °C  {} {} °C  💧 {}%  💨 {} m/s\n",
                day.day.format("%a %Y-%m-%d"),
                condition_icon(&e.condition),
                capitalize(&e.condition),
                e.temperature_c,
                feels_like_icon(e.feels_like_c),
                e.feels_like_c,
                e.humidity_pct,
                e.wind_speed_mps,
            )
        })
        .collect();

    format!("{}-Day Forecast\n{lines}", days.len())
}

pub fn alert_report(alert: &WeatherAlert) -> String {
    let mut out = format!("⚠️ {}\nSource: {}\n", alert.event, alert.sender_name);
    if let (Some(start), Some(end)) = (alert_time(alert.start), alert_time(alert.end)) {
        out.push_str(&format!("From {start} until {end}\n"));
    }
    out.push_str(&alert.description);
    out.push('\n');
    out
}

/// Alert bounds are unix seconds; zero means the provider left them out.
fn alert_time(ts: i64) -> Option<String> {
    if ts == 0 {
        return None;
    }
    DateTime::from_timestamp(ts, 0).map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
}

use crate::models::Event;
use anyhow::{Context, Result};
use serde::Serialize;

/// Save a fetched event collection to a JSON cache file
pub fn save_events_to_cache(events: &[Event], cache_file: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(events).context("Failed to serialize events")?;
    std::fs::write(cache_file, json).context("Failed to write cache file")?;
    Ok(())
}

/// Load an event collection from a JSON cache file
pub fn load_events_from_cache(cache_file: &str) -> Result<Vec<Event>> {
    let json = std::fs::read_to_string(cache_file).context("Failed to read cache file")?;
    let events: Vec<Event> =
        serde_json::from_str(&json).context("Failed to deserialize cached events")?;
    Ok(events)
}

/// One flattened offer row for CSV export
#[derive(Debug, Serialize)]
struct OfferRow<'a> {
    event_id: &'a str,
    home_team: &'a str,
    away_team: &'a str,
    start_time: String,
    market: &'static str,
    label: &'a str,
    odds: i32,
    reference_odds: i32,
    point: Option<f64>,
    source: &'a str,
    edge_percent: f64,
    has_edge: bool,
}

/// Export every offer on the board to CSV, one row per offer
pub fn save_offers_to_csv(events: &[Event], filename: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename).context("Failed to create CSV file")?;

    for event in events {
        for market in &event.markets {
            for offer in &market.offers {
                writer.serialize(OfferRow {
                    event_id: &event.id,
                    home_team: &event.home_team,
                    away_team: &event.away_team,
                    start_time: event.start_time.to_rfc3339(),
                    market: market.kind.as_str(),
                    label: &offer.label,
                    odds: offer.primary_odds,
                    reference_odds: offer.reference_odds,
                    point: offer.point,
                    source: &offer.source_name,
                    edge_percent: offer.edge_percent,
                    has_edge: offer.has_edge,
                })?;
            }
        }
    }

    writer.flush().context("Failed to flush CSV file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
            start_time: Utc.with_ymd_and_hms(2025, 11, 2, 18, 0, 0).unwrap(),
            markets: vec![],
            is_followed: true,
        }
    }

    #[test]
    fn cache_round_trip_preserves_events() {
        let path = std::env::temp_dir().join("market_edge_cache_test.json");
        let path = path.to_str().unwrap().to_string();
        let events = vec![event("a"), event("b")];

        save_events_to_cache(&events, &path).unwrap();
        let loaded = load_events_from_cache(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, events);
    }
}

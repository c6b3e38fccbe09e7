use crate::models::Event;

/// Flip the followed flag on the event with the given id, optimistically
/// and without any network I/O.
///
/// Returns a new collection; every other event is unchanged by value. An
/// unknown id is a silent no-op so a toggle racing a refresh cannot fail
/// loudly. The caller owns issuing the backend follow request; there is no
/// rollback here if that request later fails, the next full refresh
/// re-asserts server truth.
pub fn toggle_follow(events: Vec<Event>, id: &str) -> Vec<Event> {
    events
        .into_iter()
        .map(|mut event| {
            if event.id == id {
                event.is_followed = !event.is_followed;
            }
            event
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(id: &str, is_followed: bool) -> Event {
        Event {
            id: id.to_string(),
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
            start_time: Utc.with_ymd_and_hms(2025, 11, 2, 18, 0, 0).unwrap(),
            markets: vec![],
            is_followed,
        }
    }

    #[test]
    fn toggle_flips_only_the_matching_event() {
        let events = vec![event("a", false), event("b", true)];
        let out = toggle_follow(events, "a");

        assert!(out[0].is_followed);
        assert!(out[1].is_followed, "other events are untouched");
    }

    #[test]
    fn toggle_twice_is_an_involution() {
        let events = vec![event("a", false), event("b", true)];
        let original = events.clone();

        let out = toggle_follow(toggle_follow(events, "b"), "b");
        assert_eq!(out, original);
    }

    #[test]
    fn unknown_id_returns_collection_unchanged() {
        let events = vec![event("a", false), event("b", true)];
        let original = events.clone();

        let out = toggle_follow(events, "missing");
        assert_eq!(out, original);
    }

    #[test]
    fn empty_collection_stays_empty() {
        assert!(toggle_follow(vec![], "a").is_empty());
    }
}

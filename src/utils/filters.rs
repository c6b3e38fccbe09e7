use crate::models::Event;

/// User-controlled display predicates
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterOptions {
    pub edge_only: bool,
    pub live_only: bool,
}

/// Decides whether the event at a given position in the pre-filtered
/// collection counts as live
pub type LivenessRule = fn(usize, &Event) -> bool;

/// Placeholder liveness rule carried over from the original board: keep
/// events at even positions. There is no real "is this game live" signal in
/// the backend yet; swap this rule out when one exists instead of changing
/// the pipeline.
pub fn placeholder_live_rule(index: usize, _event: &Event) -> bool {
    index % 2 == 0
}

/// Derive the displayed subset of events.
///
/// Both predicates are judged against the original collection (the live
/// rule sees pre-filter indices), so enabling both yields the intersection
/// in the original order. Pure and total: empty input gives empty output.
pub fn filter_events(
    events: &[Event],
    options: &FilterOptions,
    is_live: LivenessRule,
) -> Vec<Event> {
    events
        .iter()
        .enumerate()
        .filter(|(index, event)| {
            if options.live_only && !is_live(*index, event) {
                return false;
            }
            if options.edge_only && !event.has_any_edge() {
                return false;
            }
            true
        })
        .map(|(_, event)| event.clone())
        .collect()
}

/// `filter_events` with the placeholder liveness rule
pub fn filter_events_default(events: &[Event], options: &FilterOptions) -> Vec<Event> {
    filter_events(events, options, placeholder_live_rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Market, MarketKind, Offer};
    use chrono::{TimeZone, Utc};

    fn offer(has_edge: bool) -> Offer {
        Offer {
            label: "Team".to_string(),
            primary_odds: -110,
            reference_odds: -120,
            point: None,
            reference_point: None,
            source_name: "DraftKings".to_string(),
            edge_percent: 1.2,
            has_edge,
        }
    }

    fn event(id: &str, has_edge: bool) -> Event {
        Event {
            id: id.to_string(),
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
            start_time: Utc.with_ymd_and_hms(2025, 11, 2, 18, 0, 0).unwrap(),
            markets: vec![Market {
                kind: MarketKind::H2h,
                offers: vec![offer(has_edge), offer(false)],
            }],
            is_followed: false,
        }
    }

    #[test]
    fn no_filters_passes_everything_through() {
        let events = vec![event("a", false), event("b", true)];
        let out = filter_events_default(&events, &FilterOptions::default());
        assert_eq!(out, events);
    }

    #[test]
    fn edge_only_keeps_edged_events_in_order() {
        let events = vec![
            event("a", false),
            event("b", true),
            event("c", false),
            event("d", true),
        ];
        let options = FilterOptions {
            edge_only: true,
            live_only: false,
        };

        let out = filter_events_default(&events, &options);
        assert!(out.len() <= events.len());
        let ids: Vec<_> = out.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d"]);
        assert!(out.iter().all(|e| e.has_any_edge()));
    }

    #[test]
    fn live_only_uses_pre_filter_indices() {
        let events = vec![
            event("a", true),
            event("b", true),
            event("c", true),
            event("d", true),
        ];
        let options = FilterOptions {
            edge_only: false,
            live_only: true,
        };

        let out = filter_events_default(&events, &options);
        let ids: Vec<_> = out.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn both_filters_intersect_in_original_order() {
        // index 0 edged, index 1 edged but odd, index 2 not edged, index 3 odd
        let events = vec![
            event("a", true),
            event("b", true),
            event("c", false),
            event("d", true),
        ];
        let options = FilterOptions {
            edge_only: true,
            live_only: true,
        };

        let out = filter_events_default(&events, &options);
        let ids: Vec<_> = out.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let options = FilterOptions {
            edge_only: true,
            live_only: true,
        };
        assert!(filter_events_default(&[], &options).is_empty());
    }

    #[test]
    fn custom_liveness_rule_is_honored() {
        let events = vec![event("a", true), event("b", true)];
        let options = FilterOptions {
            edge_only: false,
            live_only: true,
        };

        fn nothing_live(_: usize, _: &Event) -> bool {
            false
        }

        let out = filter_events(&events, &options, nothing_live);
        assert!(out.is_empty());
    }
}

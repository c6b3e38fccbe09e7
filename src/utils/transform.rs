use crate::models::{Event, Market, MarketKind, Offer, RawEvent};

/// One side of one market, as seen by the edge rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketSide {
    MoneylineHome,
    MoneylineAway,
    SpreadHome,
    SpreadAway,
    TotalOver,
    TotalUnder,
}

/// Reference price and edge annotation for one offer
#[derive(Debug, Clone)]
pub struct EdgeAnnotation {
    pub reference_odds: i32,
    pub source_name: &'static str,
    pub edge_percent: f64,
    pub has_edge: bool,
}

/// Produces the reference-book comparison for one side of a market.
///
/// The default implementation below is a synthetic placeholder, not a real
/// odds comparison. Keeping it behind this trait isolates the fake numbers:
/// a real model (live reference-book lookup, de-vigged fair price) can be
/// swapped in without touching the transformer or anything downstream.
pub trait EdgeModel {
    fn annotate(&self, side: MarketSide, price: i32) -> EdgeAnnotation;
}

/// Placeholder edge rule: fixed offsets standing in for a reference book
/// and fixed sample percentages standing in for a computed edge. Only the
/// moneyline flags depend on the price at all (heavy favorite at home,
/// long underdog away).
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticEdgeModel;

impl EdgeModel for SyntheticEdgeModel {
    fn annotate(&self, side: MarketSide, price: i32) -> EdgeAnnotation {
        match side {
            MarketSide::MoneylineHome => EdgeAnnotation {
                reference_odds: price - 10,
                source_name: "DraftKings",
                edge_percent: 1.2,
                has_edge: price < -200,
            },
            MarketSide::MoneylineAway => EdgeAnnotation {
                reference_odds: price - 5,
                source_name: "FanDuel",
                edge_percent: 0.8,
                has_edge: price > 200,
            },
            MarketSide::SpreadHome => EdgeAnnotation {
                reference_odds: price - 2,
                source_name: "BetMGM",
                edge_percent: -1.16,
                has_edge: false,
            },
            MarketSide::SpreadAway => EdgeAnnotation {
                reference_odds: price - 3,
                source_name: "Pinnacle",
                edge_percent: -1.16,
                has_edge: false,
            },
            MarketSide::TotalOver => EdgeAnnotation {
                reference_odds: price - 4,
                source_name: "BetMGM",
                edge_percent: 3.88,
                has_edge: true,
            },
            MarketSide::TotalUnder => EdgeAnnotation {
                reference_odds: price - 2,
                source_name: "Pinnacle",
                edge_percent: -1.4,
                has_edge: false,
            },
        }
    }
}

fn make_offer(
    model: &dyn EdgeModel,
    side: MarketSide,
    label: &str,
    price: i32,
    point: Option<f64>,
) -> Offer {
    let annotation = model.annotate(side, price);
    Offer {
        label: label.to_string(),
        primary_odds: price,
        reference_odds: annotation.reference_odds,
        point,
        reference_point: point,
        source_name: annotation.source_name.to_string(),
        edge_percent: annotation.edge_percent,
        has_edge: annotation.has_edge,
    }
}

/// Turn one raw backend event into a display-ready event.
///
/// Pure: no I/O, input untouched, same output for the same input. Markets
/// come out in fixed order (h2h, spreads, totals) and a missing raw field
/// means the market is omitted, never padded. An event without any odds is
/// still valid and renders with an empty market list.
pub fn transform_event(raw: &RawEvent, model: &dyn EdgeModel) -> Event {
    let mut markets = Vec::new();

    if let Some(odds) = &raw.odds {
        if let Some(moneyline) = &odds.moneyline {
            markets.push(Market {
                kind: MarketKind::H2h,
                offers: vec![
                    make_offer(
                        model,
                        MarketSide::MoneylineHome,
                        &raw.home_team,
                        moneyline.home,
                        None,
                    ),
                    make_offer(
                        model,
                        MarketSide::MoneylineAway,
                        &raw.away_team,
                        moneyline.away,
                        None,
                    ),
                ],
            });
        }

        if let Some(spread) = &odds.spread {
            markets.push(Market {
                kind: MarketKind::Spreads,
                offers: vec![
                    make_offer(
                        model,
                        MarketSide::SpreadHome,
                        &raw.home_team,
                        spread.home,
                        Some(spread.points),
                    ),
                    make_offer(
                        model,
                        MarketSide::SpreadAway,
                        &raw.away_team,
                        spread.away,
                        Some(-spread.points),
                    ),
                ],
            });
        }

        if let Some(total) = &odds.total {
            markets.push(Market {
                kind: MarketKind::Totals,
                offers: vec![
                    make_offer(
                        model,
                        MarketSide::TotalOver,
                        "Over",
                        total.over,
                        Some(total.points),
                    ),
                    make_offer(
                        model,
                        MarketSide::TotalUnder,
                        "Under",
                        total.under,
                        Some(total.points),
                    ),
                ],
            });
        }
    }

    Event {
        id: raw.id.clone(),
        home_team: raw.home_team.clone(),
        away_team: raw.away_team.clone(),
        start_time: raw.start_time,
        markets,
        is_followed: raw.is_followed.unwrap_or(false),
    }
}

/// Transform a whole fetched collection
pub fn transform_events(raws: &[RawEvent], model: &dyn EdgeModel) -> Vec<Event> {
    raws.iter().map(|raw| transform_event(raw, model)).collect()
}

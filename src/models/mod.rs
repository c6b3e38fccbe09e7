use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Moneyline prices for both sides, American odds format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneylinePrices {
    pub home: i32,
    pub away: i32,
}

/// Spread prices plus the handicap line (home-team perspective)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadPrices {
    pub home: i32,
    pub away: i32,
    pub points: f64,
}

/// Over/under prices plus the total line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalPrices {
    pub over: i32,
    pub under: i32,
    pub points: f64,
}

/// Raw odds object as the backend sends it; any market may be missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOdds {
    #[serde(default)]
    pub moneyline: Option<MoneylinePrices>,
    #[serde(default)]
    pub spread: Option<SpreadPrices>,
    #[serde(default)]
    pub total: Option<TotalPrices>,
}

/// One event record as returned by `GET /events`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub odds: Option<RawOdds>,
    #[serde(default)]
    pub is_followed: Option<bool>,
}

/// Betting category for a market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    H2h,
    Spreads,
    Totals,
}

impl MarketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketKind::H2h => "h2h",
            MarketKind::Spreads => "spreads",
            MarketKind::Totals => "totals",
        }
    }
}

/// One priced side of a market, annotated with the reference-book
/// comparison that drives the edge display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub label: String,
    pub primary_odds: i32,
    pub reference_odds: i32,
    pub point: Option<f64>,
    pub reference_point: Option<f64>,
    pub source_name: String,
    pub edge_percent: f64,
    pub has_edge: bool,
}

impl Offer {
    pub fn format(&self) -> String {
        let edge_tag = if self.has_edge { ", EDGE" } else { "" };
        match self.point {
            Some(point) => format!(
                "{} {:+.1} ({:+}) on {} [{:.2}%{}]",
                self.label, point, self.primary_odds, self.source_name, self.edge_percent, edge_tag
            ),
            None => format!(
                "{} ({:+}) on {} [{:.2}%{}]",
                self.label, self.primary_odds, self.source_name, self.edge_percent, edge_tag
            ),
        }
    }
}

/// One betting category with exactly two opposing offers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub kind: MarketKind,
    pub offers: Vec<Offer>,
}

/// Display-ready event: what the cards and the CLI output render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub start_time: DateTime<Utc>,
    pub markets: Vec<Market>,
    pub is_followed: bool,
}

impl Event {
    /// True if any offer in any market carries the edge flag
    pub fn has_any_edge(&self) -> bool {
        self.markets
            .iter()
            .any(|market| market.offers.iter().any(|offer| offer.has_edge))
    }

    pub fn format(&self) -> String {
        format!(
            "{} @ {} | {} | {} market(s){}",
            self.away_team,
            self.home_team,
            self.start_time.format("%Y-%m-%d %H:%M UTC"),
            self.markets.len(),
            if self.is_followed { " | followed" } else { "" }
        )
    }
}

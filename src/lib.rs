pub mod api;
pub mod error;
pub mod models;
pub mod utils;

pub use api::*;
pub use models::*;
pub use utils::*;

use api::events_api::EventsApiClient;
use error::ApiResult;
use serde::{Deserialize, Serialize};
use utils::transform::{transform_events, SyntheticEdgeModel};

/// Everything one render cycle of the board needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardData {
    pub sports: Vec<String>,
    pub sport: String,
    pub events: Vec<models::Event>,
}

impl BoardData {
    fn empty(sport: &str) -> Self {
        Self {
            sports: vec![],
            sport: sport.to_string(),
            events: vec![],
        }
    }
}

/// Fetch the full board for one sport: the available-sports list, then the
/// sport's events, transformed for display.
///
/// The two requests are all-or-nothing for a render cycle: if either fails
/// the whole load is abandoned and an empty (but renderable) board comes
/// back, with the error logged. The rendering layer never sees an error
/// value, only a possibly-empty collection.
pub async fn load_board(
    client: &EventsApiClient,
    sport: &str,
    followed_only: bool,
    token: Option<&str>,
) -> BoardData {
    match try_load_board(client, sport, followed_only, token).await {
        Ok(board) => board,
        Err(e) => {
            tracing::error!(sport = %sport, error = %e, "board load failed, rendering empty board");
            BoardData::empty(sport)
        }
    }
}

async fn try_load_board(
    client: &EventsApiClient,
    sport: &str,
    followed_only: bool,
    token: Option<&str>,
) -> ApiResult<BoardData> {
    let sports = client.fetch_sports().await?;
    let raws = client.fetch_events(sport, followed_only, token).await?;
    let events = transform_events(&raws, &SyntheticEdgeModel);

    Ok(BoardData {
        sports,
        sport: sport.to_string(),
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::events_api::{ApiConfig, Endpoints};

    #[tokio::test]
    async fn unreachable_backend_yields_empty_renderable_board() {
        // Port 1 refuses connections, so the first request of the loader
        // sequence fails and the whole load is abandoned.
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            endpoints: Endpoints::default(),
        };
        let client = EventsApiClient::new(config);

        let board = load_board(&client, "basketball_nba", false, None).await;

        assert!(board.sports.is_empty());
        assert!(board.events.is_empty());
        assert_eq!(board.sport, "basketball_nba");
    }
}

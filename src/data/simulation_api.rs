use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::analytics::types::EdgeState;
use crate::data::types::{GameSummary, SharpSignal, SimulationResult};

/// Client for the BeatVegas simulation backend.
///
/// The bearer token is injected at construction and attached per request;
/// nothing in this crate reads credentials from ambient state.
pub struct SimulationApiClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GamesResponse {
    #[serde(default)]
    games: Vec<GameSummary>,
}

impl SimulationApiClient {
    pub fn new(base_url: String, auth_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url,
            auth_token,
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.get(url);
        if let Some(token) = &self.auth_token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Fetch upcoming games with their current market lines
    pub async fn fetch_upcoming_games(&self) -> Result<Vec<GameSummary>> {
        let url = format!("{}/games/upcoming", self.base_url);

        let response: GamesResponse = self
            .get(&url)
            .send()
            .await
            .context("Failed to fetch upcoming games")?
            .json()
            .await
            .context("Failed to parse upcoming games response")?;

        Ok(response.games)
    }

    /// Fetch the pre-computed simulation result for one game
    pub async fn fetch_simulation(&self, game_id: &str) -> Result<SimulationResult> {
        let url = format!("{}/games/{}/simulation", self.base_url, game_id);

        let simulation: SimulationResult = self
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch simulation for game {}", game_id))?
            .json()
            .await
            .with_context(|| format!("Failed to parse simulation for game {}", game_id))?;

        Ok(simulation)
    }
}

/// Decode a wire sharp-action signal into a classification override.
/// "NONE" is an authoritative "no signal" and maps to an explicit NEUTRAL;
/// an absent signal means no override at all. Unknown strings are dropped
/// rather than trusted.
pub fn decode_sharp_hint(signal: Option<&SharpSignal>) -> Option<EdgeState> {
    match signal?.action.as_str() {
        "EDGE" => Some(EdgeState::Edge),
        "LEAN" => Some(EdgeState::Lean),
        "NONE" => Some(EdgeState::Neutral),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sharp(action: &str) -> SharpSignal {
        SharpSignal {
            action: action.to_string(),
            side: None,
        }
    }

    #[test]
    fn test_decode_sharp_hint() {
        assert_eq!(decode_sharp_hint(Some(&sharp("EDGE"))), Some(EdgeState::Edge));
        assert_eq!(decode_sharp_hint(Some(&sharp("LEAN"))), Some(EdgeState::Lean));
        assert_eq!(
            decode_sharp_hint(Some(&sharp("NONE"))),
            Some(EdgeState::Neutral)
        );
        assert_eq!(decode_sharp_hint(None), None);
    }

    #[test]
    fn test_decode_unknown_action_is_dropped() {
        assert_eq!(decode_sharp_hint(Some(&sharp("MAX_EDGE"))), None);
        assert_eq!(decode_sharp_hint(Some(&sharp(""))), None);
    }
}

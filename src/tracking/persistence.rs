use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::analytics::odds::american_to_implied_probability;
use crate::analytics::scanner::ClassifiedMarket;
use crate::data::types::GameSummary;

/// Signal history store. Edge-tier signals are recorded with the line and
/// odds at scan time; once the market closes, the closing numbers are
/// written back and CLV is computed (positive = the recorded price beat the
/// close). Spread and total CLV is line movement in points toward the pick;
/// moneyline CLV is the implied-probability shift in points.
pub struct SignalDatabase {
    conn: Connection,
}

#[derive(Debug, Clone)]
pub struct RecordedSignal {
    pub id: i64,
    pub game_id: String,
    pub market: String,
    pub state: String,
    pub side: Option<String>,
    pub probability: f64,
    pub deviation_points: f64,
    pub confidence_score: f64,
    pub recorded_odds: i32,
    pub recorded_line: Option<f64>,
    /// Pick direction as captured at scan time (see `ClassifiedMarket`).
    pub direction: i32,
    pub recorded_at: DateTime<Utc>,
    pub closing_odds: Option<i32>,
    pub closing_line: Option<f64>,
    pub clv: Option<f64>,
}

impl SignalDatabase {
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS signals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                game_id TEXT NOT NULL,
                market TEXT NOT NULL,
                state TEXT NOT NULL,
                side TEXT,
                probability REAL NOT NULL,
                deviation_points REAL NOT NULL,
                confidence_score REAL NOT NULL,
                recorded_odds INTEGER NOT NULL,
                recorded_line REAL,
                direction INTEGER NOT NULL DEFAULT 1,
                recorded_at TIMESTAMP NOT NULL,
                closing_odds INTEGER,
                closing_line REAL,
                clv REAL
            );

            CREATE INDEX IF NOT EXISTS idx_signals_game_id ON signals(game_id);
            CREATE INDEX IF NOT EXISTS idx_signals_recorded_at ON signals(recorded_at);
            "#,
        )?;

        Ok(Self { conn })
    }

    /// Insert a classified market as a recorded signal
    pub fn insert_signal(&self, market: &ClassifiedMarket) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO signals (game_id, market, state, side, probability, deviation_points, confidence_score, recorded_odds, recorded_line, direction, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                market.game_id,
                market.kind.to_string(),
                market.classification.state.to_string(),
                market.classification.side,
                market.classification.probability,
                market.signal.deviation_points,
                market.signal.confidence_score,
                market.american_odds,
                market.market_line,
                market.pick_direction,
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Write back the closing numbers for a signal and compute its CLV.
    /// When both a recorded and a closing line exist the CLV is line
    /// movement toward the pick (odds on spread/total markets carry flat
    /// juice, so the line is where value shows up); otherwise it is the
    /// implied-probability shift of the odds.
    pub fn record_closing_line(
        &self,
        id: i64,
        closing_odds: i32,
        closing_line: Option<f64>,
    ) -> Result<()> {
        let (recorded_odds, recorded_line, direction): (i32, Option<f64>, i32) =
            self.conn.query_row(
                "SELECT recorded_odds, recorded_line, direction FROM signals WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;

        let clv = match (recorded_line, closing_line) {
            (Some(recorded), Some(closing)) => direction as f64 * (recorded - closing),
            _ => {
                (american_to_implied_probability(closing_odds)
                    - american_to_implied_probability(recorded_odds))
                    * 100.0
            }
        };

        self.conn.execute(
            "UPDATE signals SET closing_odds = ?1, closing_line = ?2, clv = ?3 WHERE id = ?4",
            params![closing_odds, closing_line, clv, id],
        )?;
        Ok(())
    }

    /// Signals with no closing line yet
    pub fn get_unsettled_signals(&self) -> Result<Vec<RecordedSignal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, game_id, market, state, side, probability, deviation_points, confidence_score, recorded_odds, recorded_line, direction, recorded_at, closing_odds, closing_line, clv
             FROM signals
             WHERE closing_odds IS NULL",
        )?;

        let signals = stmt.query_map([], |row| {
            let recorded_at_str: String = row.get(11)?;
            let recorded_at = DateTime::parse_from_rfc3339(&recorded_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now());

            Ok(RecordedSignal {
                id: row.get(0)?,
                game_id: row.get(1)?,
                market: row.get(2)?,
                state: row.get(3)?,
                side: row.get(4)?,
                probability: row.get(5)?,
                deviation_points: row.get(6)?,
                confidence_score: row.get(7)?,
                recorded_odds: row.get(8)?,
                recorded_line: row.get(9)?,
                direction: row.get(10)?,
                recorded_at,
                closing_odds: row.get(12)?,
                closing_line: row.get(13)?,
                clv: row.get(14)?,
            })
        })?;

        signals.collect::<Result<Vec<_>, _>>().map_err(|e| e.into())
    }

    /// Count signals recorded today
    pub fn count_signals_today(&self) -> Result<usize> {
        let today = Utc::now().format("%Y-%m-%d").to_string();

        let count: usize = self.conn.query_row(
            "SELECT COUNT(*) FROM signals WHERE DATE(recorded_at) = ?1",
            params![today],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Average CLV across settled signals, in points
    pub fn average_clv(&self) -> Result<f64> {
        let avg: Option<f64> = self.conn.query_row(
            "SELECT AVG(clv) FROM signals WHERE clv IS NOT NULL",
            [],
            |row| row.get(0),
        )?;

        Ok(avg.unwrap_or(0.0))
    }
}

/// Closing moneyline odds for a recorded signal, taken from the side that
/// was recorded even if the model's favored side has since flipped.
pub fn closing_moneyline_odds(signal: &RecordedSignal, game: &GameSummary) -> i32 {
    if signal.direction >= 0 {
        game.home_moneyline
    } else {
        game.away_moneyline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::types::{EdgeClassification, EdgeState, MarketKind, MarketSignal};

    fn db() -> SignalDatabase {
        SignalDatabase::new(":memory:").unwrap()
    }

    fn edge_market(game_id: &str, kind: MarketKind, odds: i32) -> ClassifiedMarket {
        let (market_line, pick_direction) = match kind {
            MarketKind::Spread => (Some(-3.5), 1),
            MarketKind::Total => (Some(220.0), -1),
            MarketKind::Moneyline => (None, 1),
        };

        ClassifiedMarket {
            game_id: game_id.to_string(),
            sport: "NBA".to_string(),
            kind,
            american_odds: odds,
            market_line,
            pick_direction,
            signal: MarketSignal {
                deviation_points: 4.7,
                variance_score: 14.0,
                confidence_score: 82.0,
                probability: 0.57,
                sharp_action_hint: None,
                side: Some("Lakers -3.5".to_string()),
            },
            classification: EdgeClassification {
                state: EdgeState::Edge,
                side: Some("Lakers -3.5".to_string()),
                probability: 0.57,
            },
        }
    }

    #[test]
    fn test_insert_and_count() {
        let db = db();
        db.insert_signal(&edge_market("g1", MarketKind::Spread, -110)).unwrap();
        db.insert_signal(&edge_market("g2", MarketKind::Moneyline, -150)).unwrap();

        assert_eq!(db.count_signals_today().unwrap(), 2);
        assert_eq!(db.get_unsettled_signals().unwrap().len(), 2);
    }

    #[test]
    fn test_moneyline_clv_in_implied_probability_points() {
        let db = db();
        let id = db
            .insert_signal(&edge_market("g1", MarketKind::Moneyline, -110))
            .unwrap();

        // Price moved toward the pick: -110 (0.524) closed at -130 (0.565)
        db.record_closing_line(id, -130, None).unwrap();

        assert!(db.get_unsettled_signals().unwrap().is_empty());

        let avg = db.average_clv().unwrap();
        let expected = (american_to_implied_probability(-130)
            - american_to_implied_probability(-110))
            * 100.0;
        assert!((avg - expected).abs() < 1e-9);
        assert!(avg > 0.0);
    }

    #[test]
    fn test_spread_clv_is_line_movement_toward_pick() {
        let db = db();
        let id = db
            .insert_signal(&edge_market("g1", MarketKind::Spread, -110))
            .unwrap();

        // Took the home side at -3.5, line closed -4.5: beat the close by
        // a point even though the juice never moved off -110
        db.record_closing_line(id, -110, Some(-4.5)).unwrap();
        assert!((db.average_clv().unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_clv_respects_pick_direction() {
        let db = db();
        // Over pick at 220.0 (direction -1)
        let id = db
            .insert_signal(&edge_market("g1", MarketKind::Total, -110))
            .unwrap();

        // Total climbed to 224.0: the over got 4 points of value
        db.record_closing_line(id, -110, Some(224.0)).unwrap();
        assert!((db.average_clv().unwrap() - 4.0).abs() < 1e-9);

        // A line that retreats scores negative
        let id = db
            .insert_signal(&edge_market("g2", MarketKind::Total, -110))
            .unwrap();
        db.record_closing_line(id, -110, Some(218.0)).unwrap();

        let settled_avg = db.average_clv().unwrap();
        assert!((settled_avg - (4.0 - 2.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_closing_moneyline_odds_follows_recorded_side() {
        let db = db();
        db.insert_signal(&edge_market("g1", MarketKind::Moneyline, -150))
            .unwrap();
        let mut signal = db.get_unsettled_signals().unwrap().remove(0);

        let game = GameSummary {
            game_id: "g1".to_string(),
            sport: "NBA".to_string(),
            home_team: "Lakers".to_string(),
            away_team: "Celtics".to_string(),
            spread_line: -3.5,
            total_line: 220.0,
            home_moneyline: -170,
            away_moneyline: 145,
            start_time: Utc::now(),
        };

        // Recorded the home side: settle against the home price even if
        // the model has since flipped to the away side
        assert_eq!(closing_moneyline_odds(&signal, &game), -170);

        signal.direction = -1;
        assert_eq!(closing_moneyline_odds(&signal, &game), 145);
    }

    #[test]
    fn test_average_clv_empty_is_zero() {
        let db = db();
        assert!(db.average_clv().unwrap().abs() < 1e-9);
    }
}

//! Mini-game handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use questboard_core::{record_game_result, Difficulty, DifficultyConfig, Game, GameOutcome, Notice};

use super::run_unit_of_work;
use crate::auth::AuthStudent;
use crate::error::ApiError;
use crate::state::AppState;

/// One entry of the games menu.
#[derive(Debug, Serialize)]
pub struct GameSummary {
    /// Wire name, used by the other game endpoints.
    pub juego: Game,
    /// Menu title.
    pub nombre: &'static str,
    /// Menu icon.
    pub emoji: &'static str,
}

/// One difficulty row.
#[derive(Debug, Serialize)]
pub struct DifficultyEntry {
    /// Difficulty.
    pub dificultad: Difficulty,
    /// Advertised numbers.
    #[serde(flatten)]
    pub config: DifficultyConfig,
}

/// Difficulty table of a game.
#[derive(Debug, Serialize)]
pub struct GameConfigResponse {
    /// Game.
    pub juego: Game,
    /// Every difficulty, easiest first.
    pub dificultades: Vec<DifficultyEntry>,
}

/// Finished game reported by the client.
#[derive(Debug, Deserialize)]
pub struct GameResultRequest {
    /// `memoria` or `tictactoe`.
    pub juego: Option<String>,
    /// `ganado`, `perdido`, `jugado` or `empatado`.
    pub resultado: Option<String>,
    /// `facil`, `normal` or `dificil`; anything else means `normal`.
    pub dificultad: Option<String>,
}

/// Totals after a game result.
#[derive(Debug, Serialize)]
pub struct GameResultResponse {
    /// Always `ok`.
    pub status: &'static str,
    /// Point balance.
    pub nuevos_puntos: i64,
    /// Cumulative experience.
    pub nuevos_xp: i64,
    /// Level.
    pub nuevo_nivel: u32,
    /// Rewards earned along the way.
    pub notices: Vec<Notice>,
}

/// The games menu.
pub async fn list_games(_auth: AuthStudent) -> Json<Vec<GameSummary>> {
    Json(
        Game::ALL
            .into_iter()
            .map(|game| GameSummary {
                juego: game,
                nombre: game.title(),
                emoji: game.emoji(),
            })
            .collect(),
    )
}

/// Difficulty table of a game.
pub async fn get_config(
    _auth: AuthStudent,
    Path(game): Path<String>,
) -> Result<Json<GameConfigResponse>, ApiError> {
    let game: Game = game.parse()?;

    Ok(Json(GameConfigResponse {
        juego: game,
        dificultades: Difficulty::ALL
            .into_iter()
            .map(|d| DifficultyEntry {
                dificultad: d,
                config: game.config(d),
            })
            .collect(),
    }))
}

/// Apply a finished game.
pub async fn post_result(
    State(state): State<Arc<AppState>>,
    auth: AuthStudent,
    payload: Result<Json<GameResultRequest>, JsonRejection>,
) -> Result<Json<GameResultResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let (Some(juego), Some(resultado)) = (body.juego, body.resultado) else {
        return Err(ApiError::BadRequest(
            "incomplete game result: juego and resultado are required".into(),
        ));
    };
    let game: Game = juego.parse()?;
    let outcome: GameOutcome = resultado.parse()?;
    let difficulty = Difficulty::parse_or_default(body.dificultad.as_deref());

    let ((), committed) = run_unit_of_work(&state, &auth.student_id, |uow| {
        record_game_result(uow, game, outcome, difficulty).map_err(ApiError::from)
    })?;

    Ok(Json(GameResultResponse {
        status: "ok",
        nuevos_puntos: committed.student.points,
        nuevos_xp: committed.student.xp,
        nuevo_nivel: committed.student.level,
        notices: committed.notices,
    }))
}

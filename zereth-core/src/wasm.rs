//! WASM bindings for zereth-core
//!
//! Provides a JavaScript-friendly API over `Game`. Pieces are passed in
//! notation (`"E1"` for the Gold elephant, `"r3"` for Silver rabbit 3) and
//! squares as `x, y` pairs.

use wasm_bindgen::prelude::*;

use crate::{Color, Coord, DestinationTag, Game, Piece, RuleError};

/// WASM-friendly wrapper around Game
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

fn coord(x: u8, y: u8) -> Result<Coord, JsValue> {
    Coord::new(x, y).ok_or_else(|| JsValue::from_str(&format!("({}, {}) is off the board", x, y)))
}

fn piece(token: &str) -> Result<Piece, JsValue> {
    Piece::from_notation(token)
        .ok_or_else(|| JsValue::from_str(&format!("unknown piece '{}'", token)))
}

fn color(name: &str) -> Result<Color, JsValue> {
    match name {
        "gold" => Ok(Color::Gold),
        "silver" => Ok(Color::Silver),
        _ => Err(JsValue::from_str(&format!("unknown color '{}'", name))),
    }
}

fn rule(err: RuleError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

#[wasm_bindgen]
impl WasmGame {
    /// New game in the positioning phase
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame { inner: Game::new() }
    }

    /// Game with the default setup already placed
    pub fn standard() -> WasmGame {
        WasmGame { inner: Game::standard() }
    }

    // Commands. On error the game is left unchanged and the message is thrown.

    pub fn place(
        &mut self,
        token: &str,
        x: u8,
        y: u8,
        from_x: Option<u8>,
        from_y: Option<u8>,
    ) -> Result<(), JsValue> {
        let source = match (from_x, from_y) {
            (Some(fx), Some(fy)) => Some(coord(fx, fy)?),
            _ => None,
        };
        self.inner = self.inner.place(coord(x, y)?, piece(token)?, source).map_err(rule)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = movePiece)]
    pub fn move_piece(&mut self, token: &str, x: u8, y: u8) -> Result<(), JsValue> {
        self.inner = self.inner.move_piece(piece(token)?, coord(x, y)?).map_err(rule)?;
        Ok(())
    }

    pub fn reposition(&mut self, strong: &str, weak: &str, x: u8, y: u8) -> Result<(), JsValue> {
        self.inner = self
            .inner
            .reposition(piece(strong)?, piece(weak)?, coord(x, y)?)
            .map_err(rule)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = passTurn)]
    pub fn pass_turn(&mut self) -> Result<(), JsValue> {
        self.inner = self.inner.pass_turn().map_err(rule)?;
        Ok(())
    }

    pub fn undo(&mut self) -> Result<(), JsValue> {
        self.inner = self.inner.undo().map_err(rule)?;
        Ok(())
    }

    // Queries

    /// All 64 squares as `{ coord: [x, y], occupant: {kind, color, id} | null }`
    pub fn squares(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.board())
    }

    /// Move log, most recent first
    pub fn history(&self) -> Result<JsValue, JsValue> {
        let records: Vec<_> = self.inner.history().collect();
        to_js(&records)
    }

    /// Destinations of a selected piece as `[{ x, y, danger }]`
    pub fn select(&self, token: &str) -> Result<JsValue, JsValue> {
        let found: Vec<WasmDestination> = self
            .inner
            .select(&piece(token)?)
            .map_err(rule)?
            .into_iter()
            .map(WasmDestination::from)
            .collect();
        to_js(&found)
    }

    #[wasm_bindgen(js_name = isFrozen)]
    pub fn is_frozen(&self, token: &str) -> Result<bool, JsValue> {
        self.inner.is_piece_frozen(&piece(token)?).map_err(rule)
    }

    /// Unplaced pieces of `"gold"` or `"silver"` in notation
    #[wasm_bindgen(js_name = availablePieces)]
    pub fn available_pieces(&self, name: &str) -> Result<Vec<String>, JsValue> {
        Ok(self.inner.available_pieces(color(name)?).iter().map(Piece::notation).collect())
    }

    /// `"gold"` or `"silver"`
    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> String {
        self.inner.current_player().to_string()
    }

    #[wasm_bindgen(js_name = remainingMoves)]
    pub fn remaining_moves(&self) -> u8 {
        self.inner.remaining_moves()
    }

    #[wasm_bindgen(js_name = isPositioning)]
    pub fn is_positioning(&self) -> bool {
        self.inner.is_positioning()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    /// `"gold"`, `"silver"` or empty while the game goes on
    pub fn winner(&self) -> String {
        self.inner.winner().map(|c| c.to_string()).unwrap_or_default()
    }

    /// Text diagram with status line
    pub fn render(&self) -> String {
        self.inner.to_string()
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable destination for JavaScript
#[derive(serde::Serialize)]
struct WasmDestination {
    x: u8,
    y: u8,
    danger: bool,
}

impl From<(Coord, DestinationTag)> for WasmDestination {
    fn from((coord, tag): (Coord, DestinationTag)) -> Self {
        WasmDestination { x: coord.x(), y: coord.y(), danger: tag == DestinationTag::Danger }
    }
}

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::Config;
use crate::session::Session;
use crate::types::Position;

/// JavaScript facade over [`Session`].
#[wasm_bindgen]
pub struct OthelloGame {
    session: Session,
}

#[wasm_bindgen]
impl OthelloGame {
    /// `config` is a partial `Config` object, or `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<OthelloGame, JsError> {
        let config: Config = if config.is_undefined() || config.is_null() {
            Config::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(Self {
            session: Session::new(config)?,
        })
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(self.session.state())
    }

    /// Human move. Returns `false` when the move was rejected.
    pub fn place(&mut self, row: i32, col: i32) -> bool {
        let (Ok(row), Ok(col)) = (u8::try_from(row), u8::try_from(col)) else {
            return false;
        };
        self.session.play(Position::new(row, col)).is_ok()
    }

    /// Plays the computer's move if it is due. Returns the move and its
    /// label, or `undefined`.
    pub fn tick(&mut self) -> Result<JsValue, JsError> {
        match self.session.tick() {
            Some(mv) => to_js(&mv),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Milliseconds until the pending computer move is due, for `setTimeout`.
    pub fn pending_delay_ms(&self) -> Option<f64> {
        self.session
            .time_until_computer_move()
            .map(|left| left.as_secs_f64() * 1000.0)
    }

    pub fn status_text(&self) -> String {
        self.session.state().status_text()
    }

    /// Final score once the game is over, otherwise `undefined`.
    pub fn game_result(&self) -> Result<JsValue, JsError> {
        match self.session.state().result() {
            Some(result) => to_js(&result),
            None => Ok(JsValue::UNDEFINED),
        }
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    Ok(serde_wasm_bindgen::to_value(value)?)
}

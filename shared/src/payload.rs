//! Typed views over the payloads the organizer client produces.
//!
//! The relay forwards these as opaque JSON; only clients decode them.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::protocol::ProtocolError;

pub const DEFAULT_TITLE: &str = "Roda da Sorte";
pub const DEFAULT_ROTATION_SECS: f64 = 10.0;
pub const DEFAULT_BACKGROUND: &str = "#111827";
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#FF6B6B", "#FFD93D", "#6BCB77", "#4D96FF", "#F473B9", "#A16AE8",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelItem {
    pub nome: String,
    pub quantidade: u32,
}

impl WheelItem {
    pub fn new(nome: impl Into<String>, quantidade: u32) -> Self {
        Self {
            nome: nome.into(),
            quantidade,
        }
    }
}

/// Wheel configuration as broadcast in `SYNC_CONFIG` / `CONFIG_UPDATE`.
///
/// Missing fields fall back to defaults, so the empty `{}` a fresh room
/// replays to late joiners decodes cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WheelConfig {
    pub titulo: String,
    pub itens: Vec<WheelItem>,
    #[serde(deserialize_with = "seconds_from_number_or_text")]
    pub tempo_rotacao: f64,
    pub cor_fundo: String,
    pub paleta: Vec<String>,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            titulo: DEFAULT_TITLE.to_string(),
            itens: Vec::new(),
            tempo_rotacao: DEFAULT_ROTATION_SECS,
            cor_fundo: DEFAULT_BACKGROUND.to_string(),
            paleta: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl WheelConfig {
    pub fn total_weight(&self) -> u64 {
        self.itens.iter().map(|item| item.quantidade as u64).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub texto: String,
}

/// Result of a draw, computed by the organizer before `START_DRAW`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawOutcome {
    pub angulo_final: f64,
    pub vencedor: String,
    #[serde(deserialize_with = "seconds_from_number_or_text")]
    pub tempo_rotacao: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Older browser clients send durations straight from a form input, as
/// strings like `"7"`.
fn seconds_from_number_or_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(seconds) => Ok(seconds),
        NumberOrText::Text(text) => text.trim().parse::<f64>().map_err(|_| {
            serde::de::Error::custom(format!("invalid duration in seconds: {:?}", text))
        }),
    }
}

pub fn from_payload<T: DeserializeOwned>(payload: &Value) -> Result<T, ProtocolError> {
    T::deserialize(payload).map_err(|e| ProtocolError::Deserialization(e.to_string()))
}

pub fn to_payload<T: Serialize>(value: &T) -> Result<Value, ProtocolError> {
    serde_json::to_value(value).map_err(|e| ProtocolError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_is_default_config() {
        let config: WheelConfig = from_payload(&json!({})).unwrap();
        assert_eq!(config, WheelConfig::default());
        assert_eq!(config.paleta.len(), 6);
    }

    #[test]
    fn decodes_browser_config() {
        let payload = json!({
            "titulo": "X",
            "itens": [{"nome": "P1", "quantidade": 1}, {"nome": "P2", "quantidade": 3}],
            "tempoRotacao": 7,
            "corFundo": "#000000",
            "paleta": ["#fff"]
        });

        let config: WheelConfig = from_payload(&payload).unwrap();

        assert_eq!(config.titulo, "X");
        assert_eq!(config.itens[1], WheelItem::new("P2", 3));
        assert_eq!(config.tempo_rotacao, 7.0);
        assert_eq!(config.total_weight(), 4);
        assert_eq!(to_payload(&config).unwrap()["tempoRotacao"], json!(7.0));
    }

    #[test]
    fn rotation_time_accepts_numeric_text() {
        let config: WheelConfig = from_payload(&json!({
            "titulo": "Legacy",
            "itens": [{"nome": "P1", "quantidade": 2}],
            "tempoRotacao": "7"
        }))
        .unwrap();
        assert_eq!(config.tempo_rotacao, 7.0);
        assert_eq!(config.titulo, "Legacy");

        let outcome: DrawOutcome = from_payload(&json!({
            "anguloFinal": 1900.0,
            "vencedor": "P1",
            "tempoRotacao": " 12.5 "
        }))
        .unwrap();
        assert_eq!(outcome.tempo_rotacao, 12.5);

        assert!(from_payload::<WheelConfig>(&json!({"tempoRotacao": "fast"})).is_err());
        assert!(from_payload::<WheelConfig>(&json!({"tempoRotacao": true})).is_err());
    }

    #[test]
    fn draw_outcome_uses_camel_case() {
        let outcome = DrawOutcome {
            angulo_final: 1890.5,
            vencedor: "P1".to_string(),
            tempo_rotacao: 10.0,
        };

        assert_eq!(
            to_payload(&outcome).unwrap(),
            json!({"anguloFinal": 1890.5, "vencedor": "P1", "tempoRotacao": 10.0})
        );
    }

    #[test]
    fn null_payload_is_not_a_chat_message() {
        assert!(from_payload::<ChatMessage>(&Value::Null).is_err());
    }
}

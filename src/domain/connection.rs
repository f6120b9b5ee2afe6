// Connection state of the last applied fetch
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Idle,
    Ok,
    Err,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Idle => "Conectando…",
            ConnectionState::Ok => "Conectado",
            ConnectionState::Err => "Error de conexión",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ConnectionState::Idle => "md-conn md-conn--idle",
            ConnectionState::Ok => "md-conn md-conn--ok",
            ConnectionState::Err => "md-conn md-conn--err",
        }
    }
}

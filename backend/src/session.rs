//! One client's construction session and its text protocol.

use construct_core::input::InputEvent;
use construct_core::scene::{MemoryScene, Pick};
use construct_core::selection::CommandCode;
use construct_core::{Controller, EngineConfig};
use serde_json::json;
use tracing::{debug, info, warn};

/// Format an engine error as a JSON message for the frontend
pub fn format_error(code: &str, message: &str, severity: &str) -> String {
    format!("ERROR_UPDATE:{}", json!({
        "code": code,
        "message": message,
        "severity": severity
    }))
}

pub struct Session {
    controller: Controller<MemoryScene>,
    command: Option<CommandCode>,
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            controller: Controller::new(MemoryScene::new(), config),
            command: None,
        }
    }

    /// Handles one text frame. Returns the reply to send, if any.
    pub fn handle(&mut self, text: &str) -> Option<String> {
        if text == "FRAME" {
            let cursor = self.controller.update(self.command);
            let update = json!({
                "cursor": cursor,
                "entities": self.controller.snapshot(),
            });
            return Some(format!("FRAME_UPDATE:{}", update));
        }

        if let Some(payload) = text.strip_prefix("COMMAND:") {
            if payload == "NONE" {
                self.command = None;
                info!("Command cleared");
                return None;
            }
            return match serde_json::from_str::<CommandCode>(payload) {
                Ok(code) => {
                    self.command = Some(code);
                    info!("Command armed: {}", code);
                    None
                }
                Err(e) => Some(bad_message("COMMAND", &e)),
            };
        }

        if let Some(payload) = text.strip_prefix("PICK:") {
            if payload == "NONE" {
                self.controller.scene_mut().set_pick(None);
                return None;
            }
            return match serde_json::from_str::<Pick>(payload) {
                Ok(pick) => {
                    debug!("Pick reported: {:?}", pick);
                    self.controller.scene_mut().set_pick(Some(pick));
                    None
                }
                Err(e) => Some(bad_message("PICK", &e)),
            };
        }

        if let Some(payload) = text.strip_prefix("EVENT:") {
            let event = match serde_json::from_str::<InputEvent>(payload) {
                Ok(event) => event,
                Err(e) => return Some(bad_message("EVENT", &e)),
            };
            return match self.controller.handle_event(&event, self.command) {
                Ok(outcome) => {
                    let json = serde_json::to_string(&outcome).unwrap_or("{}".into());
                    Some(format!("OUTCOME:{}", json))
                }
                Err(e) => {
                    warn!("Event failed: {}", e);
                    Some(format_error(e.code(), &e.to_string(), "warning"))
                }
            };
        }

        warn!("Unknown message: {}", text);
        Some(format_error("UNKNOWN_MESSAGE", &format!("Unknown message: {}", text), "warning"))
    }

    pub fn scene(&self) -> &MemoryScene {
        self.controller.scene()
    }
}

fn bad_message(kind: &str, e: &serde_json::Error) -> String {
    warn!("Failed to parse {} payload: {}", kind, e);
    format_error("BAD_MESSAGE", &format!("Invalid {} payload: {}", kind, e), "warning")
}

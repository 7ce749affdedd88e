//! Boundary to the drawing layer.
//!
//! Widgets only compute scenes; a [`SceneRenderer`] turns them into pixels,
//! SVG, or anything else the host uses.

use crate::data_types::Scene;
use eyre::{Result, WrapErr};
use std::collections::BTreeMap;
use tracing::warn;

pub trait SceneRenderer {
    /// Draws `scene` into the target identified by `mount`, replacing what was there.
    fn draw(&mut self, mount: &str, scene: &Scene);
}

/// Keeps the latest scene of every mount as JSON, for hosts that draw in
/// another process (e.g. a browser front end).
#[derive(Debug, Default)]
pub struct JsonSceneWriter {
    frames: BTreeMap<String, serde_json::Value>,
    draws: usize,
}

impl JsonSceneWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self, mount: &str) -> Option<&serde_json::Value> {
        self.frames.get(mount)
    }

    pub fn mounts(&self) -> impl Iterator<Item = &str> {
        self.frames.keys().map(String::as_str)
    }

    /// Number of `draw` calls received.
    pub fn draw_count(&self) -> usize {
        self.draws
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(&self.frames).wrap_err("failed to serialize scenes")
    }
}

impl SceneRenderer for JsonSceneWriter {
    fn draw(&mut self, mount: &str, scene: &Scene) {
        self.draws += 1;
        match serde_json::to_value(scene) {
            Ok(value) => {
                self.frames.insert(mount.to_string(), value);
            }
            Err(err) => warn!(mount, %err, "scene could not be serialized"),
        }
    }
}

//! Settings for the websocket viewer that streams rendered frames

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub host: String,
    /// Port the encoded frames are pushed on.
    pub send_port: u16,
    /// Port camera updates arrive on.
    pub recv_port: u16,
    pub camera_cfg: CameraConfig,
    /// JPEG quality for streamed frames, 1-100.
    pub jpeg_quality: u8,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            send_port: 1024,
            recv_port: 1025,
            camera_cfg: CameraConfig::default(),
            jpeg_quality: 75,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    #[serde(rename = "H")]
    pub height: u32,
    #[serde(rename = "W")]
    pub width: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { height: 1080, width: 1920 }
    }
}

impl ViewerConfig {
    pub fn validate(&self, field: &str, errors: &mut ValidationError) {
        if self.host.trim().is_empty() {
            errors.push(format!("{field}.host"), "must not be empty");
        }
        if self.send_port == 0 {
            errors.push(format!("{field}.send_port"), "must be non-zero");
        }
        if self.recv_port == 0 {
            errors.push(format!("{field}.recv_port"), "must be non-zero");
        }
        if self.send_port != 0 && self.send_port == self.recv_port {
            errors.push(
                format!("{field}.recv_port"),
                format!("must differ from send_port ({})", self.send_port),
            );
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            errors.push(
                format!("{field}.jpeg_quality"),
                format!("must be within 1..=100, got {}", self.jpeg_quality),
            );
        }
        if self.camera_cfg.height == 0 || self.camera_cfg.width == 0 {
            errors.push(
                format!("{field}.camera_cfg"),
                format!(
                    "H and W must be non-zero, got {}x{}",
                    self.camera_cfg.height, self.camera_cfg.width
                ),
            );
        }
    }
}

//! Job entity model: one end-to-end design-generation request.

use genui_core::device::{find_device, DeviceSpec, DEFAULT_DEVICE};
use genui_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::status::{GenerationType, StatusId};

/// A row from the `jobs` table.
///
/// Created by the submission API before the orchestrator runs; the
/// orchestrator only transitions `status_id` and writes back planning
/// artifacts, completion time, and an error message on failed runs.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub user_id: DbId,
    pub user_prompt: String,
    pub status_id: StatusId,
    pub screen_count: i32,
    pub model: String,
    /// Target device descriptor (name, width, height, corner radius).
    pub device: serde_json::Value,
    pub generation_type: StatusId,
    pub platform: Option<String>,
    /// Enhanced brief produced by the chained planner, if used.
    pub optimized_prompt: Option<String>,
    /// Screen sitemap produced by the chained planner, if used.
    pub information_architecture: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub error_message: Option<String>,
}

impl Job {
    /// Decode the stored device descriptor, falling back to the Desktop
    /// canvas when it is missing or malformed.
    pub fn device_spec(&self) -> DeviceSpec {
        serde_json::from_value(self.device.clone())
            .unwrap_or_else(|_| find_device(DEFAULT_DEVICE))
    }

    /// Decode the generation type, defaulting to a multi-screen flow for
    /// unknown ids.
    pub fn generation_type(&self) -> GenerationType {
        GenerationType::from_id(self.generation_type).unwrap_or(GenerationType::Flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn job_with_device(device: serde_json::Value) -> Job {
        Job {
            id: 1,
            user_id: 7,
            user_prompt: "a coffee ordering app".into(),
            status_id: 1,
            screen_count: 3,
            model: "gemini-2.5-pro".into(),
            device,
            generation_type: 1,
            platform: Some("mobile".into()),
            optimized_prompt: None,
            information_architecture: None,
            created_at: Utc::now(),
            completed_at: None,
            error_message: None,
        }
    }

    #[test]
    fn device_spec_decodes_stored_descriptor() {
        let job = job_with_device(serde_json::json!({
            "name": "iPhone 16 Pro", "width": 402, "height": 874, "corner_radius": 55
        }));
        assert_eq!(job.device_spec().width, 402);
    }

    #[test]
    fn malformed_device_falls_back_to_desktop() {
        let job = job_with_device(serde_json::json!({"name": "broken"}));
        assert_eq!(job.device_spec().name, "Desktop");
    }

    #[test]
    fn unknown_generation_type_defaults_to_flow() {
        let mut job = job_with_device(serde_json::Value::Null);
        job.generation_type = 42;
        assert_eq!(job.generation_type(), GenerationType::Flow);
    }
}

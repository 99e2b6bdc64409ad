//! In-memory store and scripted providers for pipeline tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use genui_cloud::{BlobStore, StorageError};
use genui_core::types::DbId;
use genui_db::models::status::{ComponentStatus, JobStatus, StatusId};
use genui_db::models::{Component, Job};
use genui_db::{JobStore, StoreError};
use genui_llm::{
    ChatMessage, CompletionError, CompletionProvider, ImageGenError, ImageProvider, Role,
};
use genui_pipeline::ProviderFactory;

// ---------------------------------------------------------------------------
// In-memory job store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct StoreState {
    pub jobs: HashMap<DbId, Job>,
    pub components: Vec<Component>,
    pub credits: HashMap<DbId, i64>,
    /// When set, every store call fails with a query error, simulating
    /// an unreachable database.
    pub unreachable: bool,
    /// When set, the store becomes unreachable right after the job is
    /// marked Running.
    pub unreachable_after_running: bool,
    /// Credit debits recorded as (user_id, amount).
    pub debits: Vec<(DbId, i64)>,
}

/// In-memory [`JobStore`] mirroring the SQL guards of the Postgres
/// implementation: monotonic job status, terminal component updates only
/// applying to open rows, conditional credit decrement.
pub struct MemoryStore {
    pub state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new(job: Job, components: Vec<Component>, credits: i64) -> Arc<Self> {
        let mut state = StoreState::default();
        state.credits.insert(job.user_id, credits);
        state.jobs.insert(job.id, job);
        state.components = components;
        Arc::new(Self {
            state: Mutex::new(state),
        })
    }

    pub fn set_unreachable(&self) {
        self.state.lock().unwrap().unreachable = true;
    }

    pub fn set_unreachable_after_running(&self) {
        self.state.lock().unwrap().unreachable_after_running = true;
    }

    pub fn job_status(&self, job_id: DbId) -> StatusId {
        self.state.lock().unwrap().jobs[&job_id].status_id
    }

    pub fn job(&self, job_id: DbId) -> Job {
        self.state.lock().unwrap().jobs[&job_id].clone()
    }

    pub fn components(&self) -> Vec<Component> {
        self.state.lock().unwrap().components.clone()
    }

    pub fn credits(&self, user_id: DbId) -> i64 {
        self.state.lock().unwrap().credits[&user_id]
    }

    fn check_reachable(state: &StoreState) -> Result<(), StoreError> {
        if state.unreachable {
            Err(StoreError::Query(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

fn open(status_id: StatusId) -> bool {
    status_id == ComponentStatus::Submitted.id() || status_id == ComponentStatus::Running.id()
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn find_job(&self, job_id: DbId) -> Result<Job, StoreError> {
        let state = self.state.lock().unwrap();
        Self::check_reachable(&state)?;
        state.jobs.get(&job_id).cloned().ok_or(StoreError::NotFound {
            entity: "job",
            id: job_id,
        })
    }

    async fn mark_job_running(&self, job_id: DbId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        Self::check_reachable(&state)?;
        let job = state.jobs.get_mut(&job_id).ok_or(StoreError::NotFound {
            entity: "job",
            id: job_id,
        })?;
        if job.status_id < JobStatus::Running.id() {
            job.status_id = JobStatus::Running.id();
            if state.unreachable_after_running {
                state.unreachable = true;
            }
            Ok(())
        } else {
            Err(StoreError::TransitionRejected {
                entity: "job",
                id: job_id,
            })
        }
    }

    async fn complete_job(&self, job_id: DbId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        Self::check_reachable(&state)?;
        let job = state.jobs.get_mut(&job_id).ok_or(StoreError::NotFound {
            entity: "job",
            id: job_id,
        })?;
        if job.status_id < JobStatus::Completed.id() {
            job.status_id = JobStatus::Completed.id();
            job.completed_at = Some(Utc::now());
            Ok(())
        } else {
            Err(StoreError::TransitionRejected {
                entity: "job",
                id: job_id,
            })
        }
    }

    async fn complete_job_with_error(&self, job_id: DbId, error: &str) -> Result<(), StoreError> {
        self.complete_job(job_id).await?;
        let mut state = self.state.lock().unwrap();
        if let Some(job) = state.jobs.get_mut(&job_id) {
            job.error_message = Some(error.to_string());
        }
        Ok(())
    }

    async fn store_planning_artifacts(
        &self,
        job_id: DbId,
        optimized_prompt: Option<&str>,
        information_architecture: Option<&serde_json::Value>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        Self::check_reachable(&state)?;
        let job = state.jobs.get_mut(&job_id).ok_or(StoreError::NotFound {
            entity: "job",
            id: job_id,
        })?;
        if let Some(prompt) = optimized_prompt {
            job.optimized_prompt = Some(prompt.to_string());
        }
        if let Some(ia) = information_architecture {
            job.information_architecture = Some(ia.clone());
        }
        Ok(())
    }

    async fn list_components(&self, job_id: DbId) -> Result<Vec<Component>, StoreError> {
        let state = self.state.lock().unwrap();
        Self::check_reachable(&state)?;
        Ok(state
            .components
            .iter()
            .filter(|c| c.parent_job_id == job_id)
            .cloned()
            .collect())
    }

    async fn assign_sub_prompt(
        &self,
        component_id: DbId,
        sub_prompt: &str,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        Self::check_reachable(&state)?;
        let component = state
            .components
            .iter_mut()
            .find(|c| c.id == component_id && open(c.status_id))
            .ok_or(StoreError::TransitionRejected {
                entity: "component",
                id: component_id,
            })?;
        component.sub_prompt = Some(sub_prompt.to_string());
        component.status_id = ComponentStatus::Running.id();
        Ok(())
    }

    async fn mark_component_successful(
        &self,
        component_id: DbId,
        code: &str,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        Self::check_reachable(&state)?;
        let component = state
            .components
            .iter_mut()
            .find(|c| c.id == component_id && open(c.status_id))
            .ok_or(StoreError::TransitionRejected {
                entity: "component",
                id: component_id,
            })?;
        component.status_id = ComponentStatus::Successful.id();
        component.code = Some(code.to_string());
        component.error_message = None;
        component.completed_at = Some(Utc::now());
        Ok(())
    }

    async fn mark_component_failed(
        &self,
        component_id: DbId,
        error: &str,
        invalid_code: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        Self::check_reachable(&state)?;
        let component = state
            .components
            .iter_mut()
            .find(|c| c.id == component_id && open(c.status_id))
            .ok_or(StoreError::TransitionRejected {
                entity: "component",
                id: component_id,
            })?;
        component.status_id = ComponentStatus::Failed.id();
        component.error_message = Some(error.to_string());
        if let Some(code) = invalid_code {
            component.code = Some(code.to_string());
        }
        component.completed_at = Some(Utc::now());
        Ok(())
    }

    async fn mark_components_failed(&self, job_id: DbId, error: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        Self::check_reachable(&state)?;
        for component in state
            .components
            .iter_mut()
            .filter(|c| c.parent_job_id == job_id && open(c.status_id))
        {
            component.status_id = ComponentStatus::Failed.id();
            component.error_message = Some(error.to_string());
            component.completed_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn consume_credits(&self, user_id: DbId, amount: i64) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        Self::check_reachable(&state)?;
        state.debits.push((user_id, amount));
        match state.credits.get_mut(&user_id) {
            Some(balance) if *balance >= amount => {
                *balance -= amount;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const JOB_ID: DbId = 11;
pub const USER_ID: DbId = 7;

pub fn job(screen_count: i32) -> Job {
    Job {
        id: JOB_ID,
        user_id: USER_ID,
        user_prompt: "a simple meditation app".into(),
        status_id: JobStatus::Submitted.id(),
        screen_count,
        model: "gemini-2.5-pro".into(),
        device: serde_json::json!({
            "name": "iPhone 16 Pro", "width": 402, "height": 874, "corner_radius": 55
        }),
        generation_type: 1,
        platform: Some("mobile".into()),
        optimized_prompt: None,
        information_architecture: None,
        created_at: Utc::now(),
        completed_at: None,
        error_message: None,
    }
}

pub fn components(count: usize) -> Vec<Component> {
    (0..count)
        .map(|i| Component {
            id: 100 + i as DbId,
            parent_job_id: JOB_ID,
            status_id: ComponentStatus::Submitted.id(),
            sub_prompt: None,
            code: None,
            error_message: None,
            completed_at: None,
            created_at: Utc::now(),
        })
        .collect()
}

/// A minimal valid generated document for one screen.
pub fn screen_doc(name: &str) -> String {
    format!(
        r#"{{"screens": [{{"screen_id": "{id}", "screen_name": "{name}", "screen_type": "dashboard", "node": {{"type": "frame", "name": "{name}", "size": {{"width": 402, "height": 874}}}}}}]}}"#,
        id = name.to_lowercase().replace(' ', "_"),
    )
}

/// A generated document whose node tree embeds one image request per
/// prompt.
pub fn screen_doc_with_images(name: &str, prompts: &[&str]) -> String {
    let children: Vec<String> = prompts
        .iter()
        .map(|p| format!(r#"{{"type": "image", "prompt": "{p}", "size": {{"width": "fill", "height": 240}}}}"#))
        .collect();
    format!(
        r#"{{"screens": [{{"screen_name": "{name}", "node": {{"type": "frame", "name": "{name}", "children": [{}]}}}}]}}"#,
        children.join(","),
    )
}

/// A planner response with `count` screens whose sub-prompts are
/// "brief-1".."brief-N".
pub fn planner_json(count: usize) -> String {
    let screens: Vec<String> = (1..=count)
        .map(|i| {
            format!(
                r#"{{"screen_id": "screen_{i}", "screen_name": "Screen {i}", "screen_type": "flow_step", "sub_prompt": "brief-{i}"}}"#
            )
        })
        .collect();
    format!(r#"{{"screens": [{}]}}"#, screens.join(","))
}

// ---------------------------------------------------------------------------
// Scripted providers
// ---------------------------------------------------------------------------

/// Completion provider answering from a fixed queue (planner chains) or
/// routing worker calls by their sub-prompt.
#[derive(Debug)]
pub struct ScriptedProvider {
    /// Responses consumed in order by planning-stage calls.
    pub queued: Mutex<VecDeque<Result<String, u16>>>,
    /// Worker responses keyed by the user message (sub-prompt); `Err`
    /// simulates a provider API failure with that status.
    pub routed: HashMap<String, Result<String, u16>>,
}

impl ScriptedProvider {
    pub fn queued(responses: Vec<Result<String, u16>>) -> Box<Self> {
        Box::new(Self {
            queued: Mutex::new(responses.into_iter().collect()),
            routed: HashMap::new(),
        })
    }

    pub fn routed(routes: Vec<(String, Result<String, u16>)>) -> Box<Self> {
        Box::new(Self {
            queued: Mutex::new(VecDeque::new()),
            routed: routes.into_iter().collect(),
        })
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();

        let scripted = if let Some(route) = self.routed.get(&user) {
            route.clone()
        } else {
            self.queued
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(500))
        };

        scripted.map_err(|status| CompletionError::Api {
            status,
            body: "scripted failure".into(),
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Image provider returning fixed bytes, with optional per-prompt
/// failures.
pub struct ScriptedImages {
    pub fail_prompts: Vec<String>,
}

#[async_trait]
impl ImageProvider for ScriptedImages {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ImageGenError> {
        if self.fail_prompts.iter().any(|p| prompt.contains(p)) {
            Err(ImageGenError::EmptyResponse("scripted failure".into()))
        } else {
            Ok(format!("img:{prompt}").into_bytes())
        }
    }
}

/// Blob store recording uploads and answering deterministic URIs.
#[derive(Default)]
pub struct MemoryBlob {
    pub uploads: Mutex<Vec<String>>,
}

#[async_trait]
impl BlobStore for MemoryBlob {
    async fn upload(&self, scope: &str, _bytes: Vec<u8>) -> Result<String, StorageError> {
        let mut uploads = self.uploads.lock().unwrap();
        let url = format!("https://blobs.test/{scope}/{}", uploads.len());
        uploads.push(scope.to_string());
        Ok(url)
    }
}

/// Provider factory handing out scripted providers in acquisition
/// order: the planning stage takes the first completion provider, the
/// generation stage the second.
pub struct ScriptedFactory {
    completions: Mutex<VecDeque<Box<dyn CompletionProvider>>>,
    images: ScriptedImagesConfig,
    pub blob: Arc<MemoryBlob>,
}

pub struct ScriptedImagesConfig {
    pub fail_prompts: Vec<String>,
}

impl ScriptedFactory {
    pub fn new(completions: Vec<Box<dyn CompletionProvider>>) -> Arc<Self> {
        Arc::new(Self {
            completions: Mutex::new(completions.into_iter().collect()),
            images: ScriptedImagesConfig {
                fail_prompts: Vec::new(),
            },
            blob: Arc::new(MemoryBlob::default()),
        })
    }

    pub fn with_failing_images(
        completions: Vec<Box<dyn CompletionProvider>>,
        fail_prompts: Vec<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            completions: Mutex::new(completions.into_iter().collect()),
            images: ScriptedImagesConfig { fail_prompts },
            blob: Arc::new(MemoryBlob::default()),
        })
    }
}

impl ProviderFactory for ScriptedFactory {
    fn completion(&self, _model: &str) -> Result<Box<dyn CompletionProvider>, CompletionError> {
        self.completions
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(CompletionError::ApiKeyMissing("scripted"))
    }

    fn image(&self) -> Box<dyn ImageProvider> {
        Box::new(ScriptedImages {
            fail_prompts: self.images.fail_prompts.clone(),
        })
    }

    fn blob_store(&self) -> Arc<dyn BlobStore> {
        Arc::clone(&self.blob) as Arc<dyn BlobStore>
    }
}

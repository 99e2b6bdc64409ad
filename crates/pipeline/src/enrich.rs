//! Image enrichment stage: resolve embedded image requests.
//!
//! Successful outcomes are walked for image-request nodes; all collected
//! prompts are generated concurrently, uploaded concurrently, and the
//! resulting URIs injected back in first-visit order, FIFO per outcome.
//! A failed generation or upload simply yields fewer URIs -- the
//! remaining nodes stay unresolved and the outcome is kept.  The whole
//! stage is a no-op when no outcome requests an image.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use futures::future::join_all;

use genui_core::document::{self, ScreenSet};
use genui_core::types::DbId;

use crate::generator::Outcome;
use crate::providers::ProviderFactory;

/// Grace delay after closing the image client, letting in-flight
/// connection teardown finish before the stage returns.
const CLIENT_TEARDOWN_GRACE: Duration = Duration::from_millis(250);

/// Resolve embedded image requests across all outcomes.
///
/// `component_ids` is the positional component list; it only scopes blob
/// object keys, so a missing id falls back to the outcome position.
pub async fn enrich(
    factory: &dyn ProviderFactory,
    component_ids: &[DbId],
    outcomes: Vec<Outcome>,
) -> Vec<Outcome> {
    // First walk: parse successful outcomes and collect their image
    // prompts, keyed by outcome position.
    let mut parsed: Vec<Option<ScreenSet>> = vec![None; outcomes.len()];
    let mut requests: Vec<(usize, String)> = Vec::new();

    for (index, outcome) in outcomes.iter().enumerate() {
        let Outcome::Success { code } = outcome else {
            continue;
        };
        let Ok(doc) = document::try_parse(code) else {
            // Opaque content carries no addressable image nodes.
            continue;
        };
        let prompts = doc.collect_image_prompts();
        if !prompts.is_empty() {
            requests.extend(prompts.into_iter().map(|p| (index, p)));
            parsed[index] = Some(doc);
        }
    }

    if requests.is_empty() {
        return outcomes;
    }

    tracing::info!(
        images = requests.len(),
        outcomes = outcomes.len(),
        "Generating embedded images",
    );

    let image = factory.image();
    let blob = factory.blob_store();

    // Generate all prompts concurrently, settle-all.  A failed prompt
    // produces an empty slot instead of aborting the batch.
    let generated: Vec<Option<Vec<u8>>> = join_all(requests.iter().map(|(index, prompt)| {
        let image = image.as_ref();
        async move {
            match image.generate(prompt).await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    tracing::warn!(outcome = index, error = %e, "Image generation failed");
                    None
                }
            }
        }
    }))
    .await;

    // Upload the produced images concurrently.
    let uploaded: Vec<Option<String>> =
        join_all(requests.iter().zip(generated).map(|((index, _), bytes)| {
            let blob = blob.as_ref();
            let scope = component_ids
                .get(*index)
                .map(|id| format!("component-{id}"))
                .unwrap_or_else(|| format!("screen-{index}"));
            async move {
                let bytes = bytes?;
                match blob.upload(&scope, bytes).await {
                    Ok(url) => Some(url),
                    Err(e) => {
                        tracing::warn!(outcome = index, error = %e, "Image upload failed");
                        None
                    }
                }
            }
        }))
        .await;

    image.close().await;
    tokio::time::sleep(CLIENT_TEARDOWN_GRACE).await;

    // Queue the successful URIs per outcome, preserving first-visit
    // order within each outcome.
    let mut queues: HashMap<usize, VecDeque<String>> = HashMap::new();
    for ((index, _), url) in requests.iter().zip(uploaded) {
        if let Some(url) = url {
            queues.entry(*index).or_default().push_back(url);
        }
    }

    // Second walk: inject and re-serialize the patched documents.
    let mut outcomes = outcomes;
    for (index, doc) in parsed.into_iter().enumerate() {
        let Some(mut doc) = doc else { continue };
        let Some(mut queue) = queues.remove(&index) else {
            continue;
        };
        let patched = doc.inject_image_urls(&mut queue);
        tracing::debug!(outcome = index, patched, "Injected image URIs");
        if let (Outcome::Success { code }, Ok(serialized)) =
            (&mut outcomes[index], serde_json::to_string(&doc))
        {
            *code = serialized;
        }
    }

    outcomes
}

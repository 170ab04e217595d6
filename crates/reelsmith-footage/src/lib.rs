//! Footage stage: sources stock clips to cover the narration.
//!
//! One search per script segment using extracted keywords, with the run topic
//! as the fallback query. The stage fails rather than return a footage set
//! shorter than the narration; timeline planning downstream assumes coverage.

mod client;
mod error;
mod keywords;
mod select;

pub use client::{MIN_HEIGHT, MIN_WIDTH, StockClient, StockConfig};
pub use error::{FootageError, Result};
pub use keywords::{build_query, extract_keywords};
pub use select::{allot_segments, choose_clip, top_up};

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{debug, info};

use reelsmith_pipeline::{FootageStage, StageError};
use reelsmith_types::{Clip, FootageSet, RunConfig, Script};

/// Production footage stage backed by a stock video provider.
pub struct FootageSourcer {
    client: StockClient,
}

impl FootageSourcer {
    pub fn new(config: StockConfig) -> Result<Self> {
        Ok(Self {
            client: StockClient::new(config)?,
        })
    }

    async fn source_inner(
        &self,
        config: &RunConfig,
        script: &Script,
        narration_secs: f64,
    ) -> Result<FootageSet> {
        let api_key = &config.credentials.footage_api_key;
        let muted_only = !config.allow_copyrighted_audio;
        let allotments = select::allot_segments(script, narration_secs);

        let mut used: HashSet<u64> = HashSet::new();
        let mut clips: Vec<Clip> = Vec::new();

        for (segment, allotted) in script.segments.iter().zip(&allotments) {
            let query = keywords::build_query(&keywords::extract_keywords(
                &segment.text,
                &config.topic,
            ));
            debug!(query = %query, allotted_secs = allotted, "searching footage");

            let mut candidates = self.client.search(api_key, &query, muted_only).await?;
            if select::choose_clip(&candidates, *allotted, &used).is_none() {
                // Fall back to the run topic when the segment's keywords
                // surface nothing usable.
                candidates = self.client.search(api_key, &config.topic, muted_only).await?;
            }

            if let Some(clip) = select::choose_clip(&candidates, *allotted, &used) {
                used.insert(clip.id);
                clips.push(clip);
            }
        }

        // Top up from the topic query if the per-segment picks fall short.
        let mut set = FootageSet::new(clips);
        if set.total_secs() < narration_secs {
            let candidates = self.client.search(api_key, &config.topic, muted_only).await?;
            select::top_up(&mut set, candidates, &mut used, narration_secs)?;
        }

        info!(
            clips = set.clips.len(),
            total_secs = set.total_secs(),
            narration_secs,
            "footage sourced"
        );
        Ok(set)
    }
}

#[async_trait]
impl FootageStage for FootageSourcer {
    async fn source(
        &self,
        config: &RunConfig,
        script: &Script,
        narration_secs: f64,
    ) -> std::result::Result<FootageSet, StageError> {
        Ok(self.source_inner(config, script, narration_secs).await?)
    }
}

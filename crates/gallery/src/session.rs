/// The long-lived session driver. Owns the collection, the refresh
/// marker, and the current state; every transition goes through here,
/// and nothing else writes the store after the initial load.
use crate::{messages, refresh_due, DailyRefresh, Draft, GalleryError, GalleryState, Result};
use chrono::{DateTime, Local, Utc};
use genai::PromptPipeline;
use store::{GalleryStore, VideoArtifact};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

pub struct GallerySession {
    store: GalleryStore,
    pipeline: PromptPipeline,
    refresh: DailyRefresh,
    videos: Vec<VideoArtifact>,
    marker: Option<DateTime<Utc>>,
    state: GalleryState,
    watch_tx: watch::Sender<GalleryState>,
}

impl GallerySession {
    pub fn new(store: GalleryStore, pipeline: PromptPipeline) -> Self {
        let (watch_tx, _) = watch::channel(GalleryState::Loading);
        Self {
            store,
            pipeline,
            refresh: DailyRefresh::default(),
            videos: Vec::new(),
            marker: None,
            state: GalleryState::Loading,
            watch_tx,
        }
    }

    pub fn with_daily_refresh(mut self, refresh: DailyRefresh) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    pub fn videos(&self) -> &[VideoArtifact] {
        &self.videos
    }

    pub fn marker(&self) -> Option<DateTime<Utc>> {
        self.marker
    }

    pub fn video(&self, id: &str) -> Option<&VideoArtifact> {
        self.videos.iter().find(|v| v.id == id)
    }

    /// Watch every state change; the receiver always holds the latest
    pub fn subscribe(&self) -> watch::Receiver<GalleryState> {
        self.watch_tx.subscribe()
    }

    /// Startup flow: load the store, run the daily batch if one is due
    /// today, and land in `Browsing` (or a dismissible `Error` if the
    /// whole batch failed).
    pub async fn initialize(&mut self) -> Result<()> {
        self.startup(false).await
    }

    /// Startup flow that runs the daily batch even when one already ran
    /// today. The marker still only advances on success.
    pub async fn refresh_now(&mut self) -> Result<()> {
        self.startup(true).await
    }

    async fn startup(&mut self, force: bool) -> Result<()> {
        if self.state != GalleryState::Loading {
            return Err(self.invalid_trigger("initialize"));
        }

        let (videos, marker) = self.store.load();
        info!(
            "loaded {} videos from {}",
            videos.len(),
            self.store.dir().display()
        );
        self.videos = videos;
        self.marker = marker;

        if !force && !refresh_due(self.marker, Local::now()) {
            debug!("gallery already refreshed today");
            self.set_state(GalleryState::Browsing);
            return Ok(());
        }

        self.set_state(GalleryState::DailyRefreshing {
            status: String::new(),
        });
        let fresh = {
            let tx = &self.watch_tx;
            self.refresh
                .run(&self.pipeline, |status| {
                    tx.send_replace(GalleryState::DailyRefreshing { status });
                })
                .await
        };

        if fresh.is_empty() {
            // Marker untouched, so the next launch retries the batch.
            warn!("daily refresh produced nothing; keeping the cached gallery");
            self.set_state(GalleryState::Error {
                messages: messages::daily_refresh_failed(),
            });
            return Ok(());
        }

        info!("daily refresh added {} videos", fresh.len());
        let mut updated = fresh;
        updated.extend(self.videos.drain(..));
        self.videos = updated;
        self.persist_videos();
        self.marker = Some(Utc::now());
        self.persist_marker();
        self.set_state(GalleryState::Browsing);
        Ok(())
    }

    /// Open an artifact in the player
    pub fn play(&mut self, id: &str) -> Result<()> {
        if self.state != GalleryState::Browsing {
            return Err(self.invalid_trigger("play"));
        }
        if self.video(id).is_none() {
            return Err(GalleryError::UnknownArtifact(id.to_string()));
        }
        self.set_state(GalleryState::Playing { id: id.to_string() });
        Ok(())
    }

    pub fn close_player(&mut self) -> Result<()> {
        if !matches!(self.state, GalleryState::Playing { .. }) {
            return Err(self.invalid_trigger("close"));
        }
        self.set_state(GalleryState::Browsing);
        Ok(())
    }

    /// Start editing a fresh draft
    pub fn start_create(&mut self) -> Result<()> {
        let from_player = self.editing_entry_point("create")?;
        self.set_state(GalleryState::Editing {
            draft: Draft::create(),
            from_player,
        });
        Ok(())
    }

    /// Start editing a draft seeded from an existing artifact
    pub fn start_remix(&mut self, id: &str) -> Result<()> {
        let from_player = self.editing_entry_point("remix")?;
        let source = self
            .video(id)
            .ok_or_else(|| GalleryError::UnknownArtifact(id.to_string()))?;
        let draft = Draft::remix(source);
        self.set_state(GalleryState::Editing { draft, from_player });
        Ok(())
    }

    /// Abandon the draft and restore whatever state editing started from
    pub fn cancel_edit(&mut self) -> Result<()> {
        let next = match &self.state {
            GalleryState::Editing {
                from_player: Some(id),
                ..
            } => GalleryState::Playing { id: id.clone() },
            GalleryState::Editing {
                from_player: None, ..
            } => GalleryState::Browsing,
            _ => return Err(self.invalid_trigger("cancel")),
        };
        self.set_state(next);
        Ok(())
    }

    /// Generate the edited draft. On success the new artifact is
    /// prepended, persisted, and opened in the player; on generation
    /// failure the collection is untouched and a dismissible error is
    /// surfaced. Never leaves the session stuck in `Saving`.
    pub async fn confirm_edit(&mut self, prompt: &str) -> Result<()> {
        let remix_title = match &self.state {
            GalleryState::Editing { draft, .. } => draft
                .remix_of
                .as_ref()
                .map(|source| format!("Remix of \"{}\"", source.title)),
            _ => return Err(self.invalid_trigger("save")),
        };
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GalleryError::EmptyPrompt);
        }

        self.set_state(GalleryState::Saving);
        let outcome = match remix_title {
            Some(title) => self.pipeline.create_with_title(prompt, title).await,
            None => self.pipeline.create_from_prompt(prompt).await,
        };
        match outcome {
            Ok(artifact) => {
                info!("generated \"{}\"", artifact.title);
                let id = artifact.id.clone();
                self.videos.insert(0, artifact);
                self.persist_videos();
                self.set_state(GalleryState::Playing { id });
            }
            Err(err) => {
                error!("generation failed: {err}");
                self.set_state(GalleryState::Error {
                    messages: messages::generation_failed(&err),
                });
            }
        }
        Ok(())
    }

    pub fn dismiss_error(&mut self) -> Result<()> {
        if !matches!(self.state, GalleryState::Error { .. }) {
            return Err(self.invalid_trigger("dismiss"));
        }
        self.set_state(GalleryState::Browsing);
        Ok(())
    }

    fn editing_entry_point(&self, trigger: &'static str) -> Result<Option<String>> {
        match &self.state {
            GalleryState::Browsing => Ok(None),
            GalleryState::Playing { id } => Ok(Some(id.clone())),
            _ => Err(self.invalid_trigger(trigger)),
        }
    }

    fn invalid_trigger(&self, trigger: &'static str) -> GalleryError {
        GalleryError::InvalidTrigger {
            trigger,
            state: self.state.label(),
        }
    }

    // Write failures keep the in-memory session correct and are only logged.
    fn persist_videos(&self) {
        if let Err(err) = self.store.save_videos(&self.videos) {
            warn!("failed to persist gallery: {err}");
        }
    }

    fn persist_marker(&self) {
        if let Some(at) = self.marker {
            if let Err(err) = self.store.save_marker(at) {
                warn!("failed to persist refresh marker: {err}");
            }
        }
    }

    fn set_state(&mut self, next: GalleryState) {
        debug!("{} -> {}", self.state.label(), next.label());
        self.state = next.clone();
        self.watch_tx.send_replace(next);
    }
}

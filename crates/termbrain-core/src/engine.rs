use crate::config::Settings;
use crate::context::ContextAssembler;
use crate::directives::{DirectiveOutcome, FileDirectiveExtractor};
use crate::error::Result;
use crate::llm::LlmClient;
use crate::memory::MemoryStore;
use crate::models::ModelSpec;
use crate::search::{SearchResult, WebSearch};
use crate::session::{ConversationHistory, SessionStore};
use crate::stream::StreamConsumer;
use std::path::{Path, PathBuf};

/// What one completed turn produced.
#[derive(Debug)]
pub enum TurnOutcome {
    Text {
        response: String,
        directives: Vec<DirectiveOutcome>,
    },
    Image {
        path: PathBuf,
    },
}

/// The single active session: owns history, memory, and the model
/// selection, and sequences one turn at a time through assembly,
/// streaming, directive extraction, and persistence.
pub struct SessionEngine {
    client: Box<dyn LlmClient>,
    settings: Settings,
    store: SessionStore,
    history: ConversationHistory,
    memory: MemoryStore,
    model: ModelSpec,
}

impl SessionEngine {
    /// Restore any persisted session state and stand up the workspace
    /// directories. State corruption degrades to defaults; only an
    /// unusable workspace path is fatal here.
    pub fn new(client: Box<dyn LlmClient>, settings: Settings, model: ModelSpec) -> Result<Self> {
        settings.ensure_dirs()?;
        let store = SessionStore::new(settings.session_path());
        let (history, memory) = store.load().into_parts();
        Ok(Self {
            client,
            settings,
            store,
            history,
            memory,
            model,
        })
    }

    pub fn model(&self) -> &ModelSpec {
        &self.model
    }

    pub fn switch_model(&mut self, model: ModelSpec) {
        tracing::debug!(model = %model.id, "switching model");
        self.model = model;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Run one user turn to completion. Image models short-circuit to
    /// generation; everything else goes assemble -> stream -> extract ->
    /// append -> persist. A failed stream leaves history and the
    /// persisted document untouched.
    pub async fn run_turn<F>(
        &mut self,
        user_text: &str,
        search_text: Option<&str>,
        on_render: F,
    ) -> Result<TurnOutcome>
    where
        F: FnMut(&str),
    {
        if self.model.kind.is_image_generator() {
            let path = self.generate_image(user_text).await?;
            return Ok(TurnOutcome::Image { path });
        }

        let mut assembler = ContextAssembler::new(&self.settings.workspace_dir);
        if let Some(search) = search_text {
            assembler = assembler.with_search_results(search);
        }
        let prompt = assembler.assemble(&self.memory, user_text, self.model.kind.accepts_images());

        let mut messages = self.history.messages();
        messages.push(prompt.into_message());

        let response = StreamConsumer::run(
            self.client.as_ref(),
            &messages,
            &self.model.id,
            self.settings.max_tokens,
            on_render,
        )
        .await?;

        let extractor = FileDirectiveExtractor::new(&self.settings.workspace_dir);
        let directives = extractor.materialize(&response);

        self.history.add_user_message(user_text);
        self.history.add_assistant_message(&response);
        self.persist_best_effort();

        Ok(TurnOutcome::Text {
            response,
            directives,
        })
    }

    async fn generate_image(&self, prompt: &str) -> Result<PathBuf> {
        let bytes = self.client.generate_image(prompt, &self.model.id).await?;
        let path = self
            .settings
            .images_dir()
            .join(format!("img_{}.png", chrono::Utc::now().timestamp()));
        std::fs::write(&path, bytes)?;
        Ok(path)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        WebSearch::new(self.settings.search_results)?
            .search(query)
            .await
    }

    /// Upload a file into memory and persist. Returns the memory key.
    pub fn upload(&mut self, path: &Path) -> Result<String> {
        let id = self.memory.upload(path)?;
        self.persist_best_effort();
        Ok(id)
    }

    pub fn forget(&mut self, id: &str) -> bool {
        let removed = self.memory.remove(id);
        if removed {
            self.persist_best_effort();
        }
        removed
    }

    pub fn forget_all(&mut self) {
        self.memory.clear();
        self.persist_best_effort();
    }

    pub fn persona(&self) -> &str {
        &self.memory.persona
    }

    pub fn set_persona(&mut self, persona: impl Into<String>) {
        self.memory.persona = persona.into();
        self.persist_best_effort();
    }

    /// Explicit save with a reportable error, for callers that want one.
    pub fn save_session(&self) -> Result<()> {
        self.store
            .save(&self.history, &self.memory, self.settings.history_window)
    }

    /// Delete the persisted session document and the stored credential.
    /// In-memory state stays valid until the process exits.
    pub fn wipe(&self) -> Result<()> {
        self.store.wipe()?;
        self.settings.remove_token()?;
        Ok(())
    }

    fn persist_best_effort(&self) {
        if let Err(e) = self.save_session() {
            tracing::warn!("failed to persist session: {e}");
        }
    }
}

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::{
    clip::is_blank,
    config::{Config, Settings},
    core::preview::PreviewOptions,
    persist::{self, PersistError, StateBackend},
    ports::{ClipboardError, ClipboardPort, Notifier, ProcessRunner, process::SystemRunner},
    runtime::{handoff, watcher::COPIED_SUMMARY},
    types::{MenuMode, RowIndex},
};

use super::{
    actions::{ActionError, ActionTable},
    editor::{self, EditOutcome, EditorError},
    picker::{MenuRow, Selection},
};

pub const ADDED_SUMMARY: &str = "Added to persistent.";
pub const REMOVED_SUMMARY: &str = "Removed from persistent.";
pub const CLEARED_SUMMARY: &str = "History cleared.";
pub const ACTION_FAILED_SUMMARY: &str = "Action failed";

#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error(transparent)]
    Editor(#[from] EditorError),
}

/// What a `select` call ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The entry is on the clipboard, either via the daemon or set directly.
    Copied {
        mode: MenuMode,
        index: RowIndex,
        via_daemon: bool,
    },
    ActionRan { name: String },
    /// The action could not run or exited non-zero. Reported, not fatal.
    ActionFailed { name: String, reason: String },
    /// The selection no longer names a row.
    Ignored,
}

/// Serves one picker interaction against the durable stores.
///
/// Every operation re-reads the stores from the backend, so a controller can
/// be short-lived and run next to the daemon.
pub struct MenuController {
    settings: Settings,
    preview: PreviewOptions,
    actions: ActionTable,
    backend: Box<dyn StateBackend>,
    clipboard: Box<dyn ClipboardPort>,
    notifier: Box<dyn Notifier>,
    runner: Box<dyn ProcessRunner>,
    handoff: Option<PathBuf>,
}

impl MenuController {
    pub fn new(
        config: &Config,
        backend: Box<dyn StateBackend>,
        clipboard: Box<dyn ClipboardPort>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            settings: config.settings.clone(),
            preview: config.settings.preview_options(),
            actions: config.actions.clone(),
            backend,
            clipboard,
            notifier,
            runner: Box::new(SystemRunner),
            handoff: None,
        }
    }

    pub fn with_runner(mut self, runner: Box<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Routes copies through the daemon listening on `socket` when it answers.
    pub fn with_handoff(mut self, socket: impl Into<PathBuf>) -> Self {
        self.handoff = Some(socket.into());
        self
    }

    /// Rows for `mode`. An unreadable store renders as empty.
    pub fn show(&mut self, mode: MenuMode) -> Vec<MenuRow> {
        match self.load(mode) {
            Ok((rows, _)) => rows,
            Err(err) => {
                warn!(%err, %mode, "could not read store, showing nothing");
                Vec::new()
            }
        }
    }

    /// Maps a picker answer back to its entry and applies it.
    ///
    /// Rows are rebuilt from the current store; a selection that no longer
    /// resolves is a no-op.
    pub fn select(
        &mut self,
        mode: MenuMode,
        selection: &Selection,
    ) -> Result<SelectOutcome, MenuError> {
        let (rows, sources) = self.load(mode)?;
        let Some(index) = selection.resolve(&rows) else {
            debug!(?selection, %mode, "selection matches no row");
            return Ok(SelectOutcome::Ignored);
        };
        let Some(source) = sources.into_iter().nth(index) else {
            return Ok(SelectOutcome::Ignored);
        };

        match mode {
            MenuMode::Runtime => {
                let via_daemon = self.copy_out(&source)?;
                Ok(SelectOutcome::Copied {
                    mode,
                    index,
                    via_daemon,
                })
            }
            MenuMode::Persistent => {
                let via_daemon = self.copy_out(&source)?;
                let promoted =
                    persist::update_ring(self.backend.as_mut(), self.settings.ring_size, |ring| {
                        ring.observe(&source)
                    });
                if let Err(err) = promoted {
                    warn!(%err, "copied note not promoted in history");
                }
                Ok(SelectOutcome::Copied {
                    mode,
                    index,
                    via_daemon,
                })
            }
            MenuMode::Actions => Ok(self.run_action(&source)),
        }
    }

    /// Adds the clipboard text to the persistent store. Returns true when added.
    pub fn add_current(&mut self) -> Result<bool, MenuError> {
        let Some(text) = self.current_text()? else {
            return Ok(false);
        };
        let delimiter = self.settings.comment_delimiter;
        let added = persist::update_persistent(self.backend.as_mut(), delimiter, |store| {
            store.add(&text)
        })?;
        if added {
            info!("clip added to persistent store");
            self.notify(ADDED_SUMMARY, &self.preview.render(&text));
        }
        Ok(added)
    }

    /// Removes the clipboard text from the persistent store. Returns true when removed.
    pub fn remove_current(&mut self) -> Result<bool, MenuError> {
        let Some(text) = self.current_text()? else {
            return Ok(false);
        };
        let delimiter = self.settings.comment_delimiter;
        let removed = persist::update_persistent(self.backend.as_mut(), delimiter, |store| {
            store.remove(&text)
        })?;
        if removed {
            info!("clip removed from persistent store");
            self.notify(REMOVED_SUMMARY, &self.preview.render(&text));
        }
        Ok(removed)
    }

    /// Empties the history ring. Returns how many entries were dropped.
    pub fn clear(&mut self) -> Result<usize, MenuError> {
        let dropped = persist::update_ring(self.backend.as_mut(), self.settings.ring_size, |ring| {
            let n = ring.len();
            ring.clear();
            n
        })?;
        if dropped > 0 {
            info!(dropped, "history cleared");
            self.notify(CLEARED_SUMMARY, "");
        }
        Ok(dropped)
    }

    /// Opens the persistent store in `editor` and stores the edited lines.
    ///
    /// An empty buffer leaves the store unchanged.
    pub fn edit_persistent(&mut self, editor: &[String]) -> Result<EditOutcome, MenuError> {
        let marker = self.settings.newline_char.clone();
        let current = self.backend.read_persistent()?;
        let Some(edited) = editor::run_editor(editor, &editor::to_editor_text(&current, &marker))?
        else {
            return Ok(EditOutcome::Aborted);
        };
        let lines = editor::from_editor_text(&edited, &marker);
        if lines.is_empty() {
            return Ok(EditOutcome::Unchanged);
        }
        let delimiter = self.settings.comment_delimiter;
        let outcome = persist::update_persistent(self.backend.as_mut(), delimiter, |store| {
            let before = store.entries();
            store.replace_all(lines);
            if store.entries() == before {
                EditOutcome::Unchanged
            } else {
                EditOutcome::Replaced(store.len())
            }
        })?;
        info!(?outcome, "persistent store edited");
        Ok(outcome)
    }

    /// Rendered rows plus, per row, the text a selection acts on.
    fn load(&mut self, mode: MenuMode) -> Result<(Vec<MenuRow>, Vec<String>), PersistError> {
        let (texts, sources): (Vec<String>, Vec<String>) = match mode {
            MenuMode::Runtime => persist::load_ring(self.backend.as_mut(), self.settings.ring_size)?
                .iter()
                .map(|clip| (self.preview.render(&clip.raw), clip.raw.clone()))
                .unzip(),
            MenuMode::Persistent => {
                persist::load_persistent(self.backend.as_mut(), self.settings.comment_delimiter)?
                    .list()
                    .into_iter()
                    .map(|note| (self.preview.render_note(&note.clip.raw), note.clip.raw.clone()))
                    .unzip()
            }
            MenuMode::Actions => self
                .actions
                .names()
                .into_iter()
                .map(|name| (name.to_string(), name.to_string()))
                .unzip(),
        };
        let rows = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| MenuRow { index, text })
            .collect();
        Ok((rows, sources))
    }

    fn run_action(&mut self, name: &str) -> SelectOutcome {
        let Some(action) = self.actions.get(name) else {
            return SelectOutcome::Ignored;
        };
        let clip = match self.clipboard.get_text() {
            Ok(text) => text.filter(|t| !is_blank(t)),
            Err(err) => {
                debug!(%err, "clipboard unreadable, running action without text");
                None
            }
        };
        let result = match clip {
            Some(clip) => action.execute(&clip, self.runner.as_mut()),
            None if action.template.has_placeholder() => {
                Err(ActionError::NoClipboardText(action.name.clone()))
            }
            None => action.execute("", self.runner.as_mut()),
        };
        let name = action.name.clone();
        match result {
            Ok(()) => {
                info!(action = %name, "action finished");
                self.notify(&name, "");
                SelectOutcome::ActionRan { name }
            }
            Err(err) => {
                warn!(action = %name, %err, "action failed");
                let reason = err.to_string();
                self.notify(ACTION_FAILED_SUMMARY, &reason);
                SelectOutcome::ActionFailed { name, reason }
            }
        }
    }

    /// Puts `text` on the clipboard. Returns true when the daemon took it.
    ///
    /// Without a daemon the text is set from this process. On X11 and
    /// Wayland the selection is owned by the setting process, so it is lost
    /// when a short-lived menu process exits unless a clipboard manager takes
    /// it over. The picker blocks on this process, so it never waits for a
    /// new owner.
    fn copy_out(&mut self, text: &str) -> Result<bool, MenuError> {
        if let Some(socket) = &self.handoff {
            match handoff::send(socket, text) {
                Ok(()) => return Ok(true),
                Err(err) => warn!(
                    %err,
                    "no daemon took the handoff; clipboard set directly and may not outlive this process"
                ),
            }
        }
        self.clipboard.set_text(text)?;
        self.notify(COPIED_SUMMARY, &self.preview.render(text));
        Ok(false)
    }

    fn current_text(&mut self) -> Result<Option<String>, MenuError> {
        Ok(self.clipboard.get_text()?.filter(|t| !is_blank(t)))
    }

    fn notify(&self, summary: &str, body: &str) {
        if self.settings.notify {
            self.notifier
                .notify(summary, body, self.settings.notify_timeout());
        }
    }
}

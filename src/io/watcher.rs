use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::io::workspace::{Workspace, is_tracked};

/// Keeps the workspace index in step with edits made outside the program.
/// Watching stops when this value is dropped.
pub struct WorkspaceWatcher {
    _watcher: RecommendedWatcher,
}

impl WorkspaceWatcher {
    /// Watch the workspace root recursively. Changed markdown files are
    /// re-indexed on the watcher's thread, which in turn notifies subscribers.
    pub fn start(workspace: Arc<Workspace>) -> Result<Self, notify::Error> {
        let root = workspace.root().to_path_buf();
        // Events may arrive with the canonical spelling of the root
        let canonical = root.canonicalize().unwrap_or_else(|_| root.clone());
        let ws = Arc::clone(&workspace);

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(e) => {
                        warn!(error = %e, "file watcher error");
                        return;
                    }
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                for path in event.paths {
                    let Some(rel) = relative_to(&path, &root, &canonical) else {
                        continue;
                    };
                    if !is_tracked(&rel) {
                        continue;
                    }
                    debug!(path = %rel.display(), "file changed on disk");
                    if let Err(e) = ws.reload(&rel) {
                        warn!(path = %rel.display(), error = %e, "could not reload file");
                    }
                }
            },
            Config::default(),
        )?;

        watcher.watch(workspace.root(), RecursiveMode::Recursive)?;
        Ok(WorkspaceWatcher { _watcher: watcher })
    }
}

fn relative_to(path: &Path, root: &Path, canonical: &Path) -> Option<PathBuf> {
    path.strip_prefix(root)
        .or_else(|_| path.strip_prefix(canonical))
        .ok()
        .map(Path::to_path_buf)
}

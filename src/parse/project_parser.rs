use std::path::Path;

use serde::Deserialize;

use crate::model::project::{Project, ProjectStatus};

/// Front matter fields we care about. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Split `+++`-delimited TOML front matter from the body.
/// Returns `(front_matter, body)`; front matter is `None` if absent or unterminated.
pub fn split_front_matter(text: &str) -> (Option<&str>, &str) {
    let Some(after_open) = text
        .strip_prefix("+++\n")
        .or_else(|| text.strip_prefix("+++\r\n"))
    else {
        return (None, text);
    };
    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == "+++" {
            let fm = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return (Some(fm), body);
        }
        offset += line.len();
    }
    (None, text)
}

/// Parse a document as a project. Returns `None` for ordinary notes,
/// including documents whose front matter is not valid TOML.
pub fn parse_project(path: &Path, text: &str) -> Option<Project> {
    let (fm, body) = split_front_matter(text);
    let fm: FrontMatter = match toml::from_str(fm?) {
        Ok(fm) => fm,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable front matter");
            return None;
        }
    };
    if fm.kind.as_deref() != Some("project") {
        return None;
    }

    let name = fm
        .name
        .filter(|n| !n.trim().is_empty())
        .or_else(|| first_heading(body))
        .unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
    let status = fm
        .status
        .as_deref()
        .map_or(ProjectStatus::Backlog, ProjectStatus::parse);
    if let ProjectStatus::Other(s) = &status {
        tracing::warn!(path = %path.display(), status = %s, "unknown project status");
    }

    Some(Project {
        path: path.to_path_buf(),
        name,
        status,
    })
}

fn first_heading(body: &str) -> Option<String> {
    body.lines()
        .find_map(|l| l.strip_prefix("# "))
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
}

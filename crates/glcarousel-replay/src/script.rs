use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glcarousel::TouchEvent;
use serde::Deserialize;

/// One entry of a gesture script.
///
/// ```json
/// ["began", {"changed": {"dx": -40}}, {"ended": {"vx": -300}},
///  {"wait": {"ms": 200}}, {"snapshot": {"path": "after.png"}}]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    Began,
    Changed { dx: f32 },
    Ended { vx: f32 },
    /// Advances the simulated clock frame by frame.
    Wait { ms: u64 },
    /// Renders the current frame to `path`, relative to the script file.
    Snapshot { path: PathBuf },
}

impl ScriptStep {
    pub fn touch_event(&self) -> Option<TouchEvent> {
        match *self {
            ScriptStep::Began => Some(TouchEvent::Began),
            ScriptStep::Changed { dx } => Some(TouchEvent::Changed { delta_x: dx }),
            ScriptStep::Ended { vx } => Some(TouchEvent::Ended { velocity_x: vx }),
            ScriptStep::Wait { .. } | ScriptStep::Snapshot { .. } => None,
        }
    }
}

pub fn parse_script(input: &str) -> Result<Vec<ScriptStep>> {
    serde_json::from_str(input).context("failed to parse gesture script")
}

/// Loads a script and resolves snapshot paths against its directory.
pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let input = fs::read_to_string(path)
        .with_context(|| format!("failed to read gesture script {}", path.display()))?;
    let mut steps = parse_script(&input)?;
    if let Some(base) = path.parent() {
        for step in &mut steps {
            if let ScriptStep::Snapshot { path } = step {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_step_kind() {
        let steps = parse_script(
            r#"["began", {"changed": {"dx": -12.5}}, {"ended": {"vx": 300}},
                {"wait": {"ms": 150}}, {"snapshot": {"path": "out.png"}}]"#,
        )
        .expect("parse");
        assert_eq!(
            steps,
            vec![
                ScriptStep::Began,
                ScriptStep::Changed { dx: -12.5 },
                ScriptStep::Ended { vx: 300.0 },
                ScriptStep::Wait { ms: 150 },
                ScriptStep::Snapshot {
                    path: PathBuf::from("out.png")
                },
            ]
        );
        assert_eq!(
            steps[1].touch_event(),
            Some(TouchEvent::Changed { delta_x: -12.5 })
        );
        assert_eq!(steps[3].touch_event(), None);
    }

    #[test]
    fn rejects_unknown_steps() {
        assert!(parse_script(r#"["tap"]"#).is_err());
        assert!(parse_script(r#"[{"changed": {}}]"#).is_err());
    }

    #[test]
    fn snapshot_paths_are_relative_to_the_script() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("swipe.json");
        fs::write(&path, r#"[{"snapshot": {"path": "shots/a.png"}}]"#).expect("write");
        let steps = load_script(&path).expect("load");
        assert_eq!(
            steps[0],
            ScriptStep::Snapshot {
                path: dir.path().join("shots/a.png")
            }
        );
    }
}

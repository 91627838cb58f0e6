//! Playback container identity (playlists and albums).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Container kinds that keep their `{kind}:{id}` shape after normalization.
const SCOPED_KINDS: [&str; 2] = ["playlist", "album"];

/// Normalized id of the playback context that owns a set of chains.
///
/// Host URIs carry user scoping (`spotify:user:bob:playlist:37i9dQ`), which is
/// stripped so the same playlist always maps to `playlist:37i9dQ`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    /// Normalize a host URI. Returns `None` for empty input.
    ///
    /// URIs naming a playlist or an album become `playlist:{id}` / `album:{id}`;
    /// anything else is kept verbatim.
    pub fn normalize(uri: &str) -> Option<Self> {
        let uri = uri.trim();
        if uri.is_empty() {
            return None;
        }

        let parts: Vec<&str> = uri.split(':').collect();
        for kind in SCOPED_KINDS {
            if let Some(index) = parts.iter().position(|part| *part == kind) {
                return match parts.get(index + 1) {
                    Some(id) if !id.is_empty() => Some(Self(format!("{kind}:{id}"))),
                    _ => Some(Self(uri.to_string())),
                };
            }
        }

        Some(Self(uri.to_string()))
    }

    /// Turn an in-app navigation path such as `/playlist/37i9dQ` into a container.
    pub fn from_navigation_path(path: &str) -> Option<Self> {
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() < 3 || parts[1].is_empty() || parts[2].is_empty() {
            return None;
        }
        Self::normalize(&format!("{}:{}", parts[1], parts[2]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pick the container the user is looking at.
///
/// The page being browsed wins over whatever is currently playing, so chaining
/// songs from a playlist view files them under that playlist.
pub fn resolve_active_container(
    navigation_path: Option<&str>,
    player_context: Option<&str>,
) -> Option<ContainerId> {
    navigation_path
        .and_then(ContainerId::from_navigation_path)
        .or_else(|| player_context.and_then(ContainerId::normalize))
}

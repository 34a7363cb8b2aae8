use crate::game::services::SoundCue;
use anyhow::{bail, Context};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Audio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Star,
    Rect,
}

/// Recipe a client can synthesize when no real files are shipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "form", rename_all = "lowercase")]
pub enum Placeholder {
    Image {
        width: u32,
        height: u32,
        color: &'static str,
        shape: Shape,
    },
    Beep {
        hz: f64,
        seconds: f64,
    },
    Noise {
        seconds: f64,
    },
    Sweep {
        #[serde(rename = "fromHz")]
        from_hz: f64,
        #[serde(rename = "toHz")]
        to_hz: f64,
        seconds: f64,
    },
    Ambient {
        seconds: f64,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct AssetSpec {
    pub key: &'static str,
    pub kind: AssetKind,
    pub path: &'static str,
    pub placeholder: Placeholder,
}

pub const MANIFEST: [AssetSpec; 9] = [
    AssetSpec {
        key: "powerup-speed",
        kind: AssetKind::Image,
        path: "images/powerups/speed.png",
        placeholder: Placeholder::Image {
            width: 32,
            height: 32,
            color: "#ff0",
            shape: Shape::Star,
        },
    },
    AssetSpec {
        key: "powerup-invulnerability",
        kind: AssetKind::Image,
        path: "images/powerups/invulnerability.png",
        placeholder: Placeholder::Image {
            width: 32,
            height: 32,
            color: "#f0f",
            shape: Shape::Star,
        },
    },
    AssetSpec {
        key: "powerup-ghost",
        kind: AssetKind::Image,
        path: "images/powerups/ghost.png",
        placeholder: Placeholder::Image {
            width: 32,
            height: 32,
            color: "#0ff",
            shape: Shape::Star,
        },
    },
    AssetSpec {
        key: "logo",
        kind: AssetKind::Image,
        path: "images/ui/logo.png",
        placeholder: Placeholder::Image {
            width: 200,
            height: 60,
            color: "#fff",
            shape: Shape::Rect,
        },
    },
    AssetSpec {
        key: "sfx-collect",
        kind: AssetKind::Audio,
        path: "audio/sfx/collect.mp3",
        placeholder: Placeholder::Beep {
            hz: 880.0,
            seconds: 0.1,
        },
    },
    AssetSpec {
        key: "sfx-collision",
        kind: AssetKind::Audio,
        path: "audio/sfx/collision.mp3",
        placeholder: Placeholder::Noise { seconds: 0.2 },
    },
    AssetSpec {
        key: "sfx-powerup",
        kind: AssetKind::Audio,
        path: "audio/sfx/powerup.mp3",
        placeholder: Placeholder::Sweep {
            from_hz: 440.0,
            to_hz: 880.0,
            seconds: 0.3,
        },
    },
    AssetSpec {
        key: "sfx-gameover",
        kind: AssetKind::Audio,
        path: "audio/sfx/gameover.mp3",
        placeholder: Placeholder::Sweep {
            from_hz: 880.0,
            to_hz: 220.0,
            seconds: 0.5,
        },
    },
    AssetSpec {
        key: "music-background",
        kind: AssetKind::Audio,
        path: "audio/music/background.mp3",
        placeholder: Placeholder::Ambient { seconds: 5.0 },
    },
];

pub const MUSIC_KEY: &str = "music-background";

pub fn sound_key(cue: SoundCue) -> &'static str {
    match cue {
        SoundCue::Collect => "sfx-collect",
        SoundCue::Collision => "sfx-collision",
        SoundCue::PowerUp => "sfx-powerup",
        SoundCue::GameOver => "sfx-gameover",
    }
}

#[derive(Debug, Clone)]
pub enum AssetSource {
    Placeholders,
    Directory(PathBuf),
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetEntry {
    pub key: &'static str,
    pub kind: AssetKind,
    /// Public URL when served from disk; absent for placeholders.
    pub url: Option<String>,
    pub placeholder: Option<Placeholder>,
    pub bytes: u64,
    pub loaded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetCatalog {
    pub entries: Vec<AssetEntry>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self {
            entries: MANIFEST
                .iter()
                .map(|spec| AssetEntry {
                    key: spec.key,
                    kind: spec.kind,
                    url: None,
                    placeholder: None,
                    bytes: 0,
                    loaded: false,
                })
                .collect(),
        }
    }

    /// One-time loading phase. Any missing or empty file fails the whole load.
    pub async fn load(source: &AssetSource) -> anyhow::Result<Self> {
        let mut catalog = Self::new();
        match source {
            AssetSource::Placeholders => {
                for (entry, spec) in catalog.entries.iter_mut().zip(MANIFEST.iter()) {
                    entry.placeholder = Some(spec.placeholder);
                    entry.loaded = true;
                }
            }
            AssetSource::Directory(root) => {
                for (entry, spec) in catalog.entries.iter_mut().zip(MANIFEST.iter()) {
                    entry.bytes = check_file(root, spec).await?;
                    entry.url = Some(format!("/assets/{}", spec.path));
                    entry.loaded = true;
                    tracing::debug!(key = spec.key, bytes = entry.bytes, "asset loaded");
                }
            }
        }
        tracing::info!(
            assets = catalog.entries.len(),
            progress = catalog.progress(),
            "assets ready"
        );
        Ok(catalog)
    }

    pub fn progress(&self) -> f64 {
        if self.entries.is_empty() {
            return 1.0;
        }
        let loaded = self.entries.iter().filter(|entry| entry.loaded).count();
        loaded as f64 / self.entries.len() as f64
    }

    pub fn is_ready(&self) -> bool {
        self.entries.iter().all(|entry| entry.loaded)
    }

    pub fn get(&self, key: &str) -> Option<&AssetEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }
}

async fn check_file(root: &Path, spec: &AssetSpec) -> anyhow::Result<u64> {
    let path = root.join(spec.path);
    let metadata = tokio::fs::metadata(&path)
        .await
        .with_context(|| format!("missing asset {} at {}", spec.key, path.display()))?;
    if !metadata.is_file() || metadata.len() == 0 {
        bail!("asset {} at {} is empty or not a file", spec.key, path.display());
    }
    Ok(metadata.len())
}

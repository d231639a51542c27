use crate::store::Screen;
use std::path::{Path, PathBuf};

pub const SKY_BGM: &str = "bgm_sky.mp3";
pub const ROOM_BGM: &str = "bgm_room.mp3";
pub const SAVE_SFX: &str = "sound_save.mp3";

/// Optional art and sound assets. A missing file is never an error; the
/// caller falls back to placeholder output.
#[derive(Clone, Debug)]
pub struct Assets {
    root: PathBuf,
}

impl Assets {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let path = self.root.join(name);
        path.exists().then_some(path)
    }

    pub fn bgm(&self, screen: Screen) -> Option<PathBuf> {
        match screen {
            Screen::Sky => self.resolve(SKY_BGM),
            Screen::Room => self.resolve(ROOM_BGM),
        }
    }

    pub fn save_sfx(&self) -> Option<PathBuf> {
        self.resolve(SAVE_SFX)
    }
}

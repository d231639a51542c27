use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const USER_FILE: &str = "user_data.json";
pub const SCENE_FILE: &str = "scenes.json";
pub const SKY_FILE: &str = "decorations.json";
pub const ROOM_FILE: &str = "room.json";

/// The two decoration screens. Each owns one opaque canvas blob on disk.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Sky,
    Room,
}

impl Screen {
    pub fn file_name(self) -> &'static str {
        match self {
            Screen::Sky => SKY_FILE,
            Screen::Room => ROOM_FILE,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Sky => f.write_str("sky"),
            Screen::Room => f.write_str("room"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    pub scene: String,
    pub utterance: String,
    pub feedback: String,
    pub points: u64,
}

/// The whole per-user record. Loaded once per session, mutated in memory,
/// rewritten to disk after each mutation. Hearts never decrease.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProgress {
    #[serde(default)]
    pub hearts: u64,
    #[serde(default)]
    pub log: Vec<LogEntry>,
    #[serde(default)]
    pub diary: Vec<String>,
}

/// A situational prompt with candidate spoken responses, ordered; the
/// first response is the canonical/correct one.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scene {
    pub situation: String,
    pub responses: Vec<String>,
}

impl Scene {
    pub fn new<S: Into<String>, I, R>(situation: S, responses: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            situation: situation.into(),
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }

    pub fn correct(&self) -> Option<&str> {
        self.responses.first().map(String::as_str)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SceneCatalog {
    scenes: Vec<Scene>,
}

impl SceneCatalog {
    pub fn new(scenes: Vec<Scene>) -> Self {
        Self { scenes }
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn get(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    pub fn find(&self, situation: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.situation == situation)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

impl Default for SceneCatalog {
    fn default() -> Self {
        Self::new(vec![
            Scene::new("친구가 넘어졌어요", ["괜찮아요", "싫어요", "몰라요"]),
            Scene::new("새 친구가 인사했어요", ["안녕", "누구야", "몰라"]),
            Scene::new("친구가 도와줬어요", ["고마워요", "응", "나중에"]),
            Scene::new("내가 실수했어요(장난감 떨어뜨림)", ["미안해요", "그냥 줘", "도망가요"]),
            Scene::new("그네를 같이 타고 싶대요", ["먼저 타!", "내가 먼저야!", "그냥 가자"]),
            Scene::new("그림 대회에서 떨어졌대요", ["다음엔 잘 될 거야", "하하!", "그럴 줄 알았어"]),
            Scene::new("학교에서 줄 서는 중", ["차례대로 서요", "밀지 마요", "몰라요"]),
            Scene::new("선생님이 질문했어요", ["손들고 말해요", "큰소리로 끼어들기", "조용히 있기만"]),
            Scene::new("가족이 도와달래요", ["같이 해요", "싫어요", "몰라요"]),
            Scene::new("동생이 장난감을 원해요", ["같이 놀아요", "내 거야!", "모른 척"]),
            Scene::new("친구가 울고 있어요", ["괜찮아? 이야기해줄래", "웃지 마", "지나가기"]),
            Scene::new("친구가 선물을 줬어요", ["고마워요", "응", "그냥 받기"]),
        ])
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Whole-file JSON persistence rooted at the data directory. One file per
/// record, UTF-8, human-readable indentation. Single user, single process;
/// the last write wins.
#[derive(Clone, Debug)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        let path = self.root.join(name);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read(&path)?;
        if data.iter().all(u8::is_ascii_whitespace) {
            // A zero-length or blank file counts as missing.
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&data)?))
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        self.ensure_root()?;
        let final_path = self.root.join(name);
        let tmp_path = self.root.join(format!("{name}.tmp"));
        let bytes = serde_json::to_vec_pretty(value)?;

        fs::write(&tmp_path, bytes)?;
        match fs::rename(&tmp_path, &final_path) {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                if final_path.exists() {
                    fs::remove_file(&final_path)?;
                    fs::rename(&tmp_path, &final_path)?;
                    Ok(())
                } else {
                    Err(rename_err.into())
                }
            }
        }
    }

    pub fn load_progress(&self) -> Result<UserProgress, StoreError> {
        Ok(self.read_json(USER_FILE)?.unwrap_or_default())
    }

    pub fn save_progress(&self, progress: &UserProgress) -> Result<(), StoreError> {
        self.write_json(USER_FILE, progress)
    }

    /// Loads the scene catalog; on first run (missing or blank file) writes
    /// the built-in default to disk and returns it.
    pub fn ensure_catalog(&self) -> Result<SceneCatalog, StoreError> {
        match self.read_json::<SceneCatalog>(SCENE_FILE)? {
            Some(catalog) if !catalog.is_empty() => Ok(catalog),
            _ => {
                let catalog = SceneCatalog::default();
                self.write_json(SCENE_FILE, &catalog)?;
                tracing::info!(path = %self.root.join(SCENE_FILE).display(), "wrote default scene catalog");
                Ok(catalog)
            }
        }
    }

    /// The decoration blob is produced and consumed by the drawing widget;
    /// it is round-tripped here without interpretation.
    pub fn load_decoration(&self, screen: Screen) -> Result<Option<serde_json::Value>, StoreError> {
        self.read_json(screen.file_name())
    }

    pub fn save_decoration(
        &self,
        screen: Screen,
        blob: &serde_json::Value,
    ) -> Result<(), StoreError> {
        self.write_json(screen.file_name(), blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_store(prefix: &str) -> Store {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();
        let root = std::env::temp_dir().join(format!(
            "heartstar_store_{prefix}_{}_{}",
            std::process::id(),
            nanos
        ));
        Store::new(root)
    }

    #[test]
    fn missing_progress_file_defaults_to_empty() {
        let store = temp_store("missing_progress");
        let progress = store.load_progress().expect("default progress");
        assert_eq!(progress, UserProgress::default());
        assert_eq!(progress.hearts, 0);
    }

    #[test]
    fn progress_round_trips_through_disk() {
        let store = temp_store("progress_rt");
        let mut progress = UserProgress::default();
        progress.hearts = 8;
        progress.log.push(LogEntry {
            scene: "친구가 넘어졌어요".to_owned(),
            utterance: "괜찮아요".to_owned(),
            feedback: "[배려] 구름이: 다정했어!".to_owned(),
            points: 5,
        });
        progress.diary.push("오늘 친구랑 놀았다".to_owned());

        store.save_progress(&progress).expect("save");
        let reloaded = store.load_progress().expect("load");
        assert_eq!(reloaded, progress);

        let _ = fs::remove_dir_all(store.root());
    }

    #[test]
    fn first_run_writes_default_catalog_to_disk() {
        let store = temp_store("catalog_first_run");
        assert!(!store.root().join(SCENE_FILE).exists());

        let catalog = store.ensure_catalog().expect("catalog");
        assert_eq!(catalog, SceneCatalog::default());
        assert!(store.root().join(SCENE_FILE).exists());

        // Second run reads the file it just wrote.
        let again = store.ensure_catalog().expect("catalog again");
        assert_eq!(again, catalog);

        let _ = fs::remove_dir_all(store.root());
    }

    #[test]
    fn blank_catalog_file_is_replaced_with_default() {
        let store = temp_store("catalog_blank");
        fs::create_dir_all(store.root()).expect("root");
        fs::write(store.root().join(SCENE_FILE), "  \n").expect("blank file");

        let catalog = store.ensure_catalog().expect("catalog");
        assert_eq!(catalog, SceneCatalog::default());

        let _ = fs::remove_dir_all(store.root());
    }

    #[test]
    fn decoration_blob_round_trips_byte_identical() {
        let store = temp_store("decor_rt");
        let blob: serde_json::Value = serde_json::json!({
            "version": "4.4.0",
            "objects": [{ "type": "image", "left": 120.5, "top": 44.0 }],
        });

        store.save_decoration(Screen::Sky, &blob).expect("save");
        let first = fs::read(store.root().join(SKY_FILE)).expect("read");

        let loaded = store
            .load_decoration(Screen::Sky)
            .expect("load")
            .expect("present");
        assert_eq!(loaded, blob);

        store.save_decoration(Screen::Sky, &loaded).expect("re-save");
        let second = fs::read(store.root().join(SKY_FILE)).expect("re-read");
        assert_eq!(first, second);

        let _ = fs::remove_dir_all(store.root());
    }

    #[test]
    fn screens_persist_independently() {
        let store = temp_store("decor_screens");
        let sky = serde_json::json!({ "objects": ["cloud"] });
        let room = serde_json::json!({ "objects": ["bed"] });

        store.save_decoration(Screen::Sky, &sky).expect("save sky");
        store.save_decoration(Screen::Room, &room).expect("save room");

        assert_eq!(store.load_decoration(Screen::Sky).expect("sky").unwrap(), sky);
        assert_eq!(store.load_decoration(Screen::Room).expect("room").unwrap(), room);

        let _ = fs::remove_dir_all(store.root());
    }

    #[test]
    fn scene_correct_answer_is_first_response() {
        let catalog = SceneCatalog::default();
        let scene = catalog.find("친구가 넘어졌어요").expect("known scene");
        assert_eq!(scene.correct(), Some("괜찮아요"));
    }
}

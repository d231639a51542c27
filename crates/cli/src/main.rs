#![deny(warnings)]

use anyhow::Context;
use bytes::Bytes;
use clap::{Parser, Subcommand, ValueEnum};
use futures::future::BoxFuture;
use heartstar_core::assets::Assets;
use heartstar_core::config::{
    resolve_api_key, resolve_optional_string, resolve_string_with_default, ApiKey, AppConfig, Env,
    SpeechLang, StdEnv, VoiceId, DEFAULT_ASSETS_DIR, DEFAULT_DATA_DIR, DEFAULT_SPEECH_LANG,
    DEFAULT_VOICE, ENV_CHILD_NAME, ENV_SPEECH_LANG, ENV_VOICE,
};
use heartstar_core::feedback::{FeedbackGenerator, OpenAiChatGenerator, Persona};
use heartstar_core::playback::{AudioPlaybackSink, DummyPlaybackSink, PlaybackError, PlaybackSink};
use heartstar_core::session::Session;
use heartstar_core::store::{Scene, Screen, Store};
use heartstar_core::stt::{AudioClip, OpenAiSttClient};
use heartstar_core::tts::{AudioFormat, OpenAiTtsClient, TtsAudio};
use heartstar_core::turn::{TurnConfig, TurnEngine};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "heartstar")]
#[command(about = "Voice companion toy for children (talk -> feedback -> hearts)")]
struct Args {
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_ASSETS_DIR)]
    assets_dir: PathBuf,

    #[arg(long)]
    api_key: Option<String>,

    /// Target language for transcription (default "ko")
    #[arg(long)]
    lang: Option<String>,

    /// Voice used for synthesized speech (default "alloy")
    #[arg(long)]
    voice: Option<String>,

    #[arg(long)]
    child_name: Option<String>,

    /// Skip audio playback entirely (synthesis is skipped too).
    #[arg(long, default_value_t = false)]
    no_audio: bool,

    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the scene catalog (writes the built-in default on first run)
    Scenes,
    /// Run one conversational turn from a recorded clip
    Talk {
        /// Scene number as shown by `heartstar scenes`
        #[arg(long)]
        scene: usize,
        #[arg(long)]
        audio: PathBuf,
    },
    /// The multiple-choice mini-game
    Choose {
        #[arg(long)]
        scene: usize,
        #[arg(long)]
        answer: String,
    },
    /// The mood diary and the tomorrow-mission suggestion
    Diary {
        #[command(subcommand)]
        command: DiaryCommand,
    },
    /// Save or load a decoration canvas blob
    Decorate {
        #[command(subcommand)]
        command: DecorateCommand,
    },
    /// Show hearts, unlocked items and the recent log
    Progress,
}

#[derive(Subcommand, Debug)]
enum DiaryCommand {
    Add { text: String },
    Mission,
}

#[derive(Subcommand, Debug)]
enum DecorateCommand {
    Save {
        #[arg(long, value_enum)]
        screen: ScreenArg,
        #[arg(long)]
        file: PathBuf,
    },
    Load {
        #[arg(long, value_enum)]
        screen: ScreenArg,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScreenArg {
    Sky,
    Room,
}

impl From<ScreenArg> for Screen {
    fn from(value: ScreenArg) -> Self {
        match value {
            ScreenArg::Sky => Screen::Sky,
            ScreenArg::Room => Screen::Room,
        }
    }
}

/// Either the real output device or a silent sink, chosen by `--no-audio`.
#[derive(Clone)]
enum CliPlayback {
    Audio(AudioPlaybackSink),
    Silent(DummyPlaybackSink),
}

impl PlaybackSink for CliPlayback {
    fn play(&self, audio: TtsAudio) -> BoxFuture<'_, Result<(), PlaybackError>> {
        match self {
            CliPlayback::Audio(sink) => sink.play(audio),
            CliPlayback::Silent(sink) => sink.play(audio),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let env = StdEnv;
    let cfg = build_config(&args, &env)?;

    tracing::info!(
        data_dir = %cfg.data_dir.display(),
        lang = %cfg.speech_lang.as_str(),
        "config loaded"
    );

    run(args, cfg).await
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn build_config(args: &Args, env: &impl Env) -> anyhow::Result<AppConfig> {
    let speech_lang = SpeechLang::new(resolve_string_with_default(
        args.lang.clone(),
        ENV_SPEECH_LANG,
        env,
        DEFAULT_SPEECH_LANG,
    ))?;
    let voice = VoiceId::new(resolve_string_with_default(
        args.voice.clone(),
        ENV_VOICE,
        env,
        DEFAULT_VOICE,
    ))?;
    let api_key = resolve_api_key(args.api_key.clone(), env)?;
    let child_name = resolve_optional_string(args.child_name.clone(), ENV_CHILD_NAME, env);

    Ok(AppConfig {
        data_dir: args.data_dir.clone(),
        assets_dir: args.assets_dir.clone(),
        child_name,
        speech_lang,
        voice,
        api_key,
        ..AppConfig::default()
    })
}

fn require_api_key(cfg: &AppConfig) -> anyhow::Result<&ApiKey> {
    cfg.api_key.as_ref().context(
        "this command talks to the hosted AI services; set HEARTSTAR_API_KEY (or OPENAI_API_KEY) or pass --api-key",
    )
}

fn scene_by_number(catalog: &[Scene], number: usize) -> anyhow::Result<Scene> {
    catalog
        .get(number.checked_sub(1).context("scene numbers start at 1")?)
        .cloned()
        .with_context(|| format!("no scene #{number}; run `heartstar scenes` to list them"))
}

async fn run(args: Args, cfg: AppConfig) -> anyhow::Result<()> {
    let store = Store::new(cfg.data_dir.clone());
    let catalog = store.ensure_catalog().context("load scene catalog")?;
    let mut session = Session::open(store, cfg.rewards, cfg.unlocks.clone())
        .context("open user session")?;
    let assets = Assets::new(cfg.assets_dir.clone());

    match args.command {
        Command::Scenes => {
            for (i, scene) in catalog.scenes().iter().enumerate() {
                println!("{:2}. {}", i + 1, scene.situation);
                for response in session.shuffled_responses(scene) {
                    println!("      - {response}");
                }
            }
        }

        Command::Talk { scene, audio } => {
            let api_key = require_api_key(&cfg)?.expose().to_owned();
            let scene = scene_by_number(catalog.scenes(), scene)?;
            let clip = AudioClip::load(&audio)
                .await
                .with_context(|| format!("read recorded clip {}", audio.display()))?;

            let persona = Persona::new(cfg.child_name.clone());
            let playback = if args.no_audio {
                CliPlayback::Silent(DummyPlaybackSink::new())
            } else {
                CliPlayback::Audio(AudioPlaybackSink::new())
            };
            let engine = TurnEngine {
                stt: OpenAiSttClient::new(api_key.clone()),
                feedback: OpenAiChatGenerator::new(api_key.clone(), persona),
                tts: OpenAiTtsClient::new(api_key),
                playback,
                config: TurnConfig::from_app(&cfg),
            };

            let outcome = engine
                .run(&mut session, &scene.situation, clip)
                .await
                .context("the turn did not complete; nothing was saved")?;

            println!("🗣️  {}", outcome.transcript);
            println!("💬 {}", outcome.feedback);
            println!(
                "획득 점수: +{} (마음별 {}) · 표정: {:?}",
                outcome.awarded, outcome.hearts, outcome.emotion
            );
        }

        Command::Choose { scene, answer } => {
            let scene = scene_by_number(catalog.scenes(), scene)?;
            let outcome = session
                .check_choice(&scene, &answer)
                .context("save progress")?;
            if outcome.correct {
                println!("🌈 좋은 말이에요! 마음별 +{} (총 {})", outcome.awarded, outcome.hearts);
            } else {
                println!("☁️ 조금 더 다정한 말을 선택해볼까요?");
            }
        }

        Command::Diary { command } => match command {
            DiaryCommand::Add { text } => {
                session.add_diary(text).context("save diary")?;
                println!("저장 완료!");
            }
            DiaryCommand::Mission => {
                let api_key = require_api_key(&cfg)?.expose().to_owned();
                let diary = session.latest_diary().unwrap_or_default().to_owned();
                let generator =
                    OpenAiChatGenerator::new(api_key, Persona::new(cfg.child_name.clone()));
                let mission = generator
                    .mission(diary)
                    .await
                    .context("mission suggestion failed")?;
                println!("🌈 내일 미션: {}", mission.text);
            }
        },

        Command::Decorate { command } => match command {
            DecorateCommand::Save { screen, file } => {
                let screen = Screen::from(screen);
                let raw = tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("read canvas blob {}", file.display()))?;
                let blob: serde_json::Value = serde_json::from_slice(&raw)
                    .with_context(|| format!("{} is not valid JSON", file.display()))?;
                session
                    .store()
                    .save_decoration(screen, &blob)
                    .context("save decoration")?;
                println!("{screen} 화면이 저장되었어요!");

                play_save_sfx(&assets, args.no_audio).await;

                // Praise is best-effort; a failed call never undoes the save.
                if let Some(api_key) = cfg.api_key.as_ref() {
                    let generator = OpenAiChatGenerator::new(
                        api_key.expose().to_owned(),
                        Persona::new(cfg.child_name.clone()),
                    );
                    match generator.praise(screen).await {
                        Ok(praise) => println!("💬 {}", praise.text),
                        Err(err) => tracing::warn!(error = %err, "praise failed"),
                    }
                }
            }
            DecorateCommand::Load { screen } => {
                let screen = Screen::from(screen);
                match session.store().load_decoration(screen).context("load decoration")? {
                    Some(blob) => println!("{}", serde_json::to_string_pretty(&blob)?),
                    None => println!("아직 꾸민 {screen} 화면이 없어요"),
                }
            }
        },

        Command::Progress => {
            println!("✨ 지금까지 모은 마음별: {}", session.hearts());
            for screen in [Screen::Sky, Screen::Room] {
                let unlocked = session.unlocked(screen);
                let items = if unlocked.is_empty() {
                    "아직 없어요 ☁️".to_owned()
                } else {
                    unlocked.join(" · ")
                };
                println!("{screen}: {items}");
            }
            for entry in session.progress().log.iter().rev().take(5) {
                println!("- [{}] {} → {} (+{})", entry.scene, entry.utterance, entry.feedback, entry.points);
            }
        }
    }

    Ok(())
}

async fn play_save_sfx(assets: &Assets, no_audio: bool) {
    if no_audio {
        return;
    }
    let Some(path) = assets.save_sfx() else {
        return;
    };
    match tokio::fs::read(&path).await {
        Ok(raw) => {
            let sink = AudioPlaybackSink::new();
            let audio = TtsAudio {
                bytes: Bytes::from(raw),
                format: AudioFormat::Mp3,
            };
            if let Err(err) = sink.play(audio).await {
                tracing::warn!(error = %err, "save sound failed");
            }
        }
        Err(err) => tracing::warn!(path = %path.display(), error = %err, "save sound unreadable"),
    }
}

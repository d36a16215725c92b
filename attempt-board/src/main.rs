use board_common::{
    board::LogObserver,
    config::Config,
    presenter::BoardPresenter,
    snapshot::BoardSnapshot,
};
use board_drawing::{BoardLayout, FrameBuffer, draw_board};
use clap::Parser;
use crossbeam_channel::bounded;
use embedded_graphics::geometry::Size;
use log::{LevelFilter, error, info, warn};
#[cfg(debug_assertions)]
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::{
    append::rolling_file::{
        RollingFileAppender,
        policy::compound::{
            CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
        },
    },
    config::{Appender, Config as LogConfig, Logger, Root},
    encode::pattern::PatternEncoder,
};
use macroquad::prelude::*;
use network::NetworkMessage;
use std::{error::Error, path::PathBuf};
use timer::CountdownTimer;

mod network;
mod timer;

const APP_NAME: &str = "attempt-board";
const CHANNEL_LEN: usize = 16;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(long, short, action(clap::ArgAction::Count))]
    /// Increase the log verbosity
    verbose: u8,

    #[clap(long)]
    /// Directory within which log files will be placed, default is platform dependent
    log_location: Option<PathBuf>,

    #[clap(long, default_value = "5000000")]
    /// Max size in bytes that a log file is allowed to reach before being rolled over
    log_max_file_size: u64,

    #[clap(long, default_value = "3")]
    /// Number of archived logs to keep
    num_old_logs: u32,

    #[clap(long)]
    /// Read the configuration from this file instead of the platform default
    config: Option<PathBuf>,

    #[clap(long, short)]
    /// Port to listen on for the competition engine, overrides the configuration
    port: Option<u16>,

    #[clap(long)]
    /// Fill the whole screen
    fullscreen: bool,
}

fn load_config(path: Option<&PathBuf>) -> Config {
    if let Some(path) = path {
        return match Config::new_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!(
                    "Failed to read config file {}, using defaults. Error: {e}",
                    path.display()
                );
                Config::default()
            }
        };
    }

    match confy::load(APP_NAME, None) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to read config file, overwriting with default. Error: {e}");
            let config = Config::default();
            if let Err(e) = confy::store(APP_NAME, None, &config) {
                error!("Failed to write default config: {e}");
            }
            config
        }
    }
}

#[macroquad::main(window_conf())]
async fn main() {
    let args = Cli::parse();
    if let Err(e) = init_logging(&args) {
        eprintln!("Failed to start logging: {e}");
    }

    let config = load_config(args.config.as_ref());
    let listen_port = args.port.unwrap_or(config.network.listen_port);

    let (tx, rx) = bounded::<NetworkMessage>(CHANNEL_LEN);
    let mut net_worker = Some(std::thread::spawn(move || {
        network::networking_thread(tx, listen_port)
    }));

    if args.fullscreen || config.display.fullscreen {
        set_fullscreen(true);
    }
    show_mouse(false);

    let mut presenter = BoardPresenter::new(
        &config,
        CountdownTimer::default(),
        CountdownTimer::default(),
        LogObserver,
    );

    let (width, height) = config.display.size();
    let size = Size::new(width, height);
    let layout = BoardLayout::new(size);
    let mut frame = FrameBuffer::new(size);
    let texture = Texture2D::from_rgba8(width as u16, height as u16, &frame.to_rgba8());
    texture.set_filter(FilterMode::Nearest);
    let mut last_drawn: Option<BoardSnapshot> = None;

    info!("Attempt board {} ready", config.board.component_id);

    loop {
        if net_worker.as_ref().is_some_and(|w| w.is_finished()) {
            match net_worker.take().map(|w| w.join()) {
                Some(Ok(Err(e))) => error!("Networking thread failed: {e}"),
                Some(Err(_)) => error!("Networking thread panicked"),
                _ => error!("Networking thread stopped"),
            }
            break;
        }

        while let Ok(message) = rx.try_recv() {
            match message {
                NetworkMessage::Event(event) => presenter.handle(event),
                NetworkMessage::ConnectionLost => presenter.connection_lost(),
            }
        }

        let snapshot = presenter.board().snapshot();
        if last_drawn.as_ref() != Some(&snapshot) {
            let Ok(()) = draw_board(&mut frame, &snapshot, &layout);
            texture.update_from_bytes(width, height, &frame.to_rgba8());
            last_drawn = Some(snapshot);
        }

        clear_background(BLACK);
        let scale = (screen_width() / width as f32).min(screen_height() / height as f32);
        let dest = vec2(width as f32 * scale, height as f32 * scale);
        draw_texture_ex(
            &texture,
            (screen_width() - dest.x) / 2.0,
            (screen_height() - dest.y) / 2.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(dest),
                ..Default::default()
            },
        );

        next_frame().await;
    }
}

fn init_logging(args: &Cli) -> Result<(), Box<dyn Error>> {
    let log_level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let log_base_path = args.log_location.clone().unwrap_or_else(|| {
        let mut path = directories::BaseDirs::new()
            .map(|dirs| dirs.data_local_dir().to_path_buf())
            .unwrap_or_default();
        path.push("attempt-board-logs");
        path
    });
    let mut log_path = log_base_path.clone();
    let mut archived_log_path = log_base_path.clone();
    log_path.push(format!("{APP_NAME}-log.txt"));
    archived_log_path.push(format!("{APP_NAME}-log-{{}}.txt.gz"));

    #[cfg(debug_assertions)]
    println!("Log path: {}", log_path.display());

    // Only log to the console in debug mode
    #[cfg(all(debug_assertions, not(target_os = "windows")))]
    let console_target = Target::Stderr;
    #[cfg(all(debug_assertions, target_os = "windows"))]
    let console_target = Target::Stdout; // Windows apps don't get a stderr handle
    #[cfg(debug_assertions)]
    let console = ConsoleAppender::builder()
        .target(console_target)
        .encoder(Box::new(PatternEncoder::new("[{d} {h({l:5})} {M}] {m}{n}")))
        .build();

    // Setup the file log roller
    let archive_pattern = archived_log_path
        .to_str()
        .ok_or("Log path is not valid unicode")?;
    let roller = FixedWindowRoller::builder().build(archive_pattern, args.num_old_logs)?;
    let file_policy = CompoundPolicy::new(
        Box::new(SizeTrigger::new(args.log_max_file_size)),
        Box::new(roller),
    );
    let file_appender = RollingFileAppender::builder()
        .append(true)
        .encoder(Box::new(PatternEncoder::new("[{d} {l:5} {M}] {m}{n}")))
        .build(log_path, Box::new(file_policy))?;

    // Setup the logging from all locations to use `LevelFilter::Error`
    let root = Root::builder().appender("file_appender");
    #[cfg(debug_assertions)]
    let root = root.appender("console");
    let root = root.build(LevelFilter::Error);

    // Setup the top level logging config
    let log_config = LogConfig::builder()
        .appender(Appender::builder().build("file_appender", Box::new(file_appender)));

    #[cfg(debug_assertions)]
    let log_config = log_config.appender(Appender::builder().build("console", Box::new(console)));

    // Our own crates log at `log_level`
    let log_config = log_config
        .logger(Logger::builder().build("attempt_board", log_level))
        .logger(Logger::builder().build("board_common", log_level))
        .logger(Logger::builder().build("board_drawing", log_level))
        .build(root)?;

    log4rs::init_config(log_config)?;
    log_panics::init();
    Ok(())
}

fn window_conf() -> Conf {
    Conf {
        window_title: String::from("Attempt Board"),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        ..Default::default()
    }
}

use clap::Parser;
use iced::{
    time, window,
    widget::{button, column, row, slider, text, text_input, Canvas, Container},
    Alignment, Element, Length, Point, Size, Subscription, Task, Theme,
};
use replaycore::session::{parse_boundaries, BoundaryRecord, Session};
use replaycore::view::{CanvasSize, ScreenPoint, TickOutcome};
use replaycore::{ReplayEngine, ReplayError};
use scene_view::SceneView;
use std::path::PathBuf;
use std::time::{Duration, Instant};

mod scene_view;

/// Desktop replay of a recorded traffic-radar session.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about)]
struct Args {
    /// Session export (JSON) loaded at startup
    session: Option<PathBuf>,
    /// Queue-boundary records (JSON array) loaded at startup
    #[arg(long)]
    boundaries: Option<PathBuf>,
    /// Boundary feed polled every few seconds, e.g. http://127.0.0.1:9000/boundaries
    #[arg(long)]
    boundaries_url: Option<String>,
}

fn main() -> iced::Result {
    env_logger::init();
    let args = Args::parse();

    iced::application(
        move || Visualizer::boot(args.clone()),
        Visualizer::update,
        Visualizer::view,
    )
    .title(application_title)
    .subscription(application_subscription)
    .theme(application_theme)
    .run()
}

fn application_title(state: &Visualizer) -> String {
    match &state.session_name {
        Some(name) => format!("Radar Replay - {}", name),
        None => "Radar Replay".into(),
    }
}

fn application_subscription(state: &Visualizer) -> Subscription<Message> {
    let mut subscriptions = vec![window::resize_events().map(|(_, size)| Message::WindowResized(size))];
    // Refresh ticks exist only while playing.
    if state.engine.is_playing() {
        subscriptions.push(window::frames().map(Message::Frame));
    }
    if state.feed_url.is_some() {
        subscriptions.push(time::every(Duration::from_secs(2)).map(|_| Message::PollFeed));
    }
    Subscription::batch(subscriptions)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

struct Visualizer {
    engine: ReplayEngine,
    session_name: Option<String>,
    session_input: String,
    boundaries_input: String,
    feed_url: Option<String>,
    status: String,
    cursor: Option<(ScreenPoint, CanvasSize)>,
}

#[derive(Debug, Clone)]
pub enum Message {
    TogglePlay,
    Reset,
    Recenter,
    Scrub(u32),
    Zoom(f32),
    Frame(Instant),
    PointerDown(Point),
    PointerMoved(Point, Size),
    PointerUp,
    PointerLeft,
    WindowResized(Size),
    SessionInputChanged(String),
    LoadSession,
    SessionLoaded(Result<(String, Session), String>),
    BoundariesInputChanged(String),
    LoadBoundaries,
    PollFeed,
    BoundariesLoaded(Result<Vec<BoundaryRecord>, String>),
}

fn screen(point: Point) -> ScreenPoint {
    ScreenPoint::new(point.x, point.y)
}

impl Visualizer {
    fn boot(args: Args) -> (Self, Task<Message>) {
        let mut tasks = Vec::new();
        if let Some(path) = &args.session {
            tasks.push(Task::perform(load_session(path.clone()), Message::SessionLoaded));
        }
        if let Some(path) = &args.boundaries {
            tasks.push(Task::perform(
                read_boundaries(path.display().to_string()),
                Message::BoundariesLoaded,
            ));
        }
        if let Some(url) = &args.boundaries_url {
            tasks.push(Task::perform(fetch_boundaries(url.clone()), Message::BoundariesLoaded));
        }

        let state = Visualizer {
            engine: ReplayEngine::default(),
            session_name: None,
            session_input: args
                .session
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            boundaries_input: args
                .boundaries_url
                .clone()
                .or_else(|| args.boundaries.as_ref().map(|path| path.display().to_string()))
                .unwrap_or_default(),
            feed_url: args.boundaries_url.clone(),
            status: "Load a session to start.".into(),
            cursor: None,
        };
        (state, Task::batch(tasks))
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::TogglePlay => {
                match state.engine.toggle_play(Instant::now()) {
                    Ok(true) => state.status = "Playing".into(),
                    Ok(false) if state.engine.frames().is_empty() => {
                        state.status = "Nothing to play: no frames loaded".into()
                    }
                    Ok(false) => state.status = "Paused".into(),
                    Err(err) => state.status = format!("Playback unavailable: {err}"),
                }
                Task::none()
            }
            Message::Reset => {
                state.engine.reset();
                Task::none()
            }
            Message::Recenter => {
                state.engine.reset_pan();
                Task::none()
            }
            Message::Scrub(index) => {
                state.engine.scrub(index as usize);
                Task::none()
            }
            Message::Zoom(scale) => {
                state.engine.set_zoom(scale);
                Task::none()
            }
            Message::Frame(now) => {
                if state.engine.tick(now) == TickOutcome::Finished {
                    state.status = "Playback finished".into();
                }
                Task::none()
            }
            Message::PointerDown(position) => {
                state.engine.pointer_down(screen(position));
                Task::none()
            }
            Message::PointerMoved(position, size) => {
                state.engine.pointer_move(screen(position));
                state.cursor = Some((screen(position), CanvasSize::new(size.width, size.height)));
                Task::none()
            }
            Message::PointerUp => {
                state.engine.pointer_up();
                Task::none()
            }
            Message::PointerLeft => {
                state.engine.pointer_leave();
                state.cursor = None;
                Task::none()
            }
            Message::WindowResized(size) => {
                if size.width < 1.0 || size.height < 1.0 {
                    let reason = format!("window is {}x{}", size.width, size.height);
                    state
                        .engine
                        .note_render_failure(&ReplayError::SurfaceUnavailable(reason));
                } else {
                    state.engine.clear_fault();
                }
                Task::none()
            }
            Message::SessionInputChanged(value) => {
                state.session_input = value;
                Task::none()
            }
            Message::LoadSession => {
                let path = PathBuf::from(state.session_input.trim());
                state.status = format!("Loading {}...", path.display());
                Task::perform(load_session(path), Message::SessionLoaded)
            }
            Message::SessionLoaded(Ok((name, session))) => {
                state.engine.load_session(session);
                state.status = format!(
                    "Loaded {}: {} frames, {} lanes",
                    name,
                    state.engine.frames().len(),
                    state.engine.session().road_sensor_lanes.len()
                );
                state.session_name = Some(name);
                Task::none()
            }
            Message::SessionLoaded(Err(err)) => {
                log::warn!("session load failed: {}", err);
                state.status = format!("Session error: {err}");
                Task::none()
            }
            Message::BoundariesInputChanged(value) => {
                state.boundaries_input = value;
                Task::none()
            }
            Message::LoadBoundaries => {
                let source = state.boundaries_input.trim().to_string();
                if source.starts_with("http://") || source.starts_with("https://") {
                    state.feed_url = Some(source.clone());
                    Task::perform(fetch_boundaries(source), Message::BoundariesLoaded)
                } else {
                    state.feed_url = None;
                    Task::perform(read_boundaries(source), Message::BoundariesLoaded)
                }
            }
            Message::PollFeed => match &state.feed_url {
                Some(url) => Task::perform(fetch_boundaries(url.clone()), Message::BoundariesLoaded),
                None => Task::none(),
            },
            Message::BoundariesLoaded(Ok(records)) => {
                state.status = format!("{} boundary records joined", records.len());
                state.engine.set_boundaries(records);
                Task::none()
            }
            Message::BoundariesLoaded(Err(err)) => {
                log::warn!("boundary load failed: {}", err);
                state.status = format!("Boundary error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let engine = &state.engine;
        let frame_count = engine.frames().len();

        let play_label = if engine.is_playing() { "Pause" } else { "Play" };
        let transport = row![
            button(play_label).on_press(Message::TogglePlay).padding(8),
            button("Reset").on_press(Message::Reset).padding(8),
            button("Recenter").on_press(Message::Recenter).padding(8),
            text(engine.current_time_label()).size(18),
            text(format!(
                "frame {} / {}",
                if frame_count == 0 { 0 } else { engine.current_index() + 1 },
                frame_count
            ))
            .size(14),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let scrubber: Element<'_, Message> = if frame_count > 1 {
            slider(
                0..=(frame_count - 1) as u32,
                engine.current_index() as u32,
                Message::Scrub,
            )
            .into()
        } else {
            text("No frames to scrub").size(12).into()
        };

        let zoom = engine.viewport().scale();
        let zoom_row = row![
            text("Zoom").size(14),
            slider(0.1..=2.0, zoom, Message::Zoom)
                .step(0.1)
                .width(Length::Fixed(220.0)),
            text(format!("{:.1}x", zoom)).size(14),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let inputs = row![
            text_input("Session JSON path", &state.session_input)
                .on_input(Message::SessionInputChanged)
                .on_submit(Message::LoadSession)
                .padding(6),
            button("Load session").on_press(Message::LoadSession).padding(6),
            text_input("Boundaries JSON path or feed URL", &state.boundaries_input)
                .on_input(Message::BoundariesInputChanged)
                .on_submit(Message::LoadBoundaries)
                .padding(6),
            button("Load boundaries")
                .on_press(Message::LoadBoundaries)
                .padding(6),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let scene = Canvas::new(SceneView { engine })
            .width(Length::Fill)
            .height(Length::Fill);

        let readout = state
            .cursor
            .and_then(|(position, canvas)| engine.world_at(position, canvas))
            .map(|(x, y)| format!("x {:.1} m, y {:.1} m", x, y))
            .unwrap_or_default();
        let status_row = row![
            text(&state.status).size(13).width(Length::Fill),
            text(readout).size(13),
        ]
        .spacing(12);

        let layout = column![
            inputs,
            transport,
            scrubber,
            zoom_row,
            scene,
            status_row,
        ]
        .spacing(10)
        .padding(16);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

async fn load_session(path: PathBuf) -> Result<(String, Session), String> {
    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    let session = Session::from_json(&contents).map_err(|e| e.to_string())?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((name, session))
}

async fn read_boundaries(path: String) -> Result<Vec<BoundaryRecord>, String> {
    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| format!("{}: {}", path, e))?;
    parse_boundaries(&contents).map_err(|e| e.to_string())
}

async fn fetch_boundaries(url: String) -> Result<Vec<BoundaryRecord>, String> {
    let response = reqwest::get(&url).await.map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("{}: {}", url, response.status()));
    }
    response
        .json::<Vec<BoundaryRecord>>()
        .await
        .map_err(|e| e.to_string())
}

mod assets;

use std::{
    convert::Infallible,
    net::SocketAddr,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use anyhow::Result;
use axum::{
    extract::State,
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::{net::TcpListener, sync::broadcast};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use crate::{
    engine::{Engine, EngineSettings, TickFrame},
    scenario::Scenario,
};

/// Wall-clock delay between driver ticks, so the animation is watchable.
const TICK_DELAY: Duration = Duration::from_millis(50);

pub struct WebServerConfig {
    pub scenario: Scenario,
    pub ticks: u64,
    pub snapshot_interval: u64,
    pub snapshot_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Serialize)]
struct StateEnvelope {
    scenario: String,
    total_ticks: u64,
    paused: bool,
    frame: TickFrame,
}

#[derive(Clone)]
struct AppState {
    engine: Arc<Mutex<Engine>>,
    broadcaster: broadcast::Sender<String>,
    total_ticks: u64,
    scenario_name: String,
}

/// Serves the live grid view and drives the engine on a background
/// blocking task. Control signals (pause/resume/reset) land between
/// ticks: the driver re-checks the paused flag before every step.
pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        scenario,
        ticks,
        snapshot_interval,
        snapshot_dir,
        host,
        port,
    } = config;

    let scenario_name = scenario.name.clone();
    let settings = EngineSettings::from_scenario(&scenario)
        .with_snapshot_interval(snapshot_interval)
        .with_snapshot_dir(snapshot_dir);
    let engine = Arc::new(Mutex::new(Engine::new(&scenario, settings)));

    let (tx, _) = broadcast::channel::<String>(512);
    let running = Arc::new(AtomicBool::new(true));

    let engine_for_driver = engine.clone();
    let tx_for_driver = tx.clone();
    let running_for_driver = running.clone();
    let driver = tokio::task::spawn_blocking(move || {
        while running_for_driver.load(Ordering::SeqCst) {
            let frame = {
                let mut engine = engine_for_driver.lock().expect("engine lock poisoned");
                if engine.is_paused() {
                    None
                } else if engine.current_tick() >= ticks {
                    engine.pause();
                    None
                } else {
                    match engine.step() {
                        Ok(summary) => {
                            if !summary.frame.viable {
                                engine.pause();
                            }
                            Some(summary.frame)
                        }
                        Err(err) => {
                            eprintln!("[web] tick failed: {err:?}");
                            engine.pause();
                            None
                        }
                    }
                }
            };
            if let Some(frame) = frame {
                if let Ok(payload) = serde_json::to_string(&frame) {
                    let _ = tx_for_driver.send(payload);
                }
            }
            std::thread::sleep(TICK_DELAY);
        }
    });

    let state = Arc::new(AppState {
        engine: engine.clone(),
        broadcaster: tx.clone(),
        total_ticks: ticks,
        scenario_name: scenario_name.clone(),
    });

    let router = Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .route("/api/state", get(latest_state))
        .route("/api/events", get(stream_events))
        .route("/api/pause", post(pause))
        .route("/api/resume", post(resume))
        .route("/api/reset", post(reset))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    println!(
        "cerrado UI for '{}' live at http://{}:{} (Ctrl+C to stop)",
        scenario_name, host, port
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    running.store(false, Ordering::SeqCst);
    let _ = driver.await;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    println!("shutting down web UI...");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn styles() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        assets::STYLES_CSS,
    )
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        assets::APP_JS,
    )
}

async fn latest_state(State(state): State<Arc<AppState>>) -> Json<StateEnvelope> {
    let engine = state.engine.lock().expect("engine lock poisoned");
    Json(StateEnvelope {
        scenario: state.scenario_name.clone(),
        total_ticks: state.total_ticks,
        paused: engine.is_paused(),
        frame: engine.latest_frame(),
    })
}

async fn pause(State(state): State<Arc<AppState>>) -> Json<&'static str> {
    state
        .engine
        .lock()
        .expect("engine lock poisoned")
        .pause();
    Json("paused")
}

async fn resume(State(state): State<Arc<AppState>>) -> Json<&'static str> {
    state
        .engine
        .lock()
        .expect("engine lock poisoned")
        .resume();
    Json("running")
}

async fn reset(State(state): State<Arc<AppState>>) -> Json<&'static str> {
    let frame = {
        let mut engine = state.engine.lock().expect("engine lock poisoned");
        engine.reset();
        engine.latest_frame()
    };
    if let Ok(payload) = serde_json::to_string(&frame) {
        let _ = state.broadcaster.send(payload);
    }
    Json("reset")
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}

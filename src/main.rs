mod app;
mod collection;
mod config;
mod error;
mod stopwatch;
mod ticker;
mod timer;
mod ui;

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use timer_core::MonotonicClock;

use crate::app::{parse_command, AppEvent, ChannelSink, StopwatchApp, APP_NAME};
use crate::config::{config_path, AppConfig};

fn input_thread(conn: Sender<AppEvent>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) => {
                if conn.send(AppEvent::Input(line)).is_err() {
                    return;
                }
            }
            Err(e) => {
                log::error!("stdin read failed: {}", e);
                break;
            }
        }
    }
    conn.send(AppEvent::InputClosed).ok();
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let config = AppConfig::load(config_path(&args).as_deref()).context("loading config")?;
    log::info!(
        "{} starting: {} stopwatches, {} Hz refresh",
        APP_NAME,
        config.initial_stopwatches,
        config.tick_rate_hz
    );

    let (conn, events) = mpsc::channel();
    let sink = Arc::new(ChannelSink::new(conn.clone()));
    let mut app = StopwatchApp::new(config, Arc::new(MonotonicClock::new()), sink)?;

    thread::Builder::new()
        .name("input".to_string())
        .spawn(move || input_thread(conn))
        .context("spawning input thread")?;

    let mut out = io::stdout();
    ui::draw(&mut out, &app)?;

    'outer: while let Ok(first) = events.recv() {
        // Coalesce everything already queued into one redraw
        for event in std::iter::once(first).chain(events.try_iter()) {
            match event {
                AppEvent::Input(line) => {
                    if !app.handle_command(parse_command(&line))? {
                        break 'outer;
                    }
                }
                AppEvent::Display { id, text } => app.on_display_update(id, &text),
                AppEvent::InputClosed => {
                    log::info!("input closed");
                    break 'outer;
                }
            }
        }
        ui::draw(&mut out, &app)?;
    }

    if app.stopwatches.any_running() {
        log::info!("exiting with stopwatches still running");
    }
    drop(app);
    log::info!("{} stopped", APP_NAME);
    Ok(())
}

//! Headless viewer example - drive the view from a fake decode thread.
//!
//! Usage:
//!   RUST_LOG=debug cargo run -p platform-input --example headless_viewport
//!
//! A producer thread plays the protocol engine: it announces a remote screen,
//! streams a few updates and closes the connection. The main thread pumps
//! those events into a `Viewer` backed by a recording host and feeds it some
//! local input, then reports what was drawn and what would have been sent.

use bytes::Bytes;
use platform_input::{MemoryClipboard, MouseButton, Viewer, WindowEvent};
use rfb_client::{ChannelSink, Config, ServerEvent};
use rfb_common::{Dimension, Point, Rect};
use rfb_display::{RecordingHost, ScaleMode};
use rfb_pixelbuffer::{PixelFormat, PixelStore};
use std::thread;
use std::time::Duration;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_toml_str(
        r#"
        [display]
        scale = "auto"

        [input]
        win_key_ignore = true
        "#,
    )?;

    let store = PixelStore::shared(PixelFormat::rgb888());
    let (sink, commands) = ChannelSink::bounded(config.input.command_queue);
    let (event_tx, events) = flume::unbounded();

    let client_area = Dimension::new(800, 600);
    let mut host = RecordingHost::new(client_area);
    let mut viewer = Viewer::new(&config, store, sink, MemoryClipboard::new());
    viewer.handle_window_event(WindowEvent::Resize(client_area), &mut host);

    let producer = thread::spawn(move || -> anyhow::Result<()> {
        let (width, height) = (1024u16, 768u16);
        event_tx.send(ServerEvent::Connected {
            width,
            height,
            name: "headless".to_string(),
        })?;
        for i in 0..8 {
            let rect = Rect::new(i * 128, i * 96, 128, 96);
            let pixels = vec![(i * 30) as u8; 128 * 96 * 4];
            event_tx.send(ServerEvent::RegionUpdated {
                rect,
                pixels: Bytes::from(pixels),
            })?;
            thread::sleep(Duration::from_millis(5));
        }
        event_tx.send(ServerEvent::CutText {
            text: Bytes::from_static(b"hello from the remote side"),
        })?;
        thread::sleep(Duration::from_millis(20));
        event_tx.send(ServerEvent::ConnectionClosed)?;
        Ok(())
    });

    let mut input_sent = false;
    loop {
        let handled = viewer.pump_events(&events, &mut host);
        if viewer.view().is_connected() && !input_sent {
            info!(
                "Remote screen {} shown at {}%",
                viewer.view().framebuffer_geometry(),
                viewer.view().scale_percent()
            );
            viewer.handle_window_event(WindowEvent::MouseMove(Point::new(400, 300)), &mut host);
            viewer.handle_window_event(
                WindowEvent::MouseButton {
                    button: MouseButton::Left,
                    pressed: true,
                },
                &mut host,
            );
            viewer.handle_window_event(
                WindowEvent::MouseButton {
                    button: MouseButton::Left,
                    pressed: false,
                },
                &mut host,
            );
            viewer.handle_window_event(WindowEvent::Char('x'), &mut host);
            viewer.send_ctrl_alt_del()?;
            viewer.set_scale_centered_on_cursor(ScaleMode::Percent(200), &mut host);
            input_sent = true;
        }
        if handled == 0 && producer.is_finished() && events.is_empty() {
            break;
        }
        viewer.handle_window_event(WindowEvent::Paint(client_area.to_rect()), &mut host);
        thread::sleep(Duration::from_millis(2));
    }

    producer
        .join()
        .map_err(|_| anyhow::anyhow!("producer thread panicked"))??;

    info!(
        "Host saw {} blits, {} fills, {} invalidations",
        host.blits().len(),
        host.fills().len(),
        host.invalidated().len()
    );
    info!("{} commands queued for the engine", commands.drain().count());
    Ok(())
}

//! Command implementations

use crate::output;
use crate::sim::{HeadlessSurface, SimEngine, SimPipRelay, SimPlayerFactory};
use anyhow::{bail, Context};
use marquee_core::{
    infer_stream_type, HostEvent, OrientationMode, PlaybackConfig, PlayerEvent, SessionController,
    SessionState, UriSourceResolver,
};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Simulated clock step while the playback window runs
const SIM_STEP: Duration = Duration::from_millis(100);

pub fn probe(uris: &[String]) -> anyhow::Result<()> {
    if uris.is_empty() {
        bail!("no URIs given");
    }

    let mut rows = Vec::new();
    for raw in uris {
        let url = Url::parse(raw).with_context(|| format!("invalid URI: {raw}"))?;
        rows.push(output::ProbeRow {
            uri: raw.clone(),
            stream_type: infer_stream_type(&url).to_string(),
        });
    }
    output::print_probe(rows);
    Ok(())
}

pub struct PlayOptions {
    pub uri: String,
    pub autoplay: bool,
    pub loop_playback: bool,
    pub start_offset: u64,
    pub speed: Option<f32>,
    pub orientation: String,
    pub pip: bool,
    pub duration: u64,
    pub json: bool,
}

pub async fn play(opts: PlayOptions) -> anyhow::Result<()> {
    let url = Url::parse(&opts.uri).with_context(|| format!("invalid URI: {}", opts.uri))?;
    let orientation = parse_orientation(&opts.orientation)?;

    let config = PlaybackConfig::builder(url)
        .auto_play(opts.autoplay)
        .loop_playback(opts.loop_playback)
        .orientation(orientation)
        .allow_pip(opts.pip)
        .start_offset_ms(opts.start_offset)
        .build();

    let engine = SimEngine::new();
    let mut builder = SessionController::builder(
        Arc::new(SimPlayerFactory::new(engine.clone())),
        Arc::new(UriSourceResolver::new()),
        Arc::new(HeadlessSurface),
    );
    if opts.pip {
        builder = builder.with_pip_relay(Arc::new(SimPipRelay));
    }
    let controller = builder.build();

    // Print the event timeline as it happens
    let mut events = controller.subscribe_events();
    let json = opts.json;
    let printer = tokio::spawn(async move {
        while let Ok(record) = events.recv().await {
            output::print_event(&record, json);
        }
    });

    controller.start(config).await?;
    if let Some(factor) = opts.speed {
        controller.set_speed_factor(factor).await?;
    }

    // Scripted engine timeline: buffer, expose dimensions, go ready
    let play_intent = opts.autoplay;
    controller
        .on_player_event(PlayerEvent::StatusChanged {
            play_when_ready: play_intent,
            state: SessionState::Buffering,
        })
        .await?;
    tokio::time::sleep(Duration::from_millis(120)).await;
    controller
        .on_player_event(PlayerEvent::VideoSizeChanged {
            width: 1280,
            height: 720,
        })
        .await?;
    controller
        .on_player_event(PlayerEvent::StatusChanged {
            play_when_ready: play_intent,
            state: SessionState::Ready,
        })
        .await?;

    // Let the simulated clock run through the playback window
    let mut elapsed = 0u64;
    while elapsed < opts.duration {
        tokio::time::sleep(SIM_STEP).await;
        engine.advance(SIM_STEP.as_millis() as u64);
        elapsed += SIM_STEP.as_millis() as u64;
    }

    if opts.pip {
        controller.handle_host_event(HostEvent::UserLeaving).await?;
        controller
            .handle_host_event(HostEvent::PipModeChanged(true))
            .await?;
        tokio::time::sleep(Duration::from_millis(150)).await;
        controller
            .handle_host_event(HostEvent::PipModeChanged(false))
            .await?;
    }

    // End of stream; a looping session re-enters the buffering loop
    controller
        .on_player_event(PlayerEvent::StatusChanged {
            play_when_ready: play_intent,
            state: SessionState::Ended,
        })
        .await?;
    if opts.loop_playback {
        controller
            .on_player_event(PlayerEvent::StatusChanged {
                play_when_ready: play_intent,
                state: SessionState::Ready,
            })
            .await?;
        tokio::time::sleep(Duration::from_millis(300)).await;
        engine.advance(300);
    }

    let result = controller.stop().await;

    // Give the printer a beat to drain before tearing it down
    tokio::time::sleep(Duration::from_millis(50)).await;
    printer.abort();

    output::print_exit(result, opts.json);
    Ok(())
}

fn parse_orientation(raw: &str) -> anyhow::Result<OrientationMode> {
    match raw {
        "portrait" => Ok(OrientationMode::Portrait),
        "landscape" => Ok(OrientationMode::Landscape),
        "user" => Ok(OrientationMode::UserChoice),
        other => bail!("unknown orientation '{other}' (expected portrait, landscape, or user)"),
    }
}

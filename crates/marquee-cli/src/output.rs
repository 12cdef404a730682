//! Output formatting

use console::style;
use marquee_core::{ExitResult, SessionEvent, SessionEventRecord};
use tabled::{Table, Tabled};

#[derive(Tabled)]
pub struct ProbeRow {
    #[tabled(rename = "URI")]
    pub uri: String,
    #[tabled(rename = "Stream Type")]
    pub stream_type: String,
}

pub fn print_probe(rows: Vec<ProbeRow>) {
    println!("{}", Table::new(rows));
}

pub fn print_event(record: &SessionEventRecord, json: bool) {
    if json {
        if let Ok(line) = serde_json::to_string(record) {
            println!("{line}");
        }
        return;
    }
    println!(
        "{} {}",
        style(format!("[{:>3}]", record.sequence)).dim(),
        describe(&record.event)
    );
}

pub fn print_exit(result: Option<ExitResult>, json: bool) {
    match result {
        Some(result) => {
            if json {
                if let Ok(line) = serde_json::to_string(&result) {
                    println!("{line}");
                }
            } else {
                println!(
                    "{} position={}ms playing={}",
                    style("exit").green().bold(),
                    result.last_position_ms,
                    result.was_playing
                );
            }
        }
        None => println!("{}", style("no session was live").yellow()),
    }
}

fn describe(event: &SessionEvent) -> String {
    match event {
        SessionEvent::Started { uri, stream_type } => {
            format!("started {} ({})", uri, style(stream_type).cyan())
        }
        SessionEvent::StatusChanged {
            play_when_ready,
            state,
        } => format!(
            "status {} (play_when_ready={})",
            style(state).bold(),
            play_when_ready
        ),
        SessionEvent::VideoSizeChanged { width, height } => {
            format!("video size {width}x{height}")
        }
        SessionEvent::SpeedChanged { factor } => format!("speed {factor}x"),
        SessionEvent::ZoomChanged { mode } => format!("zoom {mode}"),
        SessionEvent::PipPermissionRequired => {
            style("pip permission required").yellow().to_string()
        }
        SessionEvent::PipEntered { play_based } => {
            format!("entered pip (play_based={play_based})")
        }
        SessionEvent::PipModeChanged { active } => format!("pip mode active={active}"),
        SessionEvent::CastHandoff {
            uri, position_ms, ..
        } => format!("cast handoff {uri} @ {position_ms}ms"),
        SessionEvent::Finished { position_ms } => {
            format!("{} @ {position_ms}ms", style("finished").green())
        }
        SessionEvent::Stopped { result } => format!(
            "stopped (position={}ms, was_playing={})",
            result.last_position_ms, result.was_playing
        ),
    }
}

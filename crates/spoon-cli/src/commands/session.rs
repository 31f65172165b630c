//! Interactive tracking session.
//!
//! One task owns the tracker and selects over stdin lines and a one-second
//! ticker that polls the heartbeat schedule.

use chrono::Utc;
use clap::Args;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use spoon_core::telemetry::DeliveryStats;
use spoon_core::{
    dispatch, Command, Config, FanOutSink, HeartbeatSchedule, HttpSink, JsonLinesSink, LogSink,
    NullSink, Renderer, SessionContext, SinkKind, SpoonTracker, TelemetrySink, TextRenderer,
};

const HELP: &str = "\
Commands:
  +                     Add a spoon
  -, spend              Remove a spoon
  add <name> [cost]     Queue an activity (cost 1-10, default 1)
  do <id>               Complete an activity and spend its spoons
  rm <id>               Remove an activity without spending
  show, ls              Show the tracker
  reset                 Start a new day
  help                  Show this help
  quit                  Leave the session
";

#[derive(Args)]
pub struct SessionArgs {
    /// Telemetry sink; repeat to send to several (default from config)
    #[arg(long)]
    sink: Vec<SinkKind>,
    /// Disable the periodic heartbeat
    #[arg(long)]
    no_heartbeat: bool,
    /// Heartbeat interval in seconds (default from config)
    #[arg(long)]
    heartbeat_secs: Option<u64>,
}

pub fn run(args: SessionArgs, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run_session(args, config));
    // A pending stdin read can't be cancelled; don't wait on it.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

enum Flow {
    Continue,
    Quit,
}

struct Session {
    tracker: SpoonTracker,
    renderer: TextRenderer<std::io::Stdout>,
    heartbeat: Option<HeartbeatSchedule>,
    awaiting_reset: bool,
}

impl Session {
    fn handle_line(&mut self, line: &str) -> Flow {
        let line = line.trim();

        if self.awaiting_reset {
            self.awaiting_reset = false;
            let confirmed = matches!(line.to_lowercase().as_str(), "y" | "yes");
            let reset = dispatch(
                &mut self.tracker,
                &mut self.renderer,
                Command::ResetDay { confirmed },
            );
            if reset {
                if let Some(schedule) = self.heartbeat.as_mut() {
                    schedule.restart(Utc::now());
                }
            }
            return Flow::Continue;
        }

        match line {
            "" => Flow::Continue,
            "quit" | "exit" | "q" => Flow::Quit,
            "help" | "?" => {
                print!("{HELP}");
                Flow::Continue
            }
            _ => {
                match Command::parse(line) {
                    Ok(Command::ResetDay { .. }) => {
                        println!("Start a new day? This clears today's spoons and activities. [y/N]");
                        self.awaiting_reset = true;
                    }
                    Ok(command) => {
                        dispatch(&mut self.tracker, &mut self.renderer, command);
                    }
                    Err(e) => println!("! {e}"),
                }
                Flow::Continue
            }
        }
    }

    fn tick(&mut self) {
        if let Some(schedule) = self.heartbeat.as_mut() {
            if schedule.poll(Utc::now()) {
                self.tracker.heartbeat();
            }
        }
    }
}

type Deliveries = Vec<JoinHandle<DeliveryStats>>;

fn build_sink(
    kind: SinkKind,
    config: &Config,
    deliveries: &mut Deliveries,
) -> Result<Box<dyn TelemetrySink>, Box<dyn std::error::Error>> {
    Ok(match kind {
        SinkKind::Null => Box::new(NullSink),
        SinkKind::Log => Box::new(LogSink),
        SinkKind::File => Box::new(JsonLinesSink::new(config.events_file()?)),
        SinkKind::Http => {
            let endpoint = config
                .telemetry
                .endpoint
                .as_deref()
                .filter(|e| !e.is_empty())
                .ok_or("http sink needs `telemetry.endpoint` in config")?;
            let (sink, handle) =
                HttpSink::spawn(endpoint, config.telemetry.instrumentation_key.clone())?;
            deliveries.push(handle);
            Box::new(sink)
        }
    })
}

fn build_sinks(
    kinds: &[SinkKind],
    config: &Config,
) -> Result<(Box<dyn TelemetrySink>, Deliveries), Box<dyn std::error::Error>> {
    let mut deliveries = Vec::new();
    let sink: Box<dyn TelemetrySink> = match kinds {
        [kind] => build_sink(*kind, config, &mut deliveries)?,
        kinds => {
            let mut fan_out = FanOutSink::default();
            for kind in kinds {
                fan_out.push(build_sink(*kind, config, &mut deliveries)?);
            }
            Box::new(fan_out)
        }
    };
    Ok((sink, deliveries))
}

async fn run_session(args: SessionArgs, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut kinds: Vec<SinkKind> = Vec::new();
    if args.sink.is_empty() {
        kinds.push(config.session.sink);
    }
    for kind in &args.sink {
        if !kinds.contains(kind) {
            kinds.push(*kind);
        }
    }
    let (sink, deliveries) = build_sinks(&kinds, &config)?;

    let tracker = SpoonTracker::new(sink);
    tracing::debug!(session = %tracker.session_id(), sink = tracker.sink_name(), "session started");
    tracker.start_session(&SessionContext::from_env());

    let heartbeat = (config.session.heartbeat_enabled && !args.no_heartbeat).then(|| {
        let interval = args
            .heartbeat_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| config.heartbeat_interval());
        HeartbeatSchedule::new(interval, Utc::now())
    });

    let mut session = Session {
        tracker,
        renderer: TextRenderer::stdout(),
        heartbeat,
        awaiting_reset: false,
    };

    println!("Spoon Tracker. Type 'help' for commands.");
    let view = session.tracker.view();
    session.renderer.render(&view);

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let heartbeat_enabled = session.heartbeat.is_some();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Flow::Quit = session.handle_line(&line) {
                    break;
                }
            }
            _ = ticker.tick(), if heartbeat_enabled => session.tick(),
        }
    }

    // Dropping the tracker closes the delivery queues.
    drop(session);
    for handle in deliveries {
        match handle.await {
            Ok(stats) => tracing::info!(
                delivered = stats.delivered,
                failed = stats.failed,
                "telemetry delivery finished"
            ),
            Err(e) => tracing::warn!(error = %e, "telemetry delivery task failed"),
        }
    }
    Ok(())
}

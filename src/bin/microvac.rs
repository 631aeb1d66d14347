//! Microvac command-line remote
//!
//! Sends single commands to the Microvac bridge, or runs an interactive
//! keyboard panel that fires the eight panel triggers.
//!
//! # Configuration
//!
//! - Bridge URL: `--endpoint` or `MICROVAC_ENDPOINT`
//! - Default: `http://localhost:4000/jsonrpc`
//! - Log filter: `--log-level` or `RUST_LOG`
//! - OpenTelemetry export: `--otlp-endpoint` (off when not given)
//!
//! # Running
//!
//! ```bash
//! # One-shot commands print the bridge's reply as JSON
//! microvac forwards --time 2 --unit s
//! microvac expression 3
//! microvac distance
//!
//! # Interactive panel: w/a/s/d/x drive, 1/2/3 expressions, q quits
//! microvac panel
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use microvac_remote::{
    AngleUnit, Command, ControllerBuilder, IdStrategy, MotionTime, ObservabilityConfig,
    RemoteController, StaticPanel, TimeUnit, Trigger, DEFAULT_ENDPOINT,
};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(name = "microvac", version, about = "Remote control for the Microvac robot")]
struct Cli {
    /// JSON-RPC endpoint of the Microvac bridge
    #[arg(long, env = "MICROVAC_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Export traces and metrics to this OTLP/gRPC collector
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    otlp_endpoint: Option<String>,

    /// Number requests 0, 1, 2, ... instead of always 0
    #[arg(long)]
    sequential_ids: bool,

    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Drive forwards
    Forwards(Timed),
    /// Drive backwards
    Backwards(Timed),
    /// Spin left
    TurnLeft(Timed),
    /// Spin right
    TurnRight(Timed),
    /// Stop all motion
    Stop,
    /// Show a preset expression
    Expression { id: String },
    /// Sound the buzzer
    Beep { frequency: u32, millis: u32 },
    /// Rotate to an absolute heading
    TurnTo {
        #[arg(allow_negative_numbers = true, value_parser = finite)]
        angle: f64,
        #[arg(long)]
        radians: bool,
    },
    /// Rotate by a relative angle
    Turn {
        #[arg(allow_negative_numbers = true, value_parser = finite)]
        angle: f64,
        #[arg(long)]
        radians: bool,
    },
    /// Drive forwards a number of wheel steps
    ForwardsTo { steps: u32 },
    /// Drive backwards a number of wheel steps
    BackwardsTo { steps: u32 },
    /// Ask the bridge to pause before answering
    Wait {
        #[arg(value_parser = finite)]
        seconds: f64,
    },
    /// Read the distance sensor
    Distance,
    /// Interactive keyboard panel on stdin
    Panel,
}

#[derive(clap::Args, Debug)]
struct Timed {
    /// Stop by itself after this long (0 means until stopped)
    #[arg(long)]
    time: Option<u32>,

    #[arg(long, value_enum, default_value_t = Unit::S)]
    unit: Unit,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Unit {
    S,
    Ms,
}

impl Timed {
    fn motion_time(&self) -> Option<MotionTime> {
        let unit = match self.unit {
            Unit::S => TimeUnit::Seconds,
            Unit::Ms => TimeUnit::Millis,
        };
        self.time.map(|amount| MotionTime { amount, unit })
    }
}

/// Parse an `f64`, refusing NaN and the infinities
fn finite(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{} is not a finite number", s))
    }
}

fn angle_unit(radians: bool) -> AngleUnit {
    if radians {
        AngleUnit::Radians
    } else {
        AngleUnit::Degrees
    }
}

impl Action {
    /// The catalogue command for a one-shot action; `None` for `panel`
    fn command(&self) -> Option<Command> {
        let command = match self {
            Action::Forwards(t) => Command::Forwards { time: t.motion_time() },
            Action::Backwards(t) => Command::Backwards { time: t.motion_time() },
            Action::TurnLeft(t) => Command::TurnLeft { time: t.motion_time() },
            Action::TurnRight(t) => Command::TurnRight { time: t.motion_time() },
            Action::Stop => Command::Stop,
            Action::Expression { id } => Command::expression(id.clone()),
            Action::Beep { frequency, millis } => Command::Beep {
                frequency: *frequency,
                millis: *millis,
            },
            Action::TurnTo { angle, radians } => Command::TurnTo {
                angle: *angle,
                unit: angle_unit(*radians),
            },
            Action::Turn { angle, radians } => Command::Turn {
                angle: *angle,
                unit: angle_unit(*radians),
            },
            Action::ForwardsTo { steps } => Command::ForwardsTo(*steps),
            Action::BackwardsTo { steps } => Command::BackwardsTo(*steps),
            Action::Wait { seconds } => Command::Wait(*seconds),
            Action::Distance => Command::GetDistance,
            Action::Panel => return None,
        };
        Some(command)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let observability = ObservabilityConfig::new("microvac-cli").with_log_level(&cli.log_level);
    let observability = match &cli.otlp_endpoint {
        Some(endpoint) => observability.with_endpoint(endpoint),
        None => observability.with_traces(false).with_metrics(false),
    };
    microvac_remote::init_observability(observability)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let controller = controller_builder(&cli)
        .bind(&StaticPanel::microvac())
        .context("Failed to bind the Microvac panel")?;

    let result = match cli.command.command() {
        Some(command) => one_shot(&controller, &command).await,
        None => panel(&controller, BufReader::new(tokio::io::stdin())).await,
    };

    microvac_remote::shutdown_observability();
    result
}

/// Controller options taken from the command line
///
/// Metrics instruments are only built when telemetry is exported.
fn controller_builder(cli: &Cli) -> ControllerBuilder {
    let mut builder = ControllerBuilder::new()
        .endpoint(&cli.endpoint)
        .service_name("microvac-cli");
    if cli.sequential_ids {
        builder = builder.id_strategy(IdStrategy::Sequential);
    }
    if cli.otlp_endpoint.is_some() {
        builder = builder.with_metrics();
    }
    builder
}

async fn one_shot(controller: &RemoteController, command: &Command) -> anyhow::Result<()> {
    command.validate()?;
    tracing::info!(command = %command, "Sending command");
    let reply: Value = controller
        .call(command.method(), command.params())
        .await
        .with_context(|| format!("{} failed", command.method()))?;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

/// Interactive panel over line-based `input`
///
/// Returns once `q` is read or the input ends, after every fired request
/// has completed.
async fn panel<R>(controller: &RemoteController, input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    println!("Microvac panel");
    println!("  w forward   a left   s stop   d right   x backward");
    println!("  1 2 3 expressions    q quit");

    let (clicks, rx) = mpsc::channel(32);
    let reader = tokio::spawn(async move {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("q") {
                break;
            }
            match line.parse::<Trigger>() {
                Ok(trigger) => {
                    if clicks.send(trigger.control_id().to_string()).await.is_err() {
                        break;
                    }
                }
                Err(e) => eprintln!("{}", e),
            }
        }
        Ok::<_, std::io::Error>(())
    });

    let fired = controller.run(rx).await;
    reader.await?.context("Failed to read stdin")?;
    tracing::info!(fired, "Panel closed");
    Ok(())
}

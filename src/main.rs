//! Run the sliding window protocol over a simulated link or a serial port.

use std::io::{BufRead, ErrorKind};
use std::process::ExitCode;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread::spawn;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use swp::simulator::{self, LinkConfig};
use swp::{network, open, Config, Engine, Host, SerialTransport, TimerThread};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Exchange payloads between two engines over a simulated lossy link.
    Simulate {
        #[arg(long, default_value_t = 32)]
        count: usize,
        #[arg(long, default_value_t = 0.1, value_parser = probability)]
        loss: f64,
        #[arg(long, default_value_t = 0.05, value_parser = probability)]
        corrupt: f64,
        #[arg(long, default_value_t = 0.05, value_parser = probability)]
        duplicate: f64,
        #[arg(long, default_value_t = 0.05, value_parser = probability)]
        reorder: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 200)]
        retransmit_ms: u64,
        #[arg(long, default_value_t = 20)]
        ack_ms: u64,
    },
    /// Send lines from stdin over a serial port and print received payloads.
    Serial {
        #[arg(index = 1)]
        tty: String,
        #[arg(long, default_value_t = 115_200)]
        baud_rate: u32,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    match Args::parse().command {
        Command::Simulate {
            count,
            loss,
            corrupt,
            duplicate,
            reorder,
            seed,
            retransmit_ms,
            ack_ms,
        } => {
            let link = LinkConfig {
                loss_rate: loss,
                corruption_rate: corrupt,
                duplicate_rate: duplicate,
                reorder_rate: reorder,
            };

            match Config::new(
                Duration::from_millis(retransmit_ms),
                Duration::from_millis(ack_ms),
            ) {
                Ok(config) => simulate(count, link, seed, config),
                Err(error) => {
                    error!("{error}");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Serial { tty, baud_rate } => match open(tty, baud_rate) {
            Ok(serial_port) => serial(serial_port),
            Err(error) => {
                error!("{error}");
                ExitCode::FAILURE
            }
        },
    }
}

fn probability(value: &str) -> Result<f64, String> {
    let probability: f64 = value.parse().map_err(|error| format!("{error}"))?;

    if (0.0..=1.0).contains(&probability) {
        Ok(probability)
    } else {
        Err(format!("{probability} is not within [0.0, 1.0]"))
    }
}

fn simulate(count: usize, link: LinkConfig, seed: u64, config: Config) -> ExitCode {
    let (events_a, receiver_a) = channel();
    let (events_b, receiver_b) = channel();
    let (endpoint_a, endpoint_b) = simulator::pair(link, seed, events_a.clone(), events_b.clone());
    let (host_a, channels_a) = network::pair(events_a.clone());
    let (host_b, channels_b) = network::pair(events_b.clone());
    let mut engine_a = Engine::new(
        endpoint_a,
        channels_a,
        receiver_a,
        TimerThread::spawn(events_a),
        config,
    );
    let mut engine_b = Engine::new(
        endpoint_b,
        channels_b,
        receiver_b,
        TimerThread::spawn(events_b),
        config,
    );
    spawn(move || engine_a.run());
    spawn(move || engine_b.run());

    for (name, host) in [("A", &host_a), ("B", &host_b)] {
        for n in 0..count {
            if let Err(error) = host.send(format!("{name} #{n}").as_bytes()) {
                error!("{name}: failed to send payload #{n}: {error}");
                return ExitCode::FAILURE;
            }
        }
    }

    let patience = config.retransmit_timeout() * 50;
    let mut success = true;

    for (name, host) in [("A", &host_a), ("B", &host_b)] {
        for n in 0..count {
            match host.receive_timeout(patience) {
                Ok(payload) => println!("{name} received: {}", String::from_utf8_lossy(&payload)),
                Err(error) => {
                    error!("{name}: payload #{n} not delivered: {error}");
                    success = false;
                    break;
                }
            }
        }
    }

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn serial(serial_port: Box<dyn serialport::SerialPort>) -> ExitCode {
    let (events, receiver) = channel();
    let transport = match SerialTransport::spawn(serial_port, events.clone()) {
        Ok(transport) => transport,
        Err(error) => {
            error!("{error}");
            return ExitCode::FAILURE;
        }
    };
    let (host, channels) = network::pair(events.clone());
    let mut engine = Engine::new(
        transport,
        channels,
        receiver,
        TimerThread::spawn(events),
        Config::default(),
    );
    spawn(move || engine.run());
    run_terminal(&host, &read_lines())
}

/// Forwards stdin lines to a channel, so the main thread can poll for them.
fn read_lines() -> Receiver<String> {
    let (lines_tx, lines_rx) = channel();

    spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if lines_tx.send(line).is_err() {
                        return;
                    }
                }
                Err(error) => {
                    error!("Failed to read from stdin: {error}");
                    return;
                }
            }
        }
    });

    lines_rx
}

fn run_terminal(host: &Host, lines: &Receiver<String>) -> ExitCode {
    loop {
        match lines.try_recv() {
            Ok(line) => {
                if let Err(error) = host.send(line.as_bytes()) {
                    warn!("Not sent: {error}");
                }
            }
            Err(TryRecvError::Empty) => (),
            Err(TryRecvError::Disconnected) => {
                info!("End of input.");
                return ExitCode::SUCCESS;
            }
        }

        match host.receive_timeout(POLL_INTERVAL) {
            Ok(payload) => println!("{}", String::from_utf8_lossy(&payload)),
            Err(error) if error.kind() == ErrorKind::TimedOut => (),
            Err(error) => {
                error!("{error}");
                return ExitCode::FAILURE;
            }
        }
    }
}

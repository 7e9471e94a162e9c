use clap::Parser;
use log::LevelFilter;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::{thread, time::Duration};
use transportsync::{
    cli::{validate_block_settings, Args, ControlCommand},
    logging,
    transport::block_time_ms,
    ui::TransportInspector,
    global_transport, SharedState, TransportConfig, TransportEventQueue, TransportSlot,
    TransportState, TransportSync,
};

fn main() {
    initialize_logging();
    let args = Args::parse();

    if let Err(error_msg) = validate_block_settings(args.sample_rate, args.block_size) {
        exit_with_error(&error_msg);
    }

    let shared_state = match create_transport(&args) {
        Ok(state) => state,
        Err(e) => exit_with_error(&format!("Error initialising transport: {}", e)),
    };

    let events = Arc::new(TransportEventQueue::default());
    let shutdown = Arc::new(AtomicBool::new(false));

    // The audio thread has no state of its own and follows the process-wide one.
    global_transport().set(Some(shared_state.clone()));
    let audio = spawn_audio_thread(&args, events.clone(), shutdown.clone());
    spawn_console_reader(shared_state, shutdown.clone());

    run_control_loop(&events, &shutdown, &audio);

    shutdown.store(true, Ordering::SeqCst);
    if audio.join().is_err() {
        log::error!("Audio thread panicked");
    }
    log::info!("Application exiting");
}

fn initialize_logging() {
    if let Err(e) = logging::init_logger(LevelFilter::Debug) {
        eprintln!("Continuing without file logging: {}", e);
        return;
    }
    log::info!("Application starting");
}

fn exit_with_error(error_msg: &str) -> ! {
    log::error!("{}", error_msg);
    eprintln!("{}", error_msg);
    std::process::exit(1);
}

fn create_transport(args: &Args) -> transportsync::Result<SharedState> {
    let mut config = TransportConfig::load_from(args.config.as_deref())?;
    args.apply_overrides(&mut config);
    config.validate()?;

    let state = TransportState::from_config(&config)?;
    if let Some(beat) = args.seek {
        state.seek_to(beat);
    }
    Ok(Arc::new(state))
}

/// Stands in for the host audio driver: one sync pass per block, timed from
/// the running DSP sample counter.
fn spawn_audio_thread(
    args: &Args,
    events: Arc<TransportEventQueue>,
    shutdown: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    let sample_rate = args.sample_rate;
    let block_size = u64::from(args.block_size);
    let max_blocks = args.blocks;
    let block_duration =
        Duration::from_secs_f64(block_size as f64 / f64::from(sample_rate));

    thread::spawn(move || {
        log::info!(
            "Audio thread started: {} Hz, {} samples per block",
            sample_rate,
            block_size
        );
        let mut sync =
            TransportSync::with_sources(Arc::new(TransportSlot::empty()), global_transport());
        let mut dsp_tick: u64 = 0;
        let mut blocks: u64 = 0;

        while !shutdown.load(Ordering::SeqCst) && (max_blocks == 0 || blocks < max_blocks) {
            sync.process_and_publish(block_time_ms(dsp_tick, sample_rate), &events);
            dsp_tick += block_size;
            blocks += 1;
            thread::sleep(block_duration);
        }
        log::info!("Audio thread finished after {} blocks", blocks);
    })
}

fn spawn_console_reader(shared_state: SharedState, shutdown: Arc<AtomicBool>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match ControlCommand::parse(&line) {
                Ok(ControlCommand::Quit) => {
                    shutdown.store(true, Ordering::SeqCst);
                    break;
                }
                Ok(command) => {
                    if let Err(e) = command.apply(&shared_state) {
                        log::warn!("Command '{}' rejected: {}", line.trim(), e);
                    }
                }
                Err(e) => log::warn!("{}", e),
            }
        }
    });
}

fn run_control_loop(
    events: &TransportEventQueue,
    shutdown: &AtomicBool,
    audio: &thread::JoinHandle<()>,
) {
    log::info!("Control loop running");
    println!("Type start, stop, tempo <bpm>, sig <n/d>, seek <beat>, midi <status> or quit");
    let mut inspector = TransportInspector::stderr();
    while !shutdown.load(Ordering::SeqCst) && !audio.is_finished() {
        if events.poll(&mut inspector) > 0 {
            inspector.refresh();
        }
        thread::sleep(Duration::from_millis(50));
    }
    events.poll(&mut inspector);
    inspector.refresh();
}

use std::path::PathBuf;

use chip_8_vm::{
    Chip8Builder, Chip8Color, DEFAULT_BACKGROUND_COLOR, DEFAULT_FOREGROUND_COLOR,
};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;

/// Headless CHIP-8 runner: executes a ROM for a fixed number of cycles and
/// prints the resulting framebuffer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Filepath to Chip-8 ROM file that will be executed
    #[clap(index = 1)]
    rom: PathBuf,

    /// Number of instruction cycles to run
    #[clap(short, long, default_value_t = 1000)]
    cycles: u64,

    /// Keep issuing cycles after one fails
    #[clap(long)]
    keep_going: bool,

    /// Background Color as HEX 0xAABBFF [default: 0x000000]
    #[clap(long)]
    background: Option<Chip8Color>,

    /// Foreground Color as HEX 0xAABBFF [default: 0xFFFFFF]
    #[clap(long)]
    foreground: Option<Chip8Color>,

    /// Write the final frame as raw RGBX8888 bytes to this file
    #[clap(long)]
    frame_out: Option<PathBuf>,

    /// Print registers, stack and a memory dump after the run
    #[clap(long)]
    dump_state: bool,

    /// Log every executed instruction
    #[clap(short, long)]
    debug: bool,

    /// Log machine state on failures as well
    #[clap(long)]
    trace: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let level = if args.trace {
        LevelFilter::Trace
    } else if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new().with_level(level).init()?;

    let rom_data = std::fs::read(&args.rom)
        .wrap_err_with(|| format!("Failed to read ROM file {}", args.rom.display()))?;
    info!("loaded {} byte ROM from {}", rom_data.len(), args.rom.display());

    let mut chip = Chip8Builder::new()
        .with_rom(rom_data)
        .with_trace(args.debug || args.trace)
        .build()?;

    let mut failures = 0u64;
    let mut executed = 0u64;
    for _ in 0..args.cycles {
        executed += 1;
        if let Err(err) = chip.tick() {
            failures += 1;
            if !args.keep_going {
                error!("halted after {} cycles: {}", executed, err);
                break;
            }
        }
    }
    info!(
        "ran {} cycles, {} failed, PC at 0x{:04x}",
        executed,
        failures,
        chip.pc()
    );

    print!("{}", chip.display().render_text());

    if args.dump_state {
        println!("{}", chip.full_dump());
    }

    if let Some(path) = args.frame_out {
        let foreground = args.foreground.unwrap_or(DEFAULT_FOREGROUND_COLOR);
        let background = args.background.unwrap_or(DEFAULT_BACKGROUND_COLOR);
        let frame = chip.display().to_rgbx(foreground, background);

        std::fs::write(&path, Chip8Color::as_bytes(&frame))
            .wrap_err_with(|| format!("Failed to write frame to {}", path.display()))?;
        info!("wrote frame to {}", path.display());
    }

    Ok(())
}

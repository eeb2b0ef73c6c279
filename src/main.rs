use std::fs;
use std::path::PathBuf;

use clap::Parser;
use sic1::error::ProtocolError;
use sic1::programs;
use sic1::protocol::ControlProtocol;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sic1", about = "SIC1 single-instruction computer simulator")]
struct Cli {
    /// Program image file: flat bytes, loaded at --base.
    #[arg(long, conflicts_with = "demo")]
    image: Option<PathBuf>,

    /// Built-in demo image (hello, counter, echo).
    #[arg(long)]
    demo: Option<String>,

    /// Load address of the image.
    #[arg(long, default_value_t = 0)]
    base: u8,

    /// Initial program counter.
    #[arg(long, default_value_t = 0)]
    pc: u8,

    /// Byte held on the input port (reads yield 0 when omitted).
    #[arg(long)]
    input: Option<u8>,

    /// Instruction budget; 0 runs unbounded until halt.
    #[arg(long, default_value_t = 1 << 20)]
    max_steps: usize,
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let image: Vec<u8> = match (&cli.demo, &cli.image) {
        (Some(name), _) => match name.as_str() {
            "hello" => programs::PRINT_HELLO_TINYTAPEOUT.to_vec(),
            "counter" => programs::COUNT_7SEGMENT.to_vec(),
            "echo" => programs::ECHO_NEGATE.to_vec(),
            other => {
                eprintln!("Unknown demo: {other}. Available: hello, counter, echo");
                std::process::exit(1);
            }
        },
        (None, Some(path)) => match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Failed to read {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        (None, None) => {
            eprintln!("Nothing to run: pass --image <file> or --demo <name>");
            std::process::exit(1);
        }
    };

    let mut protocol = ControlProtocol::new();
    if let Err(e) = protocol.write_memory_bytes(cli.base, &image) {
        eprintln!("{e}");
        std::process::exit(1);
    }
    protocol.set_program_counter(cli.pc);
    if let Some(byte) = cli.input {
        protocol.set_input(byte);
    }

    let bound = if cli.max_steps == 0 {
        None
    } else {
        Some(cli.max_steps)
    };
    match protocol.run_until_halt(bound) {
        Ok(steps) => eprintln!("halted after {steps} instructions"),
        Err(e @ ProtocolError::ExecutionTimeout { .. }) => eprintln!("{e}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }

    let out = protocol.drain_output();
    if out.is_empty() {
        eprintln!("no output");
    } else {
        println!("{}", protocol.peek_output_string());
        let hex: Vec<String> = out.iter().map(|b| format!("{b:02x}")).collect();
        println!("[{}]", hex.join(" "));
    }
}

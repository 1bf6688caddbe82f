//! icvm - Intcode VM CLI Entry Point
//!
//! Reads a one-line Intcode program from a file (or stdin with `-`),
//! runs it to halt with the console I/O strategy, and optionally dumps
//! the final memory image.

use clap::Parser;
use intcode::Computer;
use std::io::BufRead;

#[derive(Parser)]
#[command(name = "icvm")]
#[command(version = "0.1.0")]
#[command(about = "Run an Intcode program")]
struct Cli {
    /// Path of the program to run, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    file: String,

    /// Print the final memory image after the run
    #[arg(short, long)]
    verbose: bool,

    /// Print the final memory image as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    let program = match read_program(&cli.file) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("failed to read program: {}", e);
            std::process::exit(1);
        }
    };

    let mut computer = match Computer::new(&program) {
        Ok(computer) => computer,
        Err(e) => {
            eprintln!("failed to load program: {}", e);
            std::process::exit(1);
        }
    };

    if cli.verbose {
        println!("Output:");
    }

    if let Err(e) = computer.run() {
        eprintln!("execution failed: {}", e);
        std::process::exit(1);
    }

    if cli.verbose {
        println!("-------\nMemory:");
        for (addr, value) in computer.mem.dump() {
            println!("{}:\t{}", addr, value);
        }
    }

    if cli.json {
        match snapshot_json(&computer.mem) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("failed to serialize memory: {}", e);
                std::process::exit(1);
            }
        }
    }
}

/// Read the first line of the program file, or of stdin for `-`.
fn read_program(path: &str) -> std::io::Result<String> {
    let mut line = String::new();
    if path == "-" {
        std::io::stdin().lock().read_line(&mut line)?;
    } else {
        let file = std::fs::File::open(path)?;
        std::io::BufReader::new(file).read_line(&mut line)?;
    }
    Ok(line.trim_end().to_string())
}

/// Serialize the memory image as a JSON object keyed by address,
/// in ascending address order.
fn snapshot_json(mem: &intcode::Memory) -> serde_json::Result<String> {
    let mut image = serde_json::Map::new();
    for (addr, value) in mem.dump() {
        image.insert(addr.to_string(), serde_json::Value::from(value));
    }
    serde_json::to_string_pretty(&serde_json::Value::Object(image))
}

use std::fs::{self, File};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{bail, IntoDiagnostic, Result};

use stax::catalog::{self, Family};
use stax::{read_object, write_object, Assembler, DiskImage, Vm};

/// Stax is an assembler & interpreter toolchain for a 16-bit stack machine.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble `.asm` source into an object word stream
    Asm {
        /// `.asm` file to assemble
        source: PathBuf,
        /// Destination for the object file
        object: PathBuf,
        /// Also write a listing file
        #[arg(short, long)]
        listing: Option<PathBuf>,
    },
    /// Check a `.asm` file without writing an object file
    Check {
        /// File to check
        source: PathBuf,
    },
    /// Run an assembled object file against a disk image
    Run {
        /// Object file to execute
        program: PathBuf,
        /// Disk image file, created if missing
        diskimage: PathBuf,
        /// Trace each instruction and pause for acknowledgment
        #[arg(short, long)]
        trace: bool,
    },
    /// Print the instruction catalog grouped by addressing family
    Symbols,
}

fn main() -> Result<()> {
    use MsgColor::*;
    let args = Args::parse();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .context_lines(stax::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }))?;

    let Some(command) = args.command else {
        println!("\n~ stax v{VERSION} ~");
        println!("{SHORT_INFO}");
        return Ok(());
    };

    match command {
        Command::Asm {
            source,
            object,
            listing,
        } => {
            file_message(Green, "Assembling", &source);
            let src = fs::read_to_string(&source).into_diagnostic()?;
            let obj = Assembler::new(&src)?.assemble()?;

            write_object(&object, &obj.words)?;
            file_message(Green, "Saved", &object);

            if let Some(listing_path) = listing {
                let mut file = File::create(&listing_path).into_diagnostic()?;
                obj.write_listing(&src, &mut file).into_diagnostic()?;
                file_message(Green, "Listed", &listing_path);
            }

            let summary = format!(
                "{} words, {} symbols, {} errors",
                obj.words.len(),
                obj.symtab.len(),
                obj.errors
            );
            let color = if obj.errors > 0 { Red } else { Green };
            message(color, "Finished", summary.as_str());
            Ok(())
        }
        Command::Check { source } => {
            file_message(Green, "Checking", &source);
            let src = fs::read_to_string(&source).into_diagnostic()?;
            let obj = Assembler::new(&src)?.assemble()?;
            if obj.errors > 0 {
                bail!("Found {} errors.", obj.errors);
            }
            message(Green, "Success", "no errors found!");
            Ok(())
        }
        Command::Run {
            program,
            diskimage,
            trace,
        } => {
            file_message(Green, "Loading", &program);
            let text = fs::read_to_string(&program).into_diagnostic()?;
            let words = read_object(&text)?;

            let disk = DiskImage::open(&diskimage)?;
            let mut vm = Vm::load(&words, disk)?;
            vm.set_trace(trace);

            if trace {
                message(Cyan, "Tracing", "press enter after each instruction");
                print!("{}", vm.disassemble());
            }
            message(Green, "Running", "loaded program");
            vm.run()?;

            file_message(Green, "Completed", &program);
            Ok(())
        }
        Command::Symbols => {
            println!("{:>10} {:>16}", "Mnemonic", "Opcode");
            println!("----------------------------");
            for family in [
                Family::Inherent,
                Family::Direct,
                Family::Indexed,
                Family::Address,
            ] {
                println!("{} ops:", family.describe());
                for entry in catalog::CATALOG.iter().filter(|e| e.family == family) {
                    println!("{:>8}: {:>16}", entry.mnemonic, format!("{:04x}", entry.opcode));
                }
            }
            Ok(())
        }
    }
}

#[allow(unused)]
enum MsgColor {
    Green,
    Cyan,
    Red,
}

fn file_message(color: MsgColor, left: &str, right: &PathBuf) {
    let right = format!("target {}", right.to_str().unwrap());
    message(color, left, &right);
}

fn message<S>(color: MsgColor, left: S, right: S)
where
    S: Colorize + std::fmt::Display,
{
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Red => left.red(),
    };
    println!("{left:>12} {right}");
}

const SHORT_INFO: &str = r"
An all-in-one toolchain for a small 16-bit stack machine: a two-pass
assembler, an object runner with console and disk ports, and a single-step
tracer. Please use `-h` or `--help` for the usage instructions.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");

//! `jsonmap` CLI: compile a program file and apply it to a JSON document,
//! following the `clap` derive style used for the CLI front-end elsewhere in
//! the retrieval pack rather than hand-parsing `std::env::args`.

use clap::Parser as ClapParser;
use jsonmap::{Code, Position, Program};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(ClapParser)]
#[command(name = "jsonmap", version, about = "Reshape JSON documents with a jsonmap program")]
struct Cli {
    /// Path to a jsonmap program source file.
    program_file: PathBuf,

    /// Path to a JSON input document; reads stdin if omitted.
    data_file: Option<PathBuf>,

    /// Pretty-print the parsed statement tree to stderr before evaluating.
    #[arg(long)]
    ast: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let source = fs::read_to_string(&cli.program_file)
        .map_err(|e| format!("{}: error: {}", cli.program_file.display(), e))?;

    let program = Program::compile(&source).map_err(|err| {
        let code = Code::new(&source);
        let position = Position::from_offset(&code, err.offset);
        format!("{}:{}: error: {}", cli.program_file.display(), position, err)
    })?;

    if cli.ast {
        program.print_ast();
    }

    let input_text = match &cli.data_file {
        Some(path) => fs::read_to_string(path).map_err(|e| format!("{}: error: {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("<stdin>: error: {}", e))?;
            buf
        }
    };

    let input: serde_json::Value =
        serde_json::from_str(&input_text).map_err(|e| format!("invalid JSON input: {}", e))?;

    let output = program.apply(&input).map_err(|err| {
        let code = Code::new(&source);
        let position = Position::from_offset(&code, err.offset);
        format!("{}:{}: error: {}", cli.program_file.display(), position, err)
    })?;

    serde_json::to_writer_pretty(io::stdout(), &output).map_err(|e| format!("error writing output: {}", e))?;
    println!();

    Ok(())
}

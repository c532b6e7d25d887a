use std::env;
use std::fs;
use std::process;
use std::thread;

use flux_syntax::debug::enable_debug;
use flux_syntax::error::{IntoFluxError, Result};
use flux_syntax::{parse_source, print_program, ErrorFormatter, FluxError};

/// Parser recursion is bounded by the nesting limit, not by the main
/// thread's stack
const PARSER_STACK_SIZE: usize = 64 * 1024 * 1024;

struct Options {
    input: String,
    json: bool,
    print: bool,
    color: bool,
}

fn parse_args(args: &[String]) -> Option<Options> {
    let mut input = None;
    let mut options = Options {
        input: String::new(),
        json: false,
        print: false,
        color: true,
    };

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--json" => options.json = true,
            "--print" => options.print = true,
            "--no-color" => options.color = false,
            "--debug" => enable_debug(),
            flag if flag.starts_with("--") => return None,
            path if input.is_none() => input = Some(path.to_string()),
            _ => return None,
        }
    }

    options.input = input?;
    Some(options)
}

/// Parse the input and report; true when no errors were found
fn run(options: &Options) -> Result<bool> {
    let source = fs::read_to_string(&options.input)?;
    let output = parse_source(&source);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    if options.print {
        print!("{}", print_program(&output.program));
    }

    for error in output.errors.errors() {
        let formatted = ErrorFormatter::new(error, &source)
            .with_filename(&options.input)
            .with_color(options.color)
            .format();
        eprintln!("{}", formatted);
    }

    if !output.has_errors() && !options.json && !options.print {
        println!(
            "{}: ok ({} declarations)",
            options.input,
            output.program.declarations.len()
        );
    }
    Ok(!output.has_errors())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let options = match parse_args(&args) {
        Some(options) => options,
        None => {
            eprintln!(
                "Usage: {} <input.fx> [--json] [--print] [--no-color] [--debug]",
                args.first().map_or("flux-parse", String::as_str)
            );
            process::exit(2);
        }
    };

    let worker = thread::Builder::new()
        .name("flux-parse".to_string())
        .stack_size(PARSER_STACK_SIZE)
        .spawn(move || run(&options));

    let outcome = match worker {
        Ok(handle) => handle
            .join()
            .unwrap_or_else(|_| Err("parser thread panicked".into_internal_error())),
        Err(err) => Err(FluxError::from(err)),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    }
}

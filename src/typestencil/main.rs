use clap::Parser;
use colored::*;
use metafilter::adapter::Arity;
use metafilter::standard_filters;
use std::path::PathBuf;
use typestencil::config::StencilConfig;
use typestencil::error::{Result, StencilError};
use typestencil::generate::{self, Destination, Generated};

mod args;
use args::{parse_argument, Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Render {
            types,
            templates,
            output,
            ext,
            args,
            stdout,
            no_header,
        } => {
            let mut config = StencilConfig::load(&cli.config)?;
            if types.is_some() {
                config.types = types;
            }
            if !templates.is_empty() {
                config.templates = templates;
            }
            if output.is_some() {
                config.output = output;
            }
            if let Some(ext) = ext {
                config.set_output_ext(&ext);
            }
            if no_header {
                config.header = false;
            }
            for raw in &args {
                let (key, value) = parse_argument(raw).map_err(StencilError::Argument)?;
                config.arguments.insert(key, value);
            }
            handle_render(&config, stdout)
        }
        Commands::Check { templates } => {
            let templates = if templates.is_empty() {
                StencilConfig::load(&cli.config)?.templates
            } else {
                templates
            };
            handle_check(&templates)
        }
        Commands::Filters => handle_filters(),
    }
}

/// Sets up logging to stderr. `RUST_LOG` wins over the verbosity flag.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn handle_render(config: &StencilConfig, stdout: bool) -> Result<()> {
    let destination = if stdout {
        Destination::Stdout
    } else {
        let dir = config.output.clone().ok_or_else(|| {
            StencilError::Config("no output directory, use --output or --stdout".to_string())
        })?;
        Destination::Directory(dir)
    };

    let generated = generate::run(config, &destination)?;
    match destination {
        Destination::Stdout => print_rendered(&generated),
        Destination::Directory(_) => print_generated(&generated),
    }
    Ok(())
}

fn handle_check(templates: &[PathBuf]) -> Result<()> {
    if templates.is_empty() {
        return Err(StencilError::Config("no templates given".to_string()));
    }
    let checked = generate::check(templates)?;
    for path in &checked {
        println!("{} {}", "ok".green(), path.display());
    }
    println!(
        "{}",
        format!("{} template(s) compiled", checked.len()).dimmed()
    );
    Ok(())
}

fn handle_filters() -> Result<()> {
    for filter in standard_filters().filters() {
        match filter.arity() {
            Arity::One => println!("{}{}", filter.name(), "(String)".dimmed()),
            Arity::None => println!("{}", filter.name()),
        }
    }
    Ok(())
}

fn print_rendered(generated: &[Generated]) {
    for item in generated {
        print!("{}", item.content);
    }
}

fn print_generated(generated: &[Generated]) {
    for item in generated {
        if let Some(path) = &item.path {
            println!("{} {}", "Generated".green(), path.display());
        }
    }
    println!(
        "{}",
        format!("{} file(s) written", generated.len()).dimmed()
    );
}

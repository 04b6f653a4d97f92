//! Print the pixel display list of a KRB document, one command per line.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use krb_view::backend::{PixelBackend, log_loaded};
use krb_view::config::PixelConfig;
use krb_view::krb;

#[derive(Parser, Debug)]
#[command(name = "krb-draw", version, about = "Dump the draw commands for a KRB document", long_about = None)]
struct Args {
    /// KRB document to render
    file: PathBuf,

    /// Pixel scale factor (overrides KRB_SCALE)
    #[arg(long)]
    scale: Option<f32>,
}

fn fail(message: impl std::fmt::Display) -> ExitCode {
    eprintln!("error: {message}");
    eprintln!("{}", Args::command().render_usage());
    ExitCode::from(1)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            // clap's message already carries the usage line
            let _ = e.print();
            return ExitCode::from(1);
        }
    };

    let mut config = PixelConfig::from_env();
    if let Some(scale) = args.scale {
        if !(scale.is_finite() && scale > 0.0) {
            return fail(format_args!("invalid scale {scale}"));
        }
        config.scale = scale;
    }

    let source = args.file.display().to_string();
    let loaded = match krb::read_file(&args.file) {
        Ok(loaded) => loaded,
        Err(e) => return fail(format_args!("{source}: {e}")),
    };
    log_loaded(&source, &loaded);

    let mut backend = PixelBackend::new(config);
    let mut stdout = io::stdout().lock();
    for command in backend.render(&loaded.forest) {
        if let Err(e) = writeln!(stdout, "{command}") {
            eprintln!("error: writing display list: {e}");
            return ExitCode::from(1);
        }
    }
    ExitCode::SUCCESS
}

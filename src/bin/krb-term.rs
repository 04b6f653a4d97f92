//! Render a KRB document into the terminal once and exit.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use log::debug;

use krb_view::backend::{TerminalBackend, log_loaded};
use krb_view::config::TerminalConfig;
use krb_view::krb;

#[derive(Parser, Debug)]
#[command(name = "krb-term", version, about = "Print a KRB document as a terminal frame", long_about = None)]
struct Args {
    /// KRB document to render
    file: PathBuf,

    /// Print characters only, without colors or cursor control
    #[arg(long, default_value_t = false)]
    plain: bool,
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

    let source = args.file.display().to_string();
    let loaded = match krb::read_file(&args.file) {
        Ok(loaded) => loaded,
        Err(e) => return fail(format_args!("{source}: {e}")),
    };
    log_loaded(&source, &loaded);

    let config = TerminalConfig::from_env();
    let mut term = TerminalBackend::new(config);
    term.render(&loaded.forest);
    debug!(
        "frame {}x{} cells",
        term.buffer().width(),
        term.buffer().height()
    );

    let mut stdout = io::stdout().lock();
    let written = if args.plain {
        use std::io::Write;
        writeln!(stdout, "{}", term.plain_text())
    } else {
        term.print_frame(&mut stdout)
    };
    match written {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: writing frame: {e}");
            ExitCode::from(1)
        }
    }
}

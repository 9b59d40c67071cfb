// batch runner entry point

use std::path::Path;
use std::process::ExitCode;

use ccforth::config::Config;
use ccforth::messages::Msg;
use ccforth::{cfront, files, Interpreter};

fn main() -> ExitCode {
    let mut config = Config::new();
    config.process_args();

    let mut msg = Msg::new();
    msg.set_level(config.debug_level);

    let path = Path::new(&config.loaded_file);
    let source = match files::read_source(path, &msg) {
        Ok(s) => s,
        Err(e) => {
            msg.error("main", "could not read source file", Some(e.to_string()));
            return ExitCode::FAILURE;
        }
    };

    let program = if path.extension().and_then(|e| e.to_str()) == Some("c") {
        match cfront::compile(&source) {
            Ok(text) => text,
            Err(e) => {
                msg.error("main", "C compilation failed", Some(e.to_string()));
                return ExitCode::FAILURE;
            }
        }
    } else {
        source
    };

    let mut interp = Interpreter::new();
    interp.msg.set_level(config.debug_level);
    if let Err(e) = interp.run(&program) {
        msg.error("main", "program aborted", Some(e.to_string()));
        return ExitCode::FAILURE;
    }

    if config.show_stack {
        for v in interp.scopes.active_stack().iter().rev() {
            print!("{v} ");
        }
        println!();
    }

    ExitCode::SUCCESS
}

// system configuration and command line processing

use argh::FromArgs;

use crate::messages::DebugLevel;

pub const VERSION: &str = "0.1.0";

#[derive(FromArgs)]
/// A small stack-based language interpreter with a C front-end.
struct Args {
    /// source file to run (`.sx` runs directly, `.c` is compiled first)
    #[argh(positional)]
    file: String,

    /// diagnostic verbosity: error, warning, info, or debug
    #[argh(option, default = "String::from(\"error\")")]
    debug_level: String,

    /// print the data stack after the program finishes
    #[argh(switch, short = 's')]
    show_stack: bool,
}

pub struct Config {
    pub debug_level: DebugLevel,
    pub loaded_file: String,
    pub show_stack: bool,
}

impl Config {
    pub fn new() -> Config {
        Config {
            debug_level: DebugLevel::Error,
            loaded_file: String::new(),
            show_stack: false,
        }
    }

    /// process_args handles command line argument processing using argh
    ///
    pub fn process_args(&mut self) -> &Config {
        let args: Args = argh::from_env();
        self.debug_level = match args.debug_level.as_str() {
            "debug" => DebugLevel::Debug,
            "info" => DebugLevel::Info,
            "warning" => DebugLevel::Warning,
            _ => DebugLevel::Error,
        };
        self.loaded_file = args.file;
        self.show_stack = args.show_stack;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

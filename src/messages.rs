//! Leveled diagnostic reporting, used in place of ad hoc println!/eprintln! calls.

use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Error,
    Warning,
    Info,
    Debug,
}

#[derive(Debug, Clone)]
pub struct Msg {
    level: DebugLevel,
}

impl Msg {
    pub fn new() -> Msg {
        Msg {
            level: DebugLevel::Error,
        }
    }

    pub fn set_level(&mut self, level: DebugLevel) {
        self.level = level;
    }

    pub fn get_level(&self) -> DebugLevel {
        self.level
    }

    pub fn error<T: Debug>(&self, site: &str, text: &str, detail: Option<T>) {
        self.emit(DebugLevel::Error, site, text, detail);
    }

    pub fn warning<T: Debug>(&self, site: &str, text: &str, detail: Option<T>) {
        self.emit(DebugLevel::Warning, site, text, detail);
    }

    pub fn info<T: Debug>(&self, site: &str, text: &str, detail: Option<T>) {
        self.emit(DebugLevel::Info, site, text, detail);
    }

    pub fn debug<T: Debug>(&self, site: &str, text: &str, detail: Option<T>) {
        self.emit(DebugLevel::Debug, site, text, detail);
    }

    fn emit<T: Debug>(&self, level: DebugLevel, site: &str, text: &str, detail: Option<T>) {
        if level > self.level {
            return;
        }
        match detail {
            Some(d) => eprintln!("[{:?}] {}: {} ({:?})", level, site, text, d),
            None => eprintln!("[{:?}] {}: {}", level, site, text),
        }
    }
}

impl Default for Msg {
    fn default() -> Self {
        Msg::new()
    }
}

use std::fmt;
use std::sync::{Arc, Mutex};

use shellcmd::{Color, Emphasis, Formatter, Printer};

/// One call observed by [`RecordingFormatter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Print {
        fg: Color,
        bg: Color,
        emphasis: Vec<Emphasis>,
        text: String,
    },
    Warning(String),
    Error(String),
}

/// A formatter that records every call instead of writing anywhere.
///
/// Clones share the same log, so keep one clone and hand the other to the
/// context.
#[derive(Debug, Clone, Default)]
pub struct RecordingFormatter {
    events: Arc<Mutex<Vec<Recorded>>>,
}

impl RecordingFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Recorded> {
        self.events.lock().unwrap().clone()
    }

    /// Concatenated text of all printer calls.
    pub fn printed(&self) -> String {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Recorded::Print { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Recorded::Warning(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }
}

impl Formatter for RecordingFormatter {
    fn make_printer(&self, fg: Color, bg: Color, emphasis: &[Emphasis]) -> Printer {
        let events = Arc::clone(&self.events);
        let emphasis = emphasis.to_vec();
        Arc::new(move |args: fmt::Arguments<'_>| {
            events.lock().unwrap().push(Recorded::Print {
                fg,
                bg,
                emphasis: emphasis.clone(),
                text: args.to_string(),
            });
        })
    }

    fn warning_line(&self, msg: &str) {
        self.events.lock().unwrap().push(Recorded::Warning(msg.to_string()));
    }

    fn error_line(&self, msg: &str) {
        self.events.lock().unwrap().push(Recorded::Error(msg.to_string()));
    }
}

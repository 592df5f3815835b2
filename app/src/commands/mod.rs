//! CLI commands
//!
//! Each command takes the app state and returns data that can be printed
//! as a table or as JSON. No business rules live here.

pub mod policies;
pub mod profile;
pub mod reports;
pub mod users;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl<T> From<agency_core::Result<T>> for CommandResult<T> {
    fn from(result: agency_core::Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Plain-text rendering for terminal output.
pub trait Render {
    fn render(&self) -> String;
}

impl<T: Render> Render for Vec<T> {
    fn render(&self) -> String {
        if self.is_empty() {
            return "(none)".to_string();
        }
        self.iter().map(Render::render).collect::<Vec<_>>().join("\n")
    }
}

impl Render for bool {
    fn render(&self) -> String {
        let text = if *self { "done" } else { "nothing to do" };
        text.to_string()
    }
}

/// Print a command outcome. Returns whether it succeeded.
pub fn emit<T: Serialize + Render>(result: CommandResult<T>, json: bool) -> anyhow::Result<bool> {
    let success = result.success;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if let Some(data) = &result.data {
        println!("{}", data.render());
    } else if let Some(error) = &result.error {
        eprintln!("error: {error}");
    }

    Ok(success)
}

pub fn emit_result<T: Serialize + Render>(
    result: agency_core::Result<T>,
    json: bool,
) -> anyhow::Result<bool> {
    emit(CommandResult::from(result), json)
}

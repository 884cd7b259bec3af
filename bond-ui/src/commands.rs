//! The trainer's line-oriented command language.
//!
//! One command per line. Blank lines and lines starting with `#` are
//! skipped, so a script can carry comments.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { field: String, value: String },
    Toggle { field: String, member: String, included: bool },
    Next,
    Prev,
    Goto(String),
    Status,
    Complete,
    Restart { keep: bool },
    Brand { field: String, value: String },
    Logo(PathBuf),
    Templates { category: Option<String> },
    SaveTemplate { name: String, description: String, category: String },
    LoadTemplate(String),
    DeleteTemplate(String),
    ExportTemplate(String),
    ImportTemplate(PathBuf),
    Validate,
    ExportSession,
    Share,
    Print,
    LogLevel(String),
    LogStdout(bool),
    Help,
    Quit,
}

pub const HELP: &str = "\
Form
  set <field> <value...>          store text in a field
  toggle <field> <member> [on|off] tick or untick a checkbox
  next | prev | goto <section>    move between tabs
  status                          progress and missing fields
  complete                        submit from the last tab
  restart [--keep]                start a new training run
Branding
  brand <field> <value...>        change a branding field
  logo <path>                     embed an image as the logo
Templates
  templates [category]            list the library
  save-template <name> | <description> | <category>
  load-template <id>              apply a template's branding
  delete-template <id>
  export-template <id>            write <name>_template.json
  import-template <path>
Output
  validate                        run the compliance checks
  export-session                  write training-form-<date>.json
  share                           print a client link
  print                           print the whole form
  log <level> | log stdout on|off  adjust logging
  help | quit";

/// First word, and whatever follows it with surrounding space trimmed.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn required<'a>(
    value: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    if value.is_empty() {
        Err(CommandError::MissingArgument { command, argument })
    } else {
        Ok(value)
    }
}

fn field_and_value(
    rest: &str,
    command: &'static str,
) -> Result<(String, String), CommandError> {
    let (field, value) = split_word(rest);
    let field = required(field, command, "a field name")?;
    Ok((field.to_string(), value.to_string()))
}

/// Parses one line. `Ok(None)` means there was nothing to run.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = split_word(line);
    let command = match word.to_ascii_lowercase().as_str() {
        "set" => {
            let (field, value) = field_and_value(rest, "set")?;
            Command::Set { field, value }
        }
        "toggle" => {
            let (field, tail) = split_word(rest);
            let field = required(field, "toggle", "a field name")?;
            let (member, included) = match tail.rsplit_once(char::is_whitespace) {
                Some((member, "on")) => (member.trim(), true),
                Some((member, "off")) => (member.trim(), false),
                // a lone flag names no member
                None if tail == "on" || tail == "off" => ("", true),
                _ => (tail, true),
            };
            let member = required(member, "toggle", "a member")?;
            Command::Toggle {
                field: field.to_string(),
                member: member.to_string(),
                included,
            }
        }
        "next" => Command::Next,
        "prev" | "previous" => Command::Prev,
        "goto" => Command::Goto(required(rest, "goto", "a section")?.to_string()),
        "status" => Command::Status,
        "complete" | "submit" => Command::Complete,
        "restart" => Command::Restart {
            keep: rest == "--keep",
        },
        "brand" => {
            let (field, value) = field_and_value(rest, "brand")?;
            Command::Brand { field, value }
        }
        "logo" => Command::Logo(PathBuf::from(required(rest, "logo", "a file path")?)),
        "templates" => Command::Templates {
            category: (!rest.is_empty()).then(|| rest.to_string()),
        },
        "save-template" => {
            let mut parts = rest.split('|').map(str::trim);
            let name = required(parts.next().unwrap_or_default(), "save-template", "a name")?;
            Command::SaveTemplate {
                name: name.to_string(),
                description: parts.next().unwrap_or_default().to_string(),
                category: parts.next().unwrap_or_default().to_string(),
            }
        }
        "load-template" => {
            Command::LoadTemplate(required(rest, "load-template", "a template id")?.to_string())
        }
        "delete-template" => Command::DeleteTemplate(
            required(rest, "delete-template", "a template id")?.to_string(),
        ),
        "export-template" => Command::ExportTemplate(
            required(rest, "export-template", "a template id")?.to_string(),
        ),
        "import-template" => Command::ImportTemplate(PathBuf::from(required(
            rest,
            "import-template",
            "a file path",
        )?)),
        "validate" => Command::Validate,
        "export-session" => Command::ExportSession,
        "share" => Command::Share,
        "print" => Command::Print,
        "log" => match split_word(rest) {
            ("stdout", "on") => Command::LogStdout(true),
            ("stdout", "off") => Command::LogStdout(false),
            ("stdout", _) => {
                return Err(CommandError::MissingArgument {
                    command: "log stdout",
                    argument: "on or off",
                });
            }
            _ => Command::LogLevel(required(rest, "log", "a level")?.to_string()),
        },
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

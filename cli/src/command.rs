//! Parsing of shell input lines.

use todo_core::DraftField;

pub const USAGE: &str = "\
commands:
  add <title> [| <description>]   create a todo
  toggle <n>                      flip completion of item n
  edit <n>                        open the edit form for item n
  set title|description <text>    change the open draft
  save | cancel                   finish the edit
  delete <n>                      remove item n
  show <n>                        fetch item n from the server
  refresh                         reload the list
  help | quit";

/// One line of user input. Item numbers are 1-based list positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { title: String, description: String },
    Toggle(usize),
    Edit(usize),
    Set { field: DraftField, value: String },
    Save,
    Cancel,
    Delete(usize),
    Show(usize),
    Refresh,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match word {
            "add" => {
                let (title, description) = match rest.split_once('|') {
                    Some((title, description)) => (title.trim(), description.trim()),
                    None => (rest, ""),
                };
                Ok(Command::Add {
                    title: title.to_string(),
                    description: description.to_string(),
                })
            }
            "toggle" => position(rest).map(Command::Toggle),
            "edit" => position(rest).map(Command::Edit),
            "delete" | "rm" => position(rest).map(Command::Delete),
            "show" => position(rest).map(Command::Show),
            "set" => {
                let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let field = name.parse::<DraftField>()?;
                Ok(Command::Set {
                    field,
                    value: value.trim().to_string(),
                })
            }
            "save" => Ok(Command::Save),
            "cancel" => Ok(Command::Cancel),
            "refresh" | "ls" => Ok(Command::Refresh),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

fn position(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("expected an item number, got {arg:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_with_and_without_description() {
        assert_eq!(
            Command::parse("add Buy milk").unwrap(),
            Command::Add {
                title: "Buy milk".to_string(),
                description: String::new()
            }
        );
        assert_eq!(
            Command::parse("add Walk dog | 2pm").unwrap(),
            Command::Add {
                title: "Walk dog".to_string(),
                description: "2pm".to_string()
            }
        );
    }

    #[test]
    fn add_keeps_blank_title_for_the_session_to_skip() {
        assert_eq!(
            Command::parse("add").unwrap(),
            Command::Add {
                title: String::new(),
                description: String::new()
            }
        );
    }

    #[test]
    fn item_numbers_are_one_based() {
        assert_eq!(Command::parse("toggle 2").unwrap(), Command::Toggle(2));
        assert_eq!(Command::parse("  delete   1 ").unwrap(), Command::Delete(1));
        assert!(Command::parse("edit 0").is_err());
        assert!(Command::parse("edit x").is_err());
        assert!(Command::parse("show").is_err());
    }

    #[test]
    fn set_draft_fields() {
        assert_eq!(
            Command::parse("set title Buy bread").unwrap(),
            Command::Set {
                field: DraftField::Title,
                value: "Buy bread".to_string()
            }
        );
        assert_eq!(
            Command::parse("set description").unwrap(),
            Command::Set {
                field: DraftField::Description,
                value: String::new()
            }
        );
        assert!(Command::parse("set completed true").is_err());
    }

    #[test]
    fn unknown_and_empty_lines_are_errors() {
        assert!(Command::parse("frobnicate").is_err());
        assert!(Command::parse("   ").is_err());
        assert_eq!(Command::parse("q").unwrap(), Command::Quit);
    }
}

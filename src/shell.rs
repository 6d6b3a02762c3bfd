//! Line-oriented operator shell: parses one command per line and applies
//! it to an [`Inventory`]. Terminal I/O lives in the binary.

use lazy_static::lazy_static;
use regex::Regex;

use crate::render;
use crate::session::Inventory;

lazy_static! {
    static ref QTY_REGEX: Regex = Regex::new(r"^(sell|restock|set)\s+([+-]?[0-9]+)$").unwrap();
    static ref SELECT_REGEX: Regex = Regex::new(r"^select(?:\s+(.+))?$").unwrap();
    static ref FIND_REGEX: Regex = Regex::new(r"^find(?:\s+(.*))?$").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    ForceQuit,
    Find(String),
    Select(Option<String>),
    Sell(i64),
    Restock(i64),
    Set(i64),
    Metrics,
    Save,
    Reload,
    DisableOutput,
    EnableOutput,
}

pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    match line {
        "help" => return Some(Command::Help),
        "q" | "quit" => return Some(Command::Quit),
        "q!" => return Some(Command::ForceQuit),
        "metrics" => return Some(Command::Metrics),
        "save" => return Some(Command::Save),
        "reload" => return Some(Command::Reload),
        "disable_output" => return Some(Command::DisableOutput),
        "enable_output" => return Some(Command::EnableOutput),
        _ => {}
    }

    if let Some(caps) = QTY_REGEX.captures(line) {
        let qty = caps[2].parse::<i64>().ok()?;
        return match &caps[1] {
            "sell" => Some(Command::Sell(qty)),
            "restock" => Some(Command::Restock(qty)),
            _ => Some(Command::Set(qty)),
        };
    }
    if let Some(caps) = SELECT_REGEX.captures(line) {
        return Some(Command::Select(caps.get(1).map(|m| m.as_str().trim().to_string())));
    }
    if let Some(caps) = FIND_REGEX.captures(line) {
        return Some(Command::Find(
            caps.get(1).map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
        ));
    }
    None
}

pub const HELP: &str = "Commands:
  find <text>     Show items whose name contains <text> (find alone clears)
  select <name>   Select the item to act on
  sell <n>        Record a sale of n units of the selected item
  restock <n>     Record n units received for the selected item
  set <n>         Correct the on-hand count of the selected item
  metrics         Show profit per item and totals
  save            Write the table back to the sheet
  reload          Re-read the sheet, dropping unsaved changes
  disable_output  Stop redrawing the table after each command
  enable_output   Redraw the table after each command
  q               Quit (refused while there are unsaved changes)
  q!              Quit and discard unsaved changes";

/// Result of one command.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Continue {
        status: String,
        output: Option<String>,
    },
    Exit,
}

impl Outcome {
    fn status(status: impl Into<String>) -> Self {
        Outcome::Continue {
            status: status.into(),
            output: None,
        }
    }

    fn with_output(status: impl Into<String>, output: String) -> Self {
        Outcome::Continue {
            status: status.into(),
            output: Some(output),
        }
    }
}

pub struct Shell {
    inventory: Inventory,
    query: String,
    selected: Option<String>,
    pub show: bool,
}

impl Shell {
    pub fn new(inventory: Inventory) -> Self {
        Shell {
            inventory,
            query: String::new(),
            selected: None,
            show: true,
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The filtered table followed by the totals line.
    pub fn view(&self) -> String {
        let items = self.inventory.filter(&self.query);
        let mut out = render::items_table(&items, self.selected());
        out.push_str(&render::summary(&self.inventory.metrics()));
        if self.inventory.is_dirty() {
            out.push_str("  [unsaved]");
        }
        out
    }

    pub fn execute(&mut self, line: &str) -> Outcome {
        if line.trim().is_empty() {
            return Outcome::status("invalid command");
        }
        let Some(command) = parse_command(line) else {
            return Outcome::status("invalid command");
        };

        match command {
            Command::Help => Outcome::with_output("ok", HELP.to_string()),
            Command::Quit if self.inventory.is_dirty() => {
                Outcome::status("unsaved changes: save first or q! to discard")
            }
            Command::Quit | Command::ForceQuit => Outcome::Exit,
            Command::Find(query) => {
                let hits = self.inventory.filter(&query).len();
                self.query = query;
                Outcome::status(format!("{} match(es)", hits))
            }
            Command::Select(None) => {
                self.selected = None;
                Outcome::status("ok")
            }
            Command::Select(Some(name)) => match self.inventory.table().get(&name) {
                Some(item) => {
                    let line = render::item_line(item);
                    self.selected = Some(name);
                    Outcome::with_output("ok", line)
                }
                None => Outcome::status(format!("no item named '{}'", name)),
            },
            Command::Sell(qty) => self.on_selected(|inv, name| inv.sell(name, qty).map(render::item_line)),
            Command::Restock(qty) => {
                self.on_selected(|inv, name| inv.restock(name, qty).map(render::item_line))
            }
            Command::Set(value) => {
                self.on_selected(|inv, name| inv.adjust_on_hand(name, value).map(render::item_line))
            }
            Command::Metrics => {
                let metrics = self.inventory.metrics();
                let mut out = String::new();
                for m in &metrics.items {
                    out.push_str(&format!(
                        "{:<24} unit {:>10.2}  profit {:>12.2}  sales {:>12.2}\n",
                        m.name, m.unit_profit, m.row_profit, m.sales
                    ));
                }
                out.push_str(&render::summary(&metrics));
                Outcome::with_output("ok", out)
            }
            Command::Save => match self.inventory.flush() {
                Ok(rows) => Outcome::status(format!("saved {} rows", rows)),
                Err(e) => Outcome::status(e.to_string()),
            },
            Command::Reload => match self.inventory.reload() {
                Ok(()) => {
                    if let Some(name) = &self.selected {
                        if self.inventory.table().get(name).is_none() {
                            self.selected = None;
                        }
                    }
                    Outcome::status("ok")
                }
                Err(e) => Outcome::status(e.to_string()),
            },
            Command::DisableOutput => {
                self.show = false;
                Outcome::status("ok")
            }
            Command::EnableOutput => {
                self.show = true;
                Outcome::status("ok")
            }
        }
    }

    fn on_selected<F>(&mut self, action: F) -> Outcome
    where
        F: FnOnce(&mut Inventory, &str) -> crate::Result<String>,
    {
        let Some(name) = self.selected.clone() else {
            return Outcome::status("no item selected");
        };
        match action(&mut self.inventory, &name) {
            Ok(line) => Outcome::with_output("ok", line),
            Err(e) => Outcome::status(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quantity_commands() {
        assert_eq!(parse_command("sell 3"), Some(Command::Sell(3)));
        assert_eq!(parse_command("  restock   12 "), Some(Command::Restock(12)));
        assert_eq!(parse_command("set -1"), Some(Command::Set(-1)));
        assert_eq!(parse_command("sell three"), None);
        assert_eq!(parse_command("sell 99999999999999999999"), None);
    }

    #[test]
    fn parses_select_and_find() {
        assert_eq!(parse_command("select Diet Coke"), Some(Command::Select(Some("Diet Coke".into()))));
        assert_eq!(parse_command("select"), Some(Command::Select(None)));
        assert_eq!(parse_command("find cok"), Some(Command::Find("cok".into())));
        assert_eq!(parse_command("find"), Some(Command::Find(String::new())));
    }

    #[test]
    fn parses_simple_words() {
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("q!"), Some(Command::ForceQuit));
        assert_eq!(parse_command("save"), Some(Command::Save));
        assert_eq!(parse_command("disable_output"), Some(Command::DisableOutput));
        assert_eq!(parse_command("dance"), None);
    }
}

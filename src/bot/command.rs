/* Text commands.
 * A command is any message starting with the configured prefix.
 * The first word, lowercased, selects exactly one entry of the command table.
 */

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Command {
    Help,
    SetUser,
    Set,
    Bal,
    SetMaintenance,
    Info,
    AddBal,
    AddSaldo,
    AddProduct,
    AddStock,
    Stock,
    Buy,
    ChangePrice,
    ChangeRp,
    ChangeName,
    Remove,
    Depo,
    ChangeWorld,
    Send,
}

const COMMAND_TABLE: &[(&str, Command)] = &[
    ("help", Command::Help),
    ("setuser", Command::SetUser),
    ("set", Command::Set),
    ("bal", Command::Bal),
    ("setmt", Command::SetMaintenance),
    ("info", Command::Info),
    ("addbal", Command::AddBal),
    ("addsaldo", Command::AddSaldo),
    ("addp", Command::AddProduct),
    ("adds", Command::AddStock),
    ("stock", Command::Stock),
    ("buy", Command::Buy),
    ("changeprice", Command::ChangePrice),
    ("changerp", Command::ChangeRp),
    ("changename", Command::ChangeName),
    ("remove", Command::Remove),
    ("depo", Command::Depo),
    ("changeworld", Command::ChangeWorld),
    ("send", Command::Send),
];

impl Command {
    pub fn from_name(name: &str) -> Option<Command> {
        COMMAND_TABLE
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, command)| *command)
    }

    pub fn name(&self) -> &'static str {
        COMMAND_TABLE
            .iter()
            .find(|(_, command)| command == self)
            .map(|(entry, _)| *entry)
            .unwrap_or("unknown")
    }
}

// A prefixed message split into its command word and arguments.
#[derive(Debug, PartialEq, Clone)]
pub struct CommandLine {
    // Lowercased first word, possibly not a known command.
    pub name: String,
    pub args: Vec<String>,
}

impl CommandLine {
    // None if the text does not start with the prefix.
    pub fn parse(text: &str, prefix: &str) -> Option<CommandLine> {
        let rest = text.strip_prefix(prefix)?;
        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or("").to_lowercase();

        Some(CommandLine {
            name,
            args: words.map(str::to_string).collect(),
        })
    }

    pub fn command(&self) -> Option<Command> {
        Command::from_name(&self.name)
    }
}

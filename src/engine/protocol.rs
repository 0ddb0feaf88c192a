//! Commands of the text protocol the engine speaks. It follows the shape of
//! [UCCI] (the Xiangqi flavour of UCI) and adds a few commands for playing a
//! game interactively.
//!
//! [UCCI]: https://www.xqbase.com/protocol/cchess_ucci.htm

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    Ucci,
    IsReady,
    SetOption {
        option: EngineOption,
        value: OptionValue,
    },
    NewGame,
    SetPosition {
        fen: Option<String>,
        moves: Vec<String>,
    },
    Move(String),
    Go,
    Play,
    Display,
    Moves,
    Eval,
    Quit,
    Unknown(String),
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum EngineOption {
    Seed,
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum OptionValue {
    Integer(u64),
}

fn parse_setoption(parts: &[&str]) -> Command {
    if parts.len() > 3 && parts[1] == "name" {
        let name_end = parts
            .iter()
            .position(|&x| x == "value")
            .unwrap_or(parts.len());
        let option = parts[2..name_end].join(" ");
        let option = match option.to_ascii_lowercase().as_str() {
            "seed" => EngineOption::Seed,
            _ => return Command::Unknown(parts.join(" ")),
        };
        let value = parts
            .get(name_end + 1)
            .and_then(|value| value.parse::<u64>().ok())
            .map(OptionValue::Integer);
        match value {
            Some(value) => Command::SetOption { option, value },
            None => Command::Unknown(parts.join(" ")),
        }
    } else {
        Command::Unknown(parts.join(" "))
    }
}

fn parse_setposition(parts: &[&str]) -> Command {
    let moves_index = parts.iter().position(|&x| x == "moves");
    let fen = match parts.get(1) {
        Some(&"startpos") => None,
        Some(&"fen") => Some(parts[2..moves_index.unwrap_or(parts.len())].join(" ")),
        _ => return Command::Unknown(parts.join(" ")),
    };
    let moves = moves_index.map_or_else(Vec::new, |index| {
        parts[index + 1..].iter().map(ToString::to_string).collect()
    });
    Command::SetPosition { fen, moves }
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();

        let Some(&command) = parts.first() else {
            return Self::Unknown(input.to_string());
        };

        match command {
            "ucci" | "uci" => Self::Ucci,
            "isready" => Self::IsReady,
            "setoption" => parse_setoption(&parts),
            "newgame" | "ucinewgame" => Self::NewGame,
            "position" => parse_setposition(&parts),
            "move" if parts.len() == 2 => Self::Move(parts[1].to_string()),
            "go" => Self::Go,
            "play" => Self::Play,
            "d" => Self::Display,
            "moves" => Self::Moves,
            "eval" => Self::Eval,
            "quit" => Self::Quit,
            _ => Self::Unknown(input.trim().to_string()),
        }
    }
}

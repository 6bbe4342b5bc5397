use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sweeper_core::*;

const NO_GAME: &str = "No game in progress, start one with `new <width> <height> <mines>`";

/// One line of input typed into the session.
#[derive(Parser, Debug, PartialEq)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct Line {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Start a new game
    New(NewArgs),
    /// Click a cell: reveal it and cascade through every neighbor that follows from the numbers, or hide it again if
    /// it is already revealed
    Reveal(CellArgs),
    /// Reveal a single cell, flood-filling empty regions
    Open(CellArgs),
    /// Cascade from a revealed number whose mines are all flagged
    Chord(CellArgs),
    /// Toggle a flag on a hidden cell
    Flag(CellArgs),
    /// Print the board
    Show {
        /// Print a JSON snapshot instead of the grid
        #[arg(long)]
        json: bool,
    },
    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Args, Debug, PartialEq)]
pub struct NewArgs {
    /// Board width
    #[arg(required_unless_present = "preset")]
    width: Option<Dim>,
    /// Board height
    #[arg(required_unless_present = "preset")]
    height: Option<Dim>,
    /// Number of mines
    #[arg(required_unless_present_any = ["preset", "percent"], conflicts_with = "percent")]
    mines: Option<CellCount>,
    /// Mine density in percent of all cells, instead of a mine count
    #[arg(short, long)]
    percent: Option<u8>,
    /// Use a standard board instead of explicit dimensions
    #[arg(long, value_enum, conflicts_with_all = ["width", "height", "mines", "percent"])]
    preset: Option<Preset>,
}

impl NewArgs {
    pub fn configuration(&self) -> Result<Configuration> {
        if let Some(preset) = self.preset {
            return Ok(preset.configuration());
        }
        let (Some(width), Some(height)) = (self.width, self.height) else {
            bail!("width and height are required");
        };

        Ok(match (self.mines, self.percent) {
            (_, Some(percent)) => Configuration::from_percentage(width, height, percent)?,
            (Some(mines), None) => Configuration::new(width, height, mines)?,
            (None, None) => bail!("either a mine count or --percent is required"),
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, ValueEnum)]
pub enum Preset {
    Beginner,
    Intermediate,
    Expert,
}

impl Preset {
    pub fn configuration(self) -> Configuration {
        match self {
            Self::Beginner => Configuration::beginner(),
            Self::Intermediate => Configuration::intermediate(),
            Self::Expert => Configuration::expert(),
        }
    }
}

#[derive(Args, Debug, PartialEq)]
pub struct CellArgs {
    /// Row, counted from the top starting at 0
    #[arg(allow_negative_numbers = true)]
    row: Coord,
    /// Column, counted from the left starting at 0
    #[arg(allow_negative_numbers = true)]
    col: Coord,
}

impl CellArgs {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.row, self.col)
    }
}

#[derive(Debug, PartialEq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// A single game session driven by text commands.
pub struct Session {
    engine: Engine,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self {
            engine: Engine::with_seed(seed),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Parses and runs one input line. Usage problems are reported as output, game errors as `Err`.
    pub fn execute_line(&mut self, line: &str) -> Result<Flow> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(Flow::Continue(String::new()));
        }

        match Line::try_parse_from(words) {
            Ok(Line { command }) => self.execute(command),
            Err(err) => Ok(Flow::Continue(err.render().to_string())),
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::New(args) => {
                let config = args.configuration()?;
                self.engine.start_new_game(config);
            }
            Command::Reveal(cell) => {
                let outcome = self.engine.handle_cell_click(cell.coordinate())?;
                log::debug!("reveal {} -> {:?}", cell.coordinate(), outcome);
            }
            Command::Open(cell) => {
                let outcome = self.engine.reveal_cell(cell.coordinate())?;
                log::debug!("open {} -> {:?}", cell.coordinate(), outcome);
            }
            Command::Chord(cell) => {
                let outcome = self.engine.chord(cell.coordinate())?;
                log::debug!("chord {} -> {:?}", cell.coordinate(), outcome);
            }
            Command::Flag(cell) => {
                let outcome = self.engine.toggle_flag(cell.coordinate())?;
                log::debug!("flag {} -> {:?}", cell.coordinate(), outcome);
            }
            Command::Show { json: true } => {
                let output = match BoardSnapshot::from_engine(&self.engine) {
                    Some(snapshot) => serde_json::to_string_pretty(&snapshot)? + "\n",
                    None => format!("{NO_GAME}\n"),
                };
                return Ok(Flow::Continue(output));
            }
            Command::Show { json: false } => {}
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue(self.render()))
    }

    pub fn render(&self) -> String {
        let Some(snapshot) = BoardSnapshot::from_engine(&self.engine) else {
            return format!("{NO_GAME}\n");
        };

        let status = match snapshot.lifecycle {
            Lifecycle::NotStarted => "Not started.",
            Lifecycle::InProgress => "In progress.",
            Lifecycle::Won => "You won!",
            Lifecycle::Lost => "Boom! You hit a mine.",
        };
        format!("{snapshot}{status} Mines left: {}\n", snapshot.mines_left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Line::try_parse_from(line.split_whitespace()).unwrap().command
    }

    #[test]
    fn parses_explicit_new_game() {
        let Command::New(args) = parse("new 9 9 10") else {
            panic!("expected new");
        };
        assert_eq!(args.configuration().unwrap(), Configuration::new(9, 9, 10).unwrap());
    }

    #[test]
    fn parses_percentage_and_preset() {
        let Command::New(args) = parse("new 10 10 --percent 15") else {
            panic!("expected new");
        };
        assert_eq!(args.configuration().unwrap().mine_count(), 15);

        let Command::New(args) = parse("new --preset expert") else {
            panic!("expected new");
        };
        assert_eq!(args.configuration().unwrap(), Configuration::expert());
    }

    #[test]
    fn new_game_needs_mine_count() {
        assert!(Line::try_parse_from("new 10 10".split_whitespace()).is_err());
        assert!(Line::try_parse_from("new 10 10 5 --percent 3".split_whitespace()).is_err());
    }

    #[test]
    fn parses_negative_coordinates() {
        assert_eq!(
            parse("reveal -1 2"),
            Command::Reveal(CellArgs { row: -1, col: 2 })
        );
        assert_eq!(parse("flag 3 4"), Command::Flag(CellArgs { row: 3, col: 4 }));
    }

    #[test]
    fn first_reveal_is_safe() {
        for seed in 0..20 {
            let mut session = Session::new(seed);
            session.execute_line("new 9 9 10").unwrap();
            session.execute_line("reveal 4 4").unwrap();
            assert_ne!(session.engine().lifecycle(), Lifecycle::Lost);
            assert!(session.engine().revealed_count() >= 1);
        }
    }

    #[test]
    fn game_errors_are_returned() {
        let mut session = Session::new(0);

        let err = session.execute_line("new 4 10 5").unwrap_err();
        assert_eq!(
            err.downcast_ref::<GameError>(),
            Some(&GameError::InvalidDimensions { width: 4, height: 10 })
        );

        session.execute_line("new 10 10 10").unwrap();
        let err = session.execute_line("reveal 5 10").unwrap_err();
        assert_eq!(
            err.downcast_ref::<GameError>(),
            Some(&GameError::OutOfBounds(Coordinate::new(5, 10)))
        );
    }

    #[test]
    fn usage_errors_are_printed() {
        let mut session = Session::new(0);
        let Flow::Continue(output) = session.execute_line("dance").unwrap() else {
            panic!("expected output");
        };
        assert!(output.contains("dance"));
    }

    #[test]
    fn show_renders_grid_and_json() {
        let mut session = Session::new(7);
        assert_eq!(
            session.execute_line("show").unwrap(),
            Flow::Continue(format!("{NO_GAME}\n"))
        );

        session.execute_line("new 5 6 3").unwrap();
        let Flow::Continue(grid) = session.execute_line("show").unwrap() else {
            panic!("expected output");
        };
        assert!(grid.starts_with(".....\n"));
        assert!(grid.contains("In progress. Mines left: 3"));

        let Flow::Continue(json) = session.execute_line("show --json").unwrap() else {
            panic!("expected output");
        };
        let snapshot: BoardSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!((snapshot.width, snapshot.height), (5, 6));
    }

    #[test]
    fn blank_lines_and_quit() {
        let mut session = Session::new(0);
        assert_eq!(session.execute_line("   ").unwrap(), Flow::Continue(String::new()));
        assert_eq!(session.execute_line("quit").unwrap(), Flow::Quit);
        assert_eq!(session.execute_line("exit").unwrap(), Flow::Quit);
    }
}

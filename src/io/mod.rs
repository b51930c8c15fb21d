//! IO utilities for loading the player table.

pub mod players_csv;

pub use players_csv::{
    read_players_csv, read_players_csv_with_config, read_players_from_reader, PlayersData,
    PlayersReaderConfig,
};

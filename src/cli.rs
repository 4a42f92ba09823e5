use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "matchvault")]
#[command(version)]
#[command(about = "Fetch and archive League of Legends match history")]
#[command(
    long_about = "Matchvault resolves a player's Riot ID, fetches their recent \
matches through the rate-limited Riot API and archives them in a local SQLite \
database. Re-running a fetch only downloads what is missing; stored tables can \
be exported to CSV."
)]
pub struct Cli {
    /// Platform region code (na1, euw1, kr, ...) or its short alias (na, euw)
    #[arg(long, global = true, default_value = "na1")]
    pub region: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch and store match history for a player
    Fetch {
        /// Riot ID in Name#Tag form
        riot_id: String,

        /// Number of matches to fetch, 1 to 100
        #[arg(long, default_value_t = 20)]
        matches: u8,

        /// Queue id filter (e.g. 420 for Ranked Solo/Duo)
        #[arg(long)]
        queue: Option<u16>,

        /// Store every participant of each match, not only the queried player
        #[arg(long)]
        all_participants: bool,

        /// Re-fetch matches that are already stored
        #[arg(long)]
        force_update: bool,

        /// Also fetch and store each match's timeline
        #[arg(long)]
        timeline: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Export stored tables to CSV
    Export {
        #[command(subcommand)]
        target: ExportTarget,
    },
}

#[derive(Subcommand)]
pub enum DbAction {
    /// Create the database schema
    Init,
    /// Show row counts per table
    Stats,
    /// Drop and recreate every table. Deletes all data
    Reset {
        /// Skip the safety check
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ExportTarget {
    /// Export every table
    All {
        #[arg(long, default_value = "exports")]
        output_dir: String,
    },
    /// Export one table (players, matches, teams, participants, timelines)
    Table {
        table: String,
        #[arg(long, default_value = "exports")]
        output_dir: String,
    },
    /// Export one match with all its rows joined
    Match {
        match_id: String,
        #[arg(long, default_value = "match_exports")]
        output_dir: String,
    },
}

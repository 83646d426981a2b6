use clap::Parser;

/// Checks how far the setup of an election has progressed.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The JSON file holding the election setup. A missing file is treated as a new,
    /// empty election.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, 'stdout' or empty) Where the progress report is written in JSON format.
    /// Defaults to the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference progress report in JSON format. If provided, astris-setup
    /// will check that the computed report matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (stage key) The tab explicitly selected by the user: basic, timing, candidates,
    /// trustees, registrar or genesis. If not specified, the first incomplete stage is selected.
    #[clap(long, value_parser)]
    pub tab: Option<String>,

    /// Do not check that the candidates have a name.
    #[clap(long, takes_value = false)]
    pub lenient_candidate_names: bool,

    /// Rewrite the setup file in its canonical form (creating it if it is missing).
    #[clap(long, takes_value = false)]
    pub save: bool,

    /// (prefix) Lists the time zones starting with the prefix, and exits.
    #[clap(long, value_parser)]
    pub zones: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}

use clap::{App, Arg, ArgMatches};

#[derive(Debug)]
pub struct LsOptions {
    pub paths: Vec<String>,
    pub long_format: bool,
    pub show_hidden: bool,
    pub recursive: bool,
    pub human_readable: bool,
}

fn parse_opts<'a>() -> ArgMatches<'a> {
    App::new("rls")
        .version("0.1.0")
        .about("List files")
        // clap claims -h by default; we need it for human-readable sizes,
        // so help stays reachable through --help only.
        .help_short("?")
        .arg(Arg::with_name("ALL")
            .short("a")
            .help("Do not ignore entries starting with ."))
        .arg(Arg::with_name("LONG")
            .short("l")
            .help("Use a long listing format"))
        .arg(Arg::with_name("RECURSIVE")
            .short("R")
            .help("List subdirectories recursively"))
        .arg(Arg::with_name("HUMAN")
            .short("h")
            .help("With -l, print sizes like 1.0K 2.3M"))
        .arg(Arg::with_name("ONE")
            .short("1")
            .help("List one file per line (this is the default)"))
        .arg(Arg::with_name("PATHS")
            .help("Paths to list")
            .multiple(true)
            .default_value("."))
        .get_matches()
}

pub fn parse_cli() -> LsOptions {
    let matches = parse_opts();

    LsOptions {
        paths: matches.values_of("PATHS").unwrap_or_default().map(String::from).collect(),
        long_format: matches.is_present("LONG"),
        show_hidden: matches.is_present("ALL"),
        recursive: matches.is_present("RECURSIVE"),
        human_readable: matches.is_present("HUMAN"),
    }
}

use clap::Parser;
use scriptorium::{
    Config,
    Library,
    ScrollId,
    cli::{Cli, Command},
    error,
    search,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("SCRIPTORIUM_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Command::Completions(args) = &cli.command {
        args.generate();
        return Ok(());
    }

    let mut config =
        Config::resolve(cli.data_dir.as_deref(), cli.library.as_deref())?;
    if let Command::Search(args) = &cli.command
        && let Some(max_results) = args.max_results
    {
        config = config.with_max_results(max_results);
    }
    tracing::debug!(
        data_dir = %config.data_dir().display(),
        library = %config.knowledge_dir().display(),
        max_results = config.max_results,
        "resolved configuration"
    );
    let library = Library::new(config);

    match cli.command {
        Command::Update(args) => {
            let report = library.update_index()?;
            if args.json {
                println!("{}", serde_json::to_string(&report)?);
            } else {
                println!("{report}");
            }
        }
        Command::Remove(args) => {
            for id in &args.ids {
                library.remove_from_index(&ScrollId::new(id.as_str()))?;
                println!("Removed '{id}'");
            }
        }
        Command::Search(args) => {
            let query = args.query_string();
            let results = library.search(&query)?;
            if args.json {
                println!("{}", search::render_json(&results, &query)?);
            } else {
                print!("{}", search::render_human(&results));
            }
        }
        Command::Stats(args) => {
            let stats = library.statistics()?;
            if args.json {
                println!("{}", serde_json::to_string(&stats)?);
            } else {
                println!("{stats}");
            }
        }
        Command::Show(args) => {
            let scroll = library.load_scroll(&ScrollId::new(args.id))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&scroll)?);
            } else {
                print_scroll(&scroll);
            }
        }
        Command::Completions(_) => unreachable!("handled above"),
    }

    Ok(())
}

fn print_scroll(scroll: &scriptorium::Scroll) {
    println!("id: {}", scroll.id);
    if !scroll.scroll_type.is_empty() {
        println!("type: {}", scroll.scroll_type);
    }
    if !scroll.tags.is_empty() {
        println!("tags: {}", scroll.tags.join(", "));
    }
    if !scroll.hidden.is_empty() {
        println!("hidden: {}", scroll.hidden.join(", "));
    }
    for source in &scroll.source_lines {
        println!("source: {source}");
    }
    for line in &scroll.other_lines {
        println!("other: {line}");
    }
    println!("\n{}", scroll.content);
}

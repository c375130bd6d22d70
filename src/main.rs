//! CLI driver (external boundary, §6): `make_base` compiles an input
//! envelope on stdin into a persisted binary artifact; `process_requests`
//! loads that artifact and answers `stat_requests` on stdout. All state is
//! built once per invocation and never mutated afterward (§5).

use std::io::{self, Read, Write};
use std::time::Instant;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::info;

use transit_catalogue::catalog::Catalog;
use transit_catalogue::error::Error;
use transit_catalogue::{persistence, protocol, router::Router, transit};

#[derive(Parser, Debug)]
#[command(name = "transit_catalogue", about = "Offline transport-catalog query engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reads base/render/routing/serialization settings on stdin, builds the
    /// catalog and routing tables, and writes the binary artifact.
    #[command(name = "make_base")]
    MakeBase,
    /// Reads serialization settings and stat requests on stdin, loads the
    /// artifact, and writes JSON responses to stdout.
    #[command(name = "process_requests")]
    ProcessRequests,
}

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let result = run();

    if let Err(err) = result {
        eprintln!("transit_catalogue: {err}");
        std::process::exit(1);
    }
}

/// Parses argv and dispatches to the chosen subcommand. A missing or
/// unrecognized subcommand is reported with the same usage message and
/// exit code 1 as the original's `PrintUsage`/`return 1` (`--help`/
/// `--version` still get clap's own output and exit code).
fn run() -> Result<(), Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit();
        }
        Err(_) => return Err(Error::Usage),
    };

    match cli.command {
        Command::MakeBase => make_base(),
        Command::ProcessRequests => process_requests(),
    }
}

fn read_stdin() -> Result<String, Error> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

fn make_base() -> Result<(), Error> {
    let input = read_stdin()?;
    let envelope = protocol::decode_envelope(&input)?;

    let mut catalog = Catalog::new();
    protocol::fill_catalog(&mut catalog, &envelope.base_requests)?;
    info!(stops = catalog.stops().len(), buses = catalog.buses().len(), "ingested base requests");
    tracing::debug!("{}", catalog.fmt_debug());

    let graph = transit::build_graph(&catalog, &envelope.routing_settings)?;
    info!(edges = graph.edge_count(), "built transit graph");

    let precompute_start = Instant::now();
    let router = Router::new(&graph)?;
    info!(elapsed = ?precompute_start.elapsed(), "all-pairs precompute finished");

    if let Some(serialization_settings) = &envelope.serialization_settings {
        persistence::save(
            &serialization_settings.file,
            &catalog,
            &envelope.render_settings,
            &envelope.routing_settings,
            &graph,
            router.table(),
        )?;
        info!(path = %serialization_settings.file.display(), "wrote artifact");
    }

    Ok(())
}

fn process_requests() -> Result<(), Error> {
    let input = read_stdin()?;
    let (serialization_settings, stat_requests) = protocol::decode_process_requests(&input)?;

    let artifact = match &serialization_settings {
        Some(settings) => persistence::load(&settings.file),
        None => persistence::Artifact::default(),
    };

    let catalog = persistence::from_catalog_section(artifact.catalog);
    let graph = persistence::from_graph_section(artifact.graph);
    let router = persistence::router_from_table(&graph, artifact.router_table);

    let response = protocol::process_stat_requests(
        &catalog,
        &artifact.render_settings,
        &graph,
        &router,
        artifact.routing_settings.bus_wait_time as f64,
        &stat_requests,
    )?;
    info!(requests = stat_requests.len(), "served stat requests");

    io::stdout().write_all(response.as_bytes())?;
    Ok(())
}

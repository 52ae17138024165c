//! # go-enrich
//!
//! Command line interface for a Gene Ontology enrichment run.
//!
//! ```bash
//! go-enrich target.txt background.txt go_terms.txt go_edges.txt gene_to_go.txt
//!
//! # parent-child method with a more lenient FDR, written to a file
//! go-enrich -m parent-child-union --base-fdr 0.05 -o significant.txt \
//!     target.txt background.txt go_terms.txt go_edges.txt gene_to_go.txt
//! ```
//!
//! The significant GO terms are written one per line, ascending by p-value.
//! Nothing is written if the run fails.

use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{error, LevelFilter};
use simple_logger::SimpleLogger;

use go_enrich::pipeline::{go_enrichment, write_terms, EnrichmentInput};
use go_enrich::{EnrichmentConfig, EnrichmentMethod, GoError, GoResult};

const INPUTS: [(&str, &str); 5] = [
    ("target", "Target genes, one per line"),
    ("background", "Background genes, one per line"),
    ("terms", "GO terms, one per line"),
    ("edges", "GO term edges, `child<TAB>parent` per line"),
    ("mapping", "Gene annotations, `gene<TAB>term` per line"),
];

fn command() -> Command {
    let mut cmd = Command::new("go-enrich")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Gene Ontology enrichment analysis");
    for (name, help) in INPUTS {
        cmd = cmd.arg(Arg::new(name).value_name("FILE").required(true).help(help));
    }
    cmd.arg(
        Arg::new("method")
            .short('m')
            .long("method")
            .value_name("METHOD")
            .help("independent, parent-child-union or parent-child-intersection")
            .value_parser(value_parser!(EnrichmentMethod))
            .default_value("independent"),
    )
    .arg(
        Arg::new("base-fdr")
            .long("base-fdr")
            .value_name("FDR")
            .help("False discovery rate of the step-up correction [default: 0.01]")
            .value_parser(value_parser!(f64)),
    )
    .arg(
        Arg::new("min-genes-per-node")
            .long("min-genes-per-node")
            .value_name("N")
            .help("Terms with fewer genes are not tested [default: 1]")
            .value_parser(value_parser!(usize)),
    )
    .arg(
        Arg::new("output")
            .short('o')
            .long("output")
            .value_name("FILE")
            .help("Output file (default: stdout)"),
    )
    .arg(
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .help("Log progress, use twice for debug output"),
    )
}

fn config(matches: &ArgMatches) -> EnrichmentConfig {
    let mut config = EnrichmentConfig::default();
    if let Some(method) = matches.get_one::<EnrichmentMethod>("method") {
        config = config.with_method(*method);
    }
    if let Some(fdr) = matches.get_one::<f64>("base-fdr") {
        config = config.with_base_fdr(*fdr);
    }
    if let Some(min_genes) = matches.get_one::<usize>("min-genes-per-node") {
        config = config.with_min_genes_per_node(*min_genes);
    }
    config
}

fn run(matches: &ArgMatches) -> GoResult<()> {
    let path = |name: &str| {
        matches
            .get_one::<String>(name)
            .map(String::as_str)
            .unwrap_or_default()
    };
    let input = EnrichmentInput::from_files(
        path("target"),
        path("background"),
        path("terms"),
        path("edges"),
        path("mapping"),
    )?;

    // only create the output once the run succeeded
    let significant = go_enrichment(&input, &config(matches))?;

    if let Some(output) = matches.get_one::<String>("output") {
        let file = File::create(output)
            .map_err(|err| GoError::CannotWrite(format!("{output}: {err}")))?;
        write_terms(&significant, BufWriter::new(file))
    } else {
        write_terms(&significant, BufWriter::new(io::stdout().lock()))
    }
}

fn main() -> ExitCode {
    let matches = command().get_matches();

    let level = match matches.get_count("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if let Err(err) = SimpleLogger::new().with_level(level).init() {
        eprintln!("unable to initialize logging: {err}");
    }

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn verify_command() {
        command().debug_assert();
    }

    #[test]
    fn parse_options() {
        let matches = command().get_matches_from([
            "go-enrich",
            "-m",
            "parent-child-intersection",
            "--base-fdr",
            "0.05",
            "t",
            "b",
            "g",
            "e",
            "m",
        ]);
        let config = config(&matches);
        assert_eq!(config.method(), EnrichmentMethod::ParentChildIntersection);
        assert!((config.base_fdr() - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.min_genes_per_node(), 1);
    }

    fn output_path(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("go-enrich-{}-{name}", std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    fn run_with(options: &[&str], edges: &str) -> GoResult<()> {
        let mut args = vec!["go-enrich"];
        args.extend_from_slice(options);
        args.extend_from_slice(&[
            "tests/data/target.txt",
            "tests/data/background.txt",
            "tests/data/go_terms.txt",
            edges,
            "tests/data/gene_to_go.txt",
        ]);
        run(&command().get_matches_from(args))
    }

    #[test]
    fn malformed_input_writes_nothing() {
        let path = output_path("malformed.txt");
        let output = path.to_str().unwrap();
        let res = run_with(&["-o", output], "tests/data/malformed_edges.txt");
        assert!(matches!(res, Err(GoError::MalformedLine { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn no_significant_terms_writes_nothing() {
        let path = output_path("none.txt");
        let output = path.to_str().unwrap();
        let res = run_with(
            &["-m", "parent-child-union", "-o", output],
            "tests/data/go_edges.txt",
        );
        assert!(matches!(res, Err(GoError::NoSignificantTerms)));
        assert!(!path.exists());
    }

    #[test]
    fn successful_run_writes_terms() {
        let path = output_path("significant.txt");
        let output = path.to_str().unwrap();
        run_with(&["-o", output], "tests/data/go_edges.txt").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(content, "GO:0044237\nGO:0009987\n");
    }

    #[test]
    fn unknown_method() {
        let res = command().try_get_matches_from(["go-enrich", "-m", "elim", "t", "b", "g", "e", "m"]);
        assert!(res.is_err());

        let res = command().try_get_matches_from(["go-enrich", "t", "b", "g", "e"]);
        assert!(res.is_err());
    }
}

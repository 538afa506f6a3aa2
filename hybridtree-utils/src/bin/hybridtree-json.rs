use std::convert::TryFrom;
use std::io::{BufWriter, Write};

use clap::{App, Arg};

use hybridtree::io::{
    export_corpus_to_json, Dialect, Enumerator, ExportReader, FormLabeling, PosLabeling,
    ReaderConfig,
};
use hybridtree::{Constituents, HybridDag};
use hybridtree_utils::{init_logging, DEFAULT_CLAP_SETTINGS};
use stdinout::{Input, OrExit, Output};

fn main() {
    init_logging();
    let matches = build().get_matches();

    let dialect = matches.value_of(DIALECT).unwrap();
    let dialect = Dialect::try_from(dialect).or_exit("Can't read dialect.", 1);
    let delimiter = matches.value_of(DELIMITER).unwrap();
    let strip_vroot = matches.is_present(STRIP_VROOT);

    let input = Input::from(matches.value_of(INPUT).map(ToOwned::to_owned));
    let reader = input.buf_read().or_exit("Can't open input reader.", 1);
    let config = ReaderConfig {
        dialect,
        ..ReaderConfig::default()
    };
    let mut dags = ExportReader::<_, HybridDag>::with_config(reader, config)
        .collect::<Result<Vec<_>, _>>()
        .or_exit("Could not read tree.", 1);
    if strip_vroot {
        dags.iter_mut().for_each(Constituents::strip_vroot);
    }

    let mut enumerator = Enumerator::new();
    let corpus = match matches.value_of(LABELING).unwrap() {
        "form" => export_corpus_to_json(&dags, &mut enumerator, &FormLabeling, delimiter),
        _ => export_corpus_to_json(&dags, &mut enumerator, &PosLabeling, delimiter),
    }
    .or_exit("Can't encode corpus.", 1);

    let output = Output::from(matches.value_of(OUTPUT).map(ToOwned::to_owned));
    let mut writer = BufWriter::new(output.write().or_exit("Can't open output writer.", 1));
    serde_json::to_writer(&mut writer, &corpus).or_exit("Can't write to output.", 1);
    writer.flush().or_exit("Can't write to output.", 1);
}

static INPUT: &str = "INPUT";
static OUTPUT: &str = "OUTPUT";
static DIALECT: &str = "DIALECT";
static DELIMITER: &str = "DELIMITER";
static LABELING: &str = "LABELING";
static STRIP_VROOT: &str = "STRIP_VROOT";

fn build<'a, 'b>() -> App<'a, 'b> {
    App::new("hybridtree-json")
        .settings(DEFAULT_CLAP_SETTINGS)
        .version("0.1")
        .about("Encode an export corpus as bihypergraphs.")
        .arg(
            Arg::with_name(INPUT)
                .long("input_file")
                .takes_value(true)
                .help("Input file"),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .long("output_file")
                .takes_value(true)
                .help("Output file"),
        )
        .arg(
            Arg::with_name(DIALECT)
                .long("dialect")
                .takes_value(true)
                .possible_values(&["standard", "disco-dop"])
                .default_value("standard")
                .help("Column layout of the input"),
        )
        .arg(
            Arg::with_name(LABELING)
                .long("labeling")
                .takes_value(true)
                .possible_values(&["form", "pos"])
                .default_value("pos")
                .help("Label terminals by form or part of speech"),
        )
        .arg(
            Arg::with_name(DELIMITER)
                .long("delimiter")
                .takes_value(true)
                .default_value(" : ")
                .help("Delimiter between SECEDGE and the edge label"),
        )
        .arg(
            Arg::with_name(STRIP_VROOT)
                .long("strip_vroot")
                .help("Remove VROOT nodes before encoding"),
        )
}

use std::convert::TryFrom;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{App, Arg};
use failure::Error;
use tracing::{info, warn};

use hybridtree::folds::{ten_folds, train_test};
use hybridtree::io::{Dialect, ExportReader, ExportWriter, ReaderConfig, WriterConfig};
use hybridtree::{HybridDag, SentenceLine, WriteTree};
use hybridtree_utils::{init_logging, DEFAULT_CLAP_SETTINGS};
use stdinout::{Input, OrExit};

// version of the export format if neither the input nor the options declare one
const DEFAULT_FORMAT: u32 = 4;

fn main() {
    init_logging();
    let matches = build().get_matches();

    let in_dialect = matches.value_of(IN_DIALECT).unwrap();
    let in_dialect = Dialect::try_from(in_dialect).or_exit("Can't read input dialect.", 1);
    let out_dialect = matches.value_of(OUT_DIALECT).unwrap();
    let out_dialect = Dialect::try_from(out_dialect).or_exit("Can't read output dialect.", 1);
    let max_length = matches
        .value_of(MAX_LENGTH)
        .map(|max_length| max_length.parse::<usize>())
        .transpose()
        .or_exit("Can't parse maximum length.", 1);
    let format = matches
        .value_of(FORMAT)
        .map(|format| format.parse::<u32>())
        .transpose()
        .or_exit("Can't parse format.", 1);
    let prefix = PathBuf::from(matches.value_of(OUT_PREFIX).unwrap_or(""));

    let input = Input::from(matches.value_of(INPUT).map(ToOwned::to_owned));
    let reader = input.buf_read().or_exit("Can't open input reader.", 1);
    let config = ReaderConfig {
        dialect: in_dialect,
        disconnect_punctuation: false,
        ..ReaderConfig::default()
    };
    let mut reader = ExportReader::<_, HybridDag>::with_config(reader, config);
    let trees = reader
        .by_ref()
        .collect::<Result<Vec<_>, _>>()
        .or_exit("Could not read tree.", 1);
    let format = format.or_else(|| reader.format()).unwrap_or_else(|| {
        warn!("No #FORMAT line in the input, using {}", DEFAULT_FORMAT);
        DEFAULT_FORMAT
    });
    info!(
        n_trees = trees.len(),
        skipped = reader.skipped_lines(),
        "read corpus"
    );

    for (fold, range) in ten_folds(trees.len()).iter().enumerate() {
        let (train, test) = train_test(&trees, range);
        let test = test
            .into_iter()
            .filter(|tree| {
                max_length
                    .map(|max_length| tree.full_yield().len() <= max_length)
                    .unwrap_or(true)
            })
            .collect::<Vec<_>>();
        let config = WriterConfig {
            dialect: out_dialect,
            use_sentence_names: true,
            format: Some(format),
            ..WriterConfig::default()
        };
        write_fold(&prefix, "train", fold, &train, config.clone())
            .or_exit("Can't write training fold.", 1);
        write_fold(&prefix, "test", fold, &test, config).or_exit("Can't write test fold.", 1);
    }
}

fn write_fold(
    prefix: &Path,
    name: &str,
    fold: usize,
    trees: &[&HybridDag],
    config: WriterConfig,
) -> Result<(), Error> {
    let export = File::create(prefix.join(format!("{}-{}.export", name, fold)))?;
    let mut writer = ExportWriter::with_config(BufWriter::new(export), config);
    for &tree in trees {
        writer.write_tree(tree)?;
    }
    writer.finish()?.flush()?;

    let sentences = File::create(prefix.join(format!("{}-{}.sent", name, fold)))?;
    let mut sentences = BufWriter::new(sentences);
    for tree in trees {
        let line = SentenceLine::from_tree(tree.sent_label().unwrap_or(""), tree);
        writeln!(sentences, "{}", line)?;
    }
    sentences.flush()?;
    Ok(())
}

static INPUT: &str = "INPUT";
static IN_DIALECT: &str = "IN_DIALECT";
static OUT_DIALECT: &str = "OUT_DIALECT";
static OUT_PREFIX: &str = "OUT_PREFIX";
static MAX_LENGTH: &str = "MAX_LENGTH";
static FORMAT: &str = "FORMAT";

fn build<'a, 'b>() -> App<'a, 'b> {
    App::new("hybridtree-tfcv")
        .settings(DEFAULT_CLAP_SETTINGS)
        .version("0.1")
        .about("Split an export corpus into ten folds for cross-validation.")
        .arg(Arg::with_name(INPUT).help("Input file"))
        .arg(
            Arg::with_name(IN_DIALECT)
                .long("input_dialect")
                .takes_value(true)
                .possible_values(&["standard", "disco-dop"])
                .default_value("standard")
                .help("Column layout of the input"),
        )
        .arg(
            Arg::with_name(OUT_DIALECT)
                .long("output_dialect")
                .takes_value(true)
                .possible_values(&["standard", "disco-dop"])
                .default_value("standard")
                .help("Column layout of the folds"),
        )
        .arg(
            Arg::with_name(OUT_PREFIX)
                .long("out_prefix")
                .takes_value(true)
                .help("Directory to put the folds into"),
        )
        .arg(
            Arg::with_name(MAX_LENGTH)
                .long("max_length")
                .takes_value(true)
                .help("Maximum number of tokens of test sentences"),
        )
        .arg(
            Arg::with_name(FORMAT)
                .long("format")
                .takes_value(true)
                .help("Version in the #FORMAT line, defaults to the version of the input"),
        )
}

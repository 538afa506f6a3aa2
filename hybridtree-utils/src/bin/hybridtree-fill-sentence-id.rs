use std::collections::{HashMap, VecDeque};
use std::convert::TryFrom;
use std::io::{BufWriter, Write};

use clap::{App, Arg};
use failure::format_err;

use hybridtree::io::{Dialect, ExportReader, ExportWriter, ReaderConfig, WriterConfig};
use hybridtree::{HybridDag, WriteTree};
use hybridtree_utils::{init_logging, read_sentences, DEFAULT_CLAP_SETTINGS};
use stdinout::{Input, OrExit, Output};

fn main() {
    init_logging();
    let matches = build().get_matches();

    let dialect = matches.value_of(DIALECT).unwrap();
    let dialect = Dialect::try_from(dialect).or_exit("Can't read dialect.", 1);

    // sentences with identical words are assigned in the order of the sentence file
    let mut ids: HashMap<Vec<String>, VecDeque<String>> = HashMap::new();
    for sentence in read_sentences(matches.value_of(SENTENCES).unwrap())
        .or_exit("Can't read sentence file.", 1)
    {
        let words = sentence.forms().into_iter().map(ToOwned::to_owned).collect();
        ids.entry(words)
            .or_insert_with(VecDeque::new)
            .push_back(sentence.id().to_owned());
    }

    let input = Input::from(matches.value_of(INPUT).map(ToOwned::to_owned));
    let reader = input.buf_read().or_exit("Can't open input reader.", 1);
    let config = ReaderConfig {
        dialect,
        disconnect_punctuation: false,
        ..ReaderConfig::default()
    };
    let output = Output::from(matches.value_of(OUTPUT).map(ToOwned::to_owned));
    let writer = BufWriter::new(output.write().or_exit("Can't open output writer.", 1));
    let config_out = WriterConfig {
        dialect,
        use_sentence_names: true,
        ..WriterConfig::default()
    };
    let mut writer = ExportWriter::with_config(writer, config_out);

    for tree in ExportReader::<_, HybridDag>::with_config(reader, config) {
        let mut tree = tree.or_exit("Could not read tree.", 1);
        let words = tree
            .full_token_yield()
            .into_iter()
            .map(|token| token.form().unwrap_or("").to_owned())
            .collect::<Vec<_>>();
        let id = ids
            .get_mut(&words)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| format_err!("No sentence id left for: {}", words.join(" ")))
            .or_exit("Can't name tree.", 1);
        tree.set_sent_label(id);
        writer.write_tree(&tree).or_exit("Can't write to output.", 1);
    }
    writer
        .finish()
        .or_exit("Can't write to output.", 1)
        .flush()
        .or_exit("Can't write to output.", 1);
}

static SENTENCES: &str = "SENTENCES";
static INPUT: &str = "INPUT";
static OUTPUT: &str = "OUTPUT";
static DIALECT: &str = "DIALECT";

fn build<'a, 'b>() -> App<'a, 'b> {
    App::new("hybridtree-fill-sentence-id")
        .settings(DEFAULT_CLAP_SETTINGS)
        .version("0.1")
        .about("Name predicted trees by the id of the sentence with the same words.")
        .arg(
            Arg::with_name(SENTENCES)
                .required(true)
                .help("Sentence file"),
        )
        .arg(
            Arg::with_name(INPUT)
                .long("input_file")
                .takes_value(true)
                .help("Predicted trees"),
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
                .help("Column layout of input and output"),
        )
}

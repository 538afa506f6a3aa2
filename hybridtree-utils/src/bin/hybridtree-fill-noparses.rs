use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::io::{BufWriter, Write};

use clap::{App, Arg};
use failure::Error;
use tracing::debug;

use hybridtree::io::{Dialect, ExportReader, ExportWriter, ReaderConfig, WriterConfig};
use hybridtree::{noparse_tree, HybridDag, SentenceLine, WriteTree};
use hybridtree_utils::{init_logging, read_sentences, DEFAULT_CLAP_SETTINGS};
use stdinout::{Input, OrExit, Output};

fn main() {
    init_logging();
    let matches = build().get_matches();

    let dialect = matches.value_of(DIALECT).unwrap();
    let dialect = Dialect::try_from(dialect).or_exit("Can't read dialect.", 1);
    let sentences = read_sentences(matches.value_of(SENTENCES).unwrap())
        .or_exit("Can't read sentence file.", 1)
        .into_iter()
        .map(|sentence| -> Result<_, Error> {
            let id = sentence.id().parse::<usize>()?;
            Ok((id, sentence))
        })
        .collect::<Result<BTreeMap<_, _>, Error>>()
        .or_exit("Sentence ids have to be numbers.", 1);

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

    let mut next_id = 0;
    for tree in ExportReader::<_, HybridDag>::with_config(reader, config) {
        let tree = tree.or_exit("Could not read tree.", 1);
        let id = tree
            .sent_label()
            .unwrap_or("")
            .parse::<usize>()
            .or_exit("Sentence ids have to be numbers.", 1);
        if id >= next_id {
            fill(&mut writer, sentences.range(next_id..id))
                .or_exit("Can't write to output.", 1);
            next_id = id + 1;
        }
        writer.write_tree(&tree).or_exit("Can't write to output.", 1);
    }
    fill(&mut writer, sentences.range(next_id..)).or_exit("Can't write to output.", 1);
    writer
        .finish()
        .or_exit("Can't write to output.", 1)
        .flush()
        .or_exit("Can't write to output.", 1);
}

fn fill<'a, W>(
    writer: &mut ExportWriter<W>,
    missing: impl Iterator<Item = (&'a usize, &'a SentenceLine)>,
) -> Result<(), Error>
where
    W: Write,
{
    for (id, sentence) in missing {
        debug!(sentence = id, "no parse");
        writer.write_tree(&noparse_tree(sentence))?;
    }
    Ok(())
}

static SENTENCES: &str = "SENTENCES";
static INPUT: &str = "INPUT";
static OUTPUT: &str = "OUTPUT";
static DIALECT: &str = "DIALECT";

fn build<'a, 'b>() -> App<'a, 'b> {
    App::new("hybridtree-fill-noparses")
        .settings(DEFAULT_CLAP_SETTINGS)
        .version("0.1")
        .about("Add NOPARSE trees for sentences without a predicted tree.")
        .arg(
            Arg::with_name(SENTENCES)
                .required(true)
                .help("Sentence file listing all sentences"),
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

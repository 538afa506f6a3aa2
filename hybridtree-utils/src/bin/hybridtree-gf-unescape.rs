use std::io::{BufRead, BufWriter, Write};

use clap::{App, Arg};

use hybridtree::escape::unescape_export_line;
use hybridtree_utils::{init_logging, DEFAULT_CLAP_SETTINGS};
use stdinout::{Input, OrExit, Output};

fn main() {
    init_logging();
    let matches = build().get_matches();

    let input = Input::from(matches.value_of(INPUT).map(ToOwned::to_owned));
    let reader = input.buf_read().or_exit("Can't open input reader.", 1);
    let output = Output::from(matches.value_of(OUTPUT).map(ToOwned::to_owned));
    let mut writer = BufWriter::new(output.write().or_exit("Can't open output writer.", 1));
    for line in reader.lines() {
        let line = line.or_exit("Can't read line.", 1);
        writeln!(writer, "{}", unescape_export_line(&line)).or_exit("Can't write to output.", 1);
    }
    writer.flush().or_exit("Can't write to output.", 1);
}

static INPUT: &str = "INPUT";
static OUTPUT: &str = "OUTPUT";

fn build<'a, 'b>() -> App<'a, 'b> {
    App::new("hybridtree-gf-unescape")
        .settings(DEFAULT_CLAP_SETTINGS)
        .version("0.1")
        .about("Unescape words and tags of parsed export trees.")
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
}

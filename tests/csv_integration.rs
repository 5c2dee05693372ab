pub mod common;

use std::{
    fs::{File, read_to_string},
    io::BufWriter,
};

use ::serde::Serialize;
use csv::ReaderBuilder;
use rand::distr::{Alphanumeric, SampleString};

use common::{client, person, student, write_to_string};
use csv_record_rs::{
    CsvRecordWriter, CsvRecordWriterBuilder, CsvWriterConfig,
    core::{
        item::ItemWriter,
        naming::NamingStrategy,
        record::{CsvRecord, FieldFormat, RecordFormat},
    },
};

#[derive(Serialize, Debug, Clone)]
struct Note {
    title: String,
    body: String,
    author: Option<String>,
}

impl CsvRecord for Note {
    fn record_format() -> Option<RecordFormat> {
        Some(RecordFormat::new())
    }
}

fn note(title: &str, body: &str) -> Note {
    Note {
        title: title.to_string(),
        body: body.to_string(),
        author: Some("anon".to_string()),
    }
}

fn parse(output: &str, delimiter: u8) -> Vec<Vec<String>> {
    ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_reader(output.as_bytes())
        .records()
        .map(|record| {
            record
                .expect("output should be valid CSV")
                .iter()
                .map(String::from)
                .collect()
        })
        .collect()
}

#[test]
fn header_should_follow_space_separated_capitalized_strategy() {
    let output = write_to_string(&[person("Ada", "Lovelace", 1815)]);

    assert!(
        output.starts_with("First Name,Last Name,Day Of Birth,Month Of Birth,Year Of Birth\n")
    );
    assert_eq!(output.lines().nth(1), Some("Ada,Lovelace,1,6,1815"));
}

#[test]
fn clients_should_skip_transient_field_and_mask_account_number() {
    let output = write_to_string(&[client("TestFirstName", "1234567890123456", 123.45)]);

    assert_eq!(
        output,
        "FIRST_NAME,ACCOUNT_NUMBER,AMOUNT_TO_PAY\nTestFirstName,1234XXXXXXXXXXXX,123.45\n"
    );
}

#[test]
fn short_account_number_should_not_be_masked() {
    let output = write_to_string(&[client("ShortAcc", "123", 10.5)]);

    assert_eq!(output.lines().nth(1), Some("ShortAcc,123,10.5"));
}

#[test]
fn value_with_delimiter_should_be_quoted() {
    let output = write_to_string(&[student("Smith, John", &["100"])]);

    assert_eq!(output, "name,score\n\"Smith, John\",[100]\n");
}

#[test]
fn multi_element_list_should_be_quoted() {
    let output = write_to_string(&[
        student("Alice Wonderland", &["90", "85"]),
        student("Bob The Builder", &["70", "75", "80"]),
    ]);

    assert_eq!(
        output,
        "name,score\nAlice Wonderland,\"[90, 85]\"\nBob The Builder,\"[70, 75, 80]\"\n"
    );
}

#[test]
fn embedded_quotes_should_be_doubled_and_quoted() {
    let output = write_to_string(&[note("He said \"hi\"", "plain")]);

    assert_eq!(
        output,
        "title,body,author\n\"He said \"\"hi\"\"\",plain,anon\n"
    );
}

#[test]
fn absent_element_should_produce_empty_cells() {
    let output = write_to_string(&[
        Some(note("first", "a")),
        None,
        Some(note("last", "b")),
    ]);

    assert_eq!(output, "title,body,author\nfirst,a,anon\n,,\nlast,b,anon\n");
}

#[test]
fn absent_field_should_produce_empty_cell() {
    let mut anonymous = note("untitled", "text");
    anonymous.author = None;

    let output = write_to_string(&[anonymous]);

    assert_eq!(output.lines().nth(1), Some("untitled,text,"));
}

#[test]
fn line_count_should_match_records_plus_header() {
    for count in [1usize, 2, 7, 25] {
        let clients: Vec<_> = (0..count)
            .map(|i| client(&format!("Client{}", i), "9999888877776666", i as f64))
            .collect();

        let output = write_to_string(&clients);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), count + 1);
        assert!(lines.iter().all(|line| line.split(',').count() == 3));
    }
}

#[test]
fn header_row_can_be_disabled() {
    #[derive(Serialize)]
    struct Reading {
        sensor: String,
        value: f32,
    }

    impl CsvRecord for Reading {
        fn record_format() -> Option<RecordFormat> {
            Some(RecordFormat::new().include_header(false))
        }
    }

    let output = write_to_string(&[
        Reading {
            sensor: "t1".to_string(),
            value: 21.5,
        },
        Reading {
            sensor: "t2".to_string(),
            value: -3.25,
        },
    ]);

    assert_eq!(output, "t1,21.5\nt2,-3.25\n");
}

#[test]
fn serde_skip_and_rename_should_shape_columns() {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Account {
        account_id: u64,
        #[serde(skip)]
        #[allow(dead_code)]
        password_hash: String,
        #[serde(rename = "ownerName")]
        owner: String,
        iban: String,
    }

    impl CsvRecord for Account {
        fn record_format() -> Option<RecordFormat> {
            Some(
                RecordFormat::new()
                    .default_naming(NamingStrategy::CamelToSnakeCase)
                    .field(FieldFormat::new("iban").header("IBAN"))
                    .field(
                        FieldFormat::new("ownerName")
                            .naming(NamingStrategy::AsIsToSpaceSeparatedCapitalized),
                    ),
            )
        }
    }

    let output = write_to_string(&[Account {
        account_id: 42,
        password_hash: "secret".to_string(),
        owner: "Grace".to_string(),
        iban: "DE89370400440532013000".to_string(),
    }]);

    assert_eq!(output, "account_id,Owner Name,IBAN\n42,Grace,DE89370400440532013000\n");
}

#[test]
fn skipped_optional_field_should_keep_its_column() {
    #[derive(Serialize)]
    struct Contact {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        city: String,
    }

    impl CsvRecord for Contact {
        fn record_format() -> Option<RecordFormat> {
            Some(RecordFormat::new())
        }
    }

    let output = write_to_string(&[
        Contact {
            name: "Ann".to_string(),
            email: None,
            city: "Oslo".to_string(),
        },
        Contact {
            name: "Bob".to_string(),
            email: Some("bob@x.io".to_string()),
            city: "Rome".to_string(),
        },
    ]);

    assert_eq!(output, "name,email,city\nAnn,,Oslo\nBob,bob@x.io,Rome\n");
}

#[test]
fn output_should_parse_back_to_written_cells() {
    let notes = vec![
        note("comma, inside", "line one\nline two"),
        note("quote \" inside", "windows\r\nbreak"),
        note("", "  padded  "),
        note("\"", "tab\there"),
    ];

    let output = write_to_string(&notes);
    let rows = parse(&output, b',');

    let mut expected = vec![vec![
        "title".to_string(),
        "body".to_string(),
        "author".to_string(),
    ]];
    expected.extend(
        notes
            .iter()
            .map(|n| vec![n.title.clone(), n.body.clone(), "anon".to_string()]),
    );
    assert_eq!(rows, expected);
}

#[test]
fn tsv_output_should_parse_back_with_tab_delimiter() {
    let notes = vec![note("a\tb", "c,d"), note("plain", "text")];
    let writer = CsvRecordWriter::tsv(Vec::new());

    writer.write(&notes).unwrap();

    let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert_eq!(output, "title\tbody\tauthor\n\"a\tb\"\tc,d\tanon\nplain\ttext\tanon\n");

    let rows = parse(&output, b'\t');
    assert_eq!(rows[1], vec!["a\tb", "c,d", "anon"]);
}

#[test]
fn random_plain_values_should_pass_through_unchanged() {
    let notes: Vec<Note> = (0..50)
        .map(|_| {
            note(
                &Alphanumeric.sample_string(&mut rand::rng(), 12),
                &Alphanumeric.sample_string(&mut rand::rng(), 40),
            )
        })
        .collect();

    let output = write_to_string(&notes);

    for (line, note) in output.lines().skip(1).zip(&notes) {
        assert_eq!(line, format!("{},{},anon", note.title, note.body));
    }
}

#[test]
fn crlf_separator_should_terminate_every_row() {
    let writer = CsvRecordWriterBuilder::new()
        .line_separator("\r\n")
        .from_writer(Vec::new())
        .unwrap();

    writer
        .write(&[client("A", "1111222233334444", 1.0), client("B", "5", 2.25)])
        .unwrap();

    let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert_eq!(
        output,
        "FIRST_NAME,ACCOUNT_NUMBER,AMOUNT_TO_PAY\r\nA,1111XXXXXXXXXXXX,1\r\nB,5,2.25\r\n"
    );
}

#[test]
fn multi_character_separator_inside_value_should_be_quoted() {
    let writer = CsvRecordWriter::with_delimiter_and_line_separator(Vec::new(), ',', "||").unwrap();

    writer.write(&[note("a||b", "c|d")]).unwrap();

    let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert_eq!(output, "title,body,author||\"a||b\",c|d,anon||");
}

#[test]
fn config_loaded_from_json_should_drive_writer() {
    let config: CsvWriterConfig =
        serde_json::from_str(r#"{ "delimiter": "\t", "line_separator": "\r\n" }"#).unwrap();
    assert_eq!(config, {
        let mut tsv = CsvWriterConfig::tsv();
        tsv.line_separator = "\r\n".to_string();
        tsv
    });

    let writer = CsvRecordWriterBuilder::new()
        .config(config)
        .from_writer(Vec::new())
        .unwrap();
    writer.write(&[student("Ann", &[])]).unwrap();

    let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert_eq!(output, "name\tscore\r\nAnn\t[]\r\n");
}

#[test]
fn records_should_be_written_to_file_sink() {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clients.csv");
    let file = File::create(&path).unwrap();

    let writer = CsvRecordWriter::new(BufWriter::new(file));
    let item_writer: &dyn ItemWriter<common::Client> = &writer;
    item_writer.open().unwrap();
    item_writer
        .write(&[
            client("Alice", "1234567812345678", 10.0),
            client("Bob", "8765432187654321", 20.5),
        ])
        .unwrap();
    item_writer.close().unwrap();

    let content = read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "FIRST_NAME,ACCOUNT_NUMBER,AMOUNT_TO_PAY\nAlice,1234XXXXXXXXXXXX,10\nBob,8765XXXXXXXXXXXX,20.5\n"
    );
}

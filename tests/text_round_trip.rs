use pretty_assertions::assert_eq;
use smftext::prelude::*;

const SONG: &str = r#"MFile 1 2 96
MTrk
0 Meta SeqName "Demo"
0 Tempo 500000
0 TimeSig 3/4 24 8
0 KeySig 2 major
0 SMPTE 96 0 0 0 0
0 Meta Copyright "(c) \"x\"\n"
288 Meta Marker "B"
288 Meta TrkEnd
TrkEnd
MTrk
0 Meta TrkName "Lead"
0 PrCh ch=1 p=5
0 Par ch=1 c=7 v=100
0 On ch=1 n=60 v=100
48 On ch=1 n=64 v=90
48 PoPr ch=1 n=60 v=20
96 Off ch=1 n=60 v=0
96 Pb ch=1 v=8192
100 ChPr ch=1 v=3
100 SysEx f0 43 12 00 f7
120 Arb f3 01
120 SeqSpec 00 00 41
120 Meta 0x21 00
400 On ch=10 n=36 v=127
400 Meta TrkEnd
TrkEnd
"#;

fn to_binary(text: &str, options: DriverOptions) -> Vec<u8> {
    let mut smf = Vec::new();
    let diagnostics = compile(&mut Lexer::new(text), &mut smf, options).unwrap();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    smf
}

fn to_text(smf: &[u8], options: TextOptions) -> String {
    let out = decompile(smf, Vec::new(), options, DecoderOptions::default()).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn compact_text_survives_a_round_trip() {
    let smf = to_binary(SONG, DriverOptions::default());
    assert_eq!(to_text(&smf, TextOptions::default()), SONG);
}

#[test]
fn every_rendering_compiles_to_the_same_file() {
    let smf = to_binary(SONG, DriverOptions::default());
    let renderings = [
        TextOptions {
            verbose: true,
            ..Default::default()
        },
        TextOptions {
            note_names: true,
            time_mode: TimeMode::Musical,
            ..Default::default()
        },
        TextOptions {
            verbose: true,
            time_mode: TimeMode::Musical,
            fold: Some(30),
            ..Default::default()
        },
    ];
    for options in renderings {
        let text = to_text(&smf, options);
        assert_eq!(to_binary(&text, DriverOptions::default()), smf, "{text}");
    }

    let text = to_text(
        &smf,
        TextOptions {
            time_mode: TimeMode::Delta,
            ..Default::default()
        },
    );
    let options = DriverOptions {
        delta_times: true,
        ..Default::default()
    };
    assert_eq!(to_binary(&text, options), smf);

    for verbose in [false, true] {
        let text = to_text(
            &smf,
            TextOptions {
                verbose,
                time_mode: TimeMode::MusicalDelta,
                ..Default::default()
            },
        );
        assert_eq!(to_binary(&text, options), smf, "{text}");
    }
}

#[test]
fn signature_change_inside_a_measure() {
    let text = "MFile 1 2 96\nMTrk\n\
                800 TimeSig 2/4 24 8\n\
                800 Meta TrkEnd\n\
                TrkEnd\n\
                MTrk\n\
                790 On ch=1 n=60 v=1\n\
                800 On ch=1 n=62 v=1\n\
                1000 Off ch=1 n=60 v=0\n\
                1000 Meta TrkEnd\n\
                TrkEnd\n";
    let smf = to_binary(text, DriverOptions::default());
    let musical = to_text(
        &smf,
        TextOptions {
            time_mode: TimeMode::Musical,
            ..Default::default()
        },
    );
    // the cut measure keeps its number, 2/4 starts with the next one
    assert!(musical.contains("\n2:0:22 On ch=1 n=60 v=1\n"), "{musical}");
    assert!(musical.contains("\n3:0:0 On ch=1 n=62 v=1\n"), "{musical}");
    assert!(musical.contains("\n4:0:8 Off ch=1 n=60 v=0\n"), "{musical}");
    assert_eq!(to_binary(&musical, DriverOptions::default()), smf);
}

#[test]
fn musical_times_use_the_conductor_signature() {
    let smf = to_binary(SONG, DriverOptions::default());
    let text = to_text(
        &smf,
        TextOptions {
            time_mode: TimeMode::Musical,
            ..Default::default()
        },
    );
    // 3/4 from the first track: 288 ticks to a measure
    assert!(text.contains("\n1:0:0 Meta Marker \"B\"\n"));
    assert!(text.contains("\n1:1:16 On ch=10 n=36 v=127\n"));
}

#[test]
fn folded_lines_compile_back() {
    let text = "MFile 0 1 96\nMTrk\n\
                0 SysEx f0 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f 10 f7\n\
                0 Meta Lyric \"a long lyric line with   spaces in it\"\n\
                TrkEnd\n";
    let smf = to_binary(text, DriverOptions::default());
    let folded = to_text(
        &smf,
        TextOptions {
            fold: Some(40),
            ..Default::default()
        },
    );
    assert!(folded.lines().count() > 6);
    assert_eq!(to_binary(&folded, DriverOptions::default()), smf);
}

#[test]
fn running_status_output_decodes_the_same() {
    let smf = to_binary(SONG, DriverOptions::default());
    let compact = to_binary(
        SONG,
        DriverOptions {
            writer: WriterOptions {
                running_status: true,
            },
            ..Default::default()
        },
    );
    assert!(compact.len() < smf.len());
    assert_eq!(to_text(&compact, TextOptions::default()), SONG);
}

#[test]
fn merged_sysex_renders_as_one_line() {
    let smf = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96, //
        b'M', b'T', b'r', b'k', 0, 0, 0, 14, //
        0x00, 0xF0, 0x02, 0x43, 0x12, //
        0x10, 0xF7, 0x02, 0x00, 0xF7, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let split = to_text(&smf, TextOptions::default());
    assert_eq!(
        split,
        "MFile 0 1 96\nMTrk\n0 SysEx f0 43 12\n16 Arb 00 f7\n16 Meta TrkEnd\nTrkEnd\n"
    );
    let merged = decompile(
        &smf,
        Vec::new(),
        TextOptions::default(),
        DecoderOptions { merge_sysex: true },
    )
    .unwrap();
    assert_eq!(
        String::from_utf8(merged).unwrap(),
        "MFile 0 1 96\nMTrk\n0 SysEx f0 43 12 00 f7\n16 Meta TrkEnd\nTrkEnd\n"
    );
}

#[test]
fn diagnostics_point_at_their_lines() {
    let text = "MFile 0 1 96\nMTrk\n0 On ch=0 n=60 v=1\n0 Bogus\n1 Off ch=1 n=60 v=0\nTrkEnd\nleftover\n";
    let mut smf = Vec::new();
    let diagnostics = compile(&mut Lexer::new(text), &mut smf, DriverOptions::default()).unwrap();
    let lines: Vec<_> = diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, [3, 4, 7]);
    assert_eq!(
        to_text(&smf, TextOptions::default()),
        "MFile 0 1 96\nMTrk\n1 Off ch=1 n=60 v=0\n1 Meta TrkEnd\nTrkEnd\n"
    );
}

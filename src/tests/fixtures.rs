//! Test fixtures for integration tests
//!
//! Sample WebVTT documents covering the shapes seen in the wild.

use std::io::Write;

use tempfile::NamedTempFile;

/// Hand-authored subtitles with ids, voices and styling
pub const STYLED: &str = "\u{FEFF}WEBVTT - Styled sample\r\n\
Kind: captions\r\n\
Language: en\r\n\
\r\n\
intro\r\n\
00:00:01.000 --> 00:00:04.000 align:start\r\n\
<v.narrator Anne>Once upon a <i>time</i>&hellip;</v>\r\n\
\r\n\
00:00:04.000 --> 00:00:06.500\r\n\
<b>Tom &amp; Jerry</b> <c.yellow.bg_blue>present</c>\r\n\
\r\n\
00:00:07.000 --> 00:00:09.000\r\n\
<ruby>漢<rt>kan</rt>字<rt>ji</rt></ruby>\r\n";

/// Document with STYLE and REGION blocks and a NOTE
pub const WITH_BLOCKS: &str = "WEBVTT

STYLE
::cue {
  color: yellow;
}

REGION
id:fred
width:40%

NOTE this is ignored

00:01.000 --> 00:02.000 region:fred
Hello
";

/// Auto-generated captions: each cue repeats the previous line above a new one
pub const ROLLING: &str = "WEBVTT
Kind: captions
Language: en

00:00:00.000 --> 00:00:02.000
so today we're going

00:00:02.000 --> 00:00:04.000
so today we're going
to talk about parsers

00:00:04.000 --> 00:00:04.010
to talk about parsers
 

00:00:04.010 --> 00:00:06.000
to talk about parsers
and why they matter

00:00:08.000 --> 00:00:10.000
and why they matter
";

/// Damaged file: bad timings, stray tags and broken references
pub const DAMAGED: &str = "WEBVTT

00:00:01.000 -> 00:00:02.000
lost cue

00:00:02.000 --> 00:00:03.000
<b>unclosed <i>tags &bogus; &#xZZ; </u>

00:00:03.000 --> 00:00:04.000
</i>stray close &#128;
";

/// Write a fixture to a temporary file
pub fn write_fixture(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

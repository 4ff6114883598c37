use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// `stdout` as an output path writes to standard output
pub const STDOUT: &str = "stdout";

fn is_gzipped(path: &str) -> bool {
    Path::new(path).extension().and_then(|x| x.to_str()) == Some("gz")
}

///
/// Open `input_file` (plain or `.gz`) as a buffered reader
///
pub fn open_buf_reader(input_file: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let file = File::open(input_file)
        .map_err(|e| anyhow::anyhow!("failed to open {}: {}", input_file, e))?;
    if is_gzipped(input_file) {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

///
/// Open `output_file` (plain, `.gz` or `stdout`) as a buffered writer
///
pub fn open_buf_writer(output_file: &str) -> anyhow::Result<Box<dyn Write>> {
    if output_file.eq_ignore_ascii_case(STDOUT) {
        return Ok(Box::new(BufWriter::new(std::io::stdout())));
    }
    let file = File::create(output_file)
        .map_err(|e| anyhow::anyhow!("failed to create {}: {}", output_file, e))?;
    if is_gzipped(output_file) {
        let encoder = GzEncoder::new(file, flate2::Compression::default());
        Ok(Box::new(BufWriter::new(encoder)))
    } else {
        Ok(Box::new(BufWriter::new(file)))
    }
}

///
/// Read every line of `input_file` into memory
///
pub fn read_lines(input_file: &str) -> anyhow::Result<Vec<Box<str>>> {
    open_buf_reader(input_file)?
        .lines()
        .map(|x| x.map(String::into_boxed_str).map_err(anyhow::Error::from))
        .collect()
}

///
/// Read lines and split each into words
///
/// * `input_file` - file name--either gzipped or not
/// * `delim` - any of these characters separates words
///
/// Empty lines and lines starting with `#` are skipped; empty words
/// (e.g. from repeated delimiters) are dropped.
///
pub fn read_lines_of_words_delim(
    input_file: &str,
    delim: &[char],
) -> anyhow::Result<Vec<Vec<Box<str>>>> {
    let lines = read_lines(input_file)?;
    Ok(lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            line.split(delim)
                .filter(|w| !w.is_empty())
                .map(|w| w.to_owned().into_boxed_str())
                .collect()
        })
        .collect())
}

///
/// Write each item on its own line, formatted with `Display`.
/// Returns the number of lines written.
///
/// A closed pipe (e.g. `| head`) stops writing quietly.
///
pub fn write_types<I>(items: I, output_file: &str) -> anyhow::Result<usize>
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut buf = open_buf_writer(output_file)?;
    let mut nlines = 0;
    for x in items {
        match writeln!(buf, "{}", x) {
            Ok(()) => nlines += 1,
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => return Ok(nlines),
            Err(e) => return Err(anyhow::anyhow!("failed to write {}: {}", output_file, e)),
        }
    }
    match buf.flush() {
        Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(e.into()),
        _ => Ok(nlines),
    }
}

///
/// Create the parent directory of `file` if needed
///
pub fn mkdir(file: &str) -> anyhow::Result<()> {
    if let Some(dir) = Path::new(file).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}

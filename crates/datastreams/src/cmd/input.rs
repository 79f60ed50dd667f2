use std::fs;
use std::io::{self, Read};
use std::path::Path;

use datastreams_report::api::{decode_hex, reports_from_json};

use crate::cmd::ReportInput;
use crate::exit::{io_error, report_error, CliResult};

/// Load the full reports named by `input`.
pub fn load(input: &ReportInput) -> CliResult<Vec<Vec<u8>>> {
    if let Some(hex) = &input.hex {
        return Ok(vec![parse_hex(hex)?]);
    }
    if let Some(path) = &input.file {
        let bytes = fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        return Ok(vec![bytes]);
    }
    if let Some(path) = &input.response {
        let body = read_text(path)?;
        let reports =
            reports_from_json(&body).map_err(|err| report_error("invalid response", err))?;
        tracing::debug!(count = reports.len(), "loaded reports from response");
        return Ok(reports.into_iter().map(|report| report.full_report).collect());
    }
    let text = read_text(Path::new("-"))?;
    Ok(vec![parse_hex(&text)?])
}

pub fn parse_hex(text: &str) -> CliResult<Vec<u8>> {
    decode_hex(text).map_err(|err| report_error("invalid report hex", err))
}

fn read_text(path: &Path) -> CliResult<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|err| io_error("failed reading stdin", err))?;
        return Ok(text);
    }
    fs::read_to_string(path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))
}

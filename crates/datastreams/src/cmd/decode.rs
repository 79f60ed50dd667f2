use datastreams_report::{DecodedReport, Envelope, ReportDecoder};

use crate::cmd::{input, DecodeArgs};
use crate::exit::{report_error, CliResult, SUCCESS};
use crate::output::{print_reports, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let reports = input::load(&args.input)?;
    let decoder = ReportDecoder::new();
    let decoded = reports
        .iter()
        .map(|bytes| decode_one(&decoder, bytes))
        .collect::<CliResult<Vec<_>>>()?;

    print_reports(&decoded, format);
    Ok(SUCCESS)
}

pub(crate) fn decode_one(
    decoder: &ReportDecoder,
    full_report: &[u8],
) -> CliResult<(DecodedReport, Envelope)> {
    let envelope = decoder
        .envelope_codec()
        .decode(full_report)
        .map_err(|err| report_error("invalid envelope", err))?;
    let report = decoder
        .decode_envelope(&envelope)
        .map_err(|err| report_error("invalid report", err))?;
    Ok((report, envelope))
}

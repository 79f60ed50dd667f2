use datastreams_report::{fee_token_quote, EnvelopeCodec, FeedResolver};

use crate::cmd::{input, PrepareArgs};
use crate::exit::{report_error, CliError, CliResult, SUCCESS};
use crate::output::{print_prepared, OutputFormat, PreparedOutput};

pub fn run(args: PrepareArgs, format: OutputFormat) -> CliResult<i32> {
    let quote = resolve_quote(&args)?;
    let reports = input::load(&args.input)?;
    let codec = EnvelopeCodec::default();
    let resolver = FeedResolver::default();

    // Only the envelope is decoded; the payload is carried through as-is,
    // whatever its version.
    let mut prepared = Vec::with_capacity(reports.len());
    for bytes in &reports {
        let envelope = codec
            .decode(bytes)
            .map_err(|err| report_error("invalid envelope", err))?;
        let feed_id = resolver
            .feed_id(&envelope.report_blob)
            .map_err(|err| report_error("invalid report", err))?;
        let payload = codec
            .encode_with_quote(&envelope, &quote)
            .map_err(|err| report_error("re-encoding failed", err))?;
        tracing::debug!(%feed_id, size = payload.len(), "prepared report");
        prepared.push(PreparedOutput {
            feed_id,
            payload: payload.to_vec(),
        });
    }

    print_prepared(&prepared, format);
    Ok(SUCCESS)
}

fn resolve_quote(args: &PrepareArgs) -> CliResult<Vec<u8>> {
    if let Some(quote) = &args.quote {
        return input::parse_hex(quote);
    }
    let Some(token) = &args.fee_token else {
        return Err(CliError::usage("one of --fee-token or --quote is required"));
    };
    let bytes = input::parse_hex(token)?;
    let address: [u8; 20] = bytes.as_slice().try_into().map_err(|_| {
        CliError::usage(format!(
            "--fee-token must be a 20-byte address, got {} bytes",
            bytes.len()
        ))
    })?;
    Ok(fee_token_quote(address).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::ReportInput;
    use crate::exit::USAGE;

    fn args(fee_token: Option<&str>, quote: Option<&str>) -> PrepareArgs {
        PrepareArgs {
            input: ReportInput {
                hex: None,
                file: None,
                response: None,
            },
            fee_token: fee_token.map(str::to_string),
            quote: quote.map(str::to_string),
        }
    }

    #[test]
    fn fee_token_is_left_padded() {
        let quote = resolve_quote(&args(Some(&format!("0x{}", "ab".repeat(20))), None)).unwrap();
        assert_eq!(quote.len(), 32);
        assert_eq!(&quote[..12], &[0u8; 12]);
        assert_eq!(&quote[12..], &[0xab; 20]);
    }

    #[test]
    fn short_fee_token_is_usage_error() {
        let err = resolve_quote(&args(Some("0x1234"), None)).unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn explicit_quote_is_passed_through() {
        assert_eq!(resolve_quote(&args(None, Some("0x0102"))).unwrap(), vec![1, 2]);
    }
}

use std::fs;

use datastreams_auth::{
    bulk_reports_path, report_path, request_url, websocket_path, Credentials, SignRequest,
};
use datastreams_report::FeedId;

use crate::cmd::{SignArgs, SignTarget};
use crate::exit::{auth_error, io_error, report_error, CliError, CliResult, SUCCESS};
use crate::output::{print_signed, OutputFormat, SignedOutput};

pub fn run(args: SignArgs, format: OutputFormat) -> CliResult<i32> {
    let credentials = Credentials::new(
        args.client_id.clone().unwrap_or_default(),
        args.client_secret.clone().unwrap_or_default(),
    )
    .map_err(|err| auth_error("invalid credentials", err))?;

    let path = resolve_path(&args.target)?;
    let body = resolve_body(&args)?;
    let request = SignRequest::new(&args.method, &path)
        .map_err(|err| auth_error("invalid request", err))?
        .with_body(&body);

    let headers = match args.timestamp {
        Some(timestamp) => credentials.sign(&request, timestamp),
        None => credentials
            .sign_now(&request)
            .map_err(|err| auth_error("signing failed", err))?,
    };

    let base = if args.target.ws {
        args.ws_url.as_deref()
    } else {
        args.api_url.as_deref()
    };
    let url = base
        .map(|base| request_url(base, request.path()))
        .transpose()
        .map_err(|err| auth_error("invalid base URL", err))?;

    print_signed(
        &SignedOutput {
            method: request.method(),
            path: request.path(),
            url: url.as_ref().map(|url| url.as_str()),
            headers: &headers,
        },
        format,
    );
    Ok(SUCCESS)
}

fn resolve_path(target: &SignTarget) -> CliResult<String> {
    if let Some(path) = &target.path {
        return Ok(path.clone());
    }
    let feeds = target
        .feed
        .iter()
        .map(|feed| {
            feed.parse::<FeedId>()
                .map(|id| id.to_string())
                .map_err(|err| report_error("invalid --feed", err))
        })
        .collect::<CliResult<Vec<_>>>()?;
    if feeds.is_empty() {
        return Err(CliError::usage("one of --path or --feed is required"));
    }
    if target.ws {
        return Ok(websocket_path(&feeds));
    }
    let at = target
        .at
        .ok_or_else(|| CliError::usage("--at is required when signing a reports request"))?;
    match feeds.as_slice() {
        [feed] => Ok(report_path(feed, at)),
        _ => Ok(bulk_reports_path(&feeds, at)),
    }
}

fn resolve_body(args: &SignArgs) -> CliResult<Vec<u8>> {
    if let Some(body) = &args.body {
        return Ok(body.as_bytes().to_vec());
    }
    if let Some(path) = &args.body_file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(Vec::new())
}
